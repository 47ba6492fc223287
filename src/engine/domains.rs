//! Integer-variable domains encoded as order (`leq`) and equality (`eq`) literals, tied together
//! by the invariant clauses of spec.md §3:
//!
//! - I1 (monotonicity): `leq(x, k) -> leq(x, k+1)`.
//! - I2 (equality decoding): `eq(x, k) <-> leq(x, k) & !leq(x, k-1)`.
//! - I3 (coverage): `leq(x, upper_bound)` and `!leq(x, lower_bound - 1)` hold at creation and
//!   never need a stored literal — they are baked into how `order_literal` answers out-of-range
//!   thresholds.
//!
//! This crate materialises every order/equality literal for a domain eagerly at creation time
//! rather than lazily on first query (see `DESIGN.md` for why); the invariant clauses I1-I3 are
//! therefore posted eagerly too, all at once, rather than "lazily generated" alongside them.

use crate::engine::clause::ClauseAllocator;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::sat::Conflict;
use crate::lazyclause_assert_simple;
use crate::engine::trail::Reason;
use crate::variables::DomainId;
use crate::variables::Literal;
use crate::variables::Predicate;
use crate::variables::PropositionalVariable;

#[derive(Debug, Clone, Copy)]
struct DomainInfo {
    lower_bound_initial: i32,
    upper_bound_initial: i32,
    /// `order_lits[k - lower_bound_initial]` is `leq(x, lower_bound_initial + k)` for
    /// `k` in `0..range_len - 1` (there is no stored literal for `leq(x, upper_bound_initial)`,
    /// which is always true).
    order_lits_start: usize,
    /// `eq_lits[k - lower_bound_initial]` is `eq(x, lower_bound_initial + k)`.
    eq_lits_start: usize,
    range_len: usize,
}

/// What a propositional variable means, for explanation printing and for the cached-bound update
/// hook that runs after every successful assignment.
#[derive(Debug, Clone, Copy)]
pub enum LiteralMeaning {
    Order { id: DomainId, bound: i32 },
    Equality { id: DomainId, value: i32 },
}

/// Owns the order/equality literal tables for every integer variable, plus a cached current
/// `[lower_bound, upper_bound]` per variable kept in sync by `notify_assigned`.
#[derive(Debug, Default)]
pub struct IntegerDomains {
    domains: Vec<DomainInfo>,
    order_lits: Vec<Literal>,
    eq_lits: Vec<Literal>,
    current_lb: Vec<i32>,
    current_ub: Vec<i32>,
    meaning_of: Vec<Option<LiteralMeaning>>,
}

impl IntegerDomains {
    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    /// Creates a fresh integer variable with domain `[lower_bound, upper_bound]`, allocating its
    /// order/equality literals and posting I1-I3 as clauses.
    pub fn create_domain(
        &mut self,
        sat: &mut AssignmentsPropositional,
        allocator: &mut ClauseAllocator,
        lower_bound: i32,
        upper_bound: i32,
    ) -> DomainId {
        lazyclause_assert_simple!(lower_bound <= upper_bound, "empty initial domain");

        let id = DomainId::new(self.domains.len() as u32);
        let range_len = (upper_bound - lower_bound + 1) as usize;
        let order_lits_start = self.order_lits.len();
        let eq_lits_start = self.eq_lits.len();

        // leq(x, k) for k in lower_bound ..= upper_bound - 1 (range_len - 1 literals; leq(x,
        // upper_bound) is always true by I3 and is never materialised).
        for offset in 0..range_len.saturating_sub(1) {
            let variable = sat.new_variable();
            self.meaning_of.resize(sat.num_variables(), None);
            self.meaning_of[variable.index()] = Some(LiteralMeaning::Order {
                id,
                bound: lower_bound + offset as i32,
            });
            self.order_lits.push(Literal::new(variable, true));
        }

        // eq(x, k) for k in lower_bound ..= upper_bound.
        for offset in 0..range_len {
            let variable = sat.new_variable();
            self.meaning_of.resize(sat.num_variables(), None);
            self.meaning_of[variable.index()] = Some(LiteralMeaning::Equality {
                id,
                value: lower_bound + offset as i32,
            });
            self.eq_lits.push(Literal::new(variable, true));
        }

        self.domains.push(DomainInfo {
            lower_bound_initial: lower_bound,
            upper_bound_initial: upper_bound,
            order_lits_start,
            eq_lits_start,
            range_len,
        });
        self.current_lb.push(lower_bound);
        self.current_ub.push(upper_bound);

        self.post_invariant_clauses(allocator, id);

        if range_len == 1 {
            let eq = self.equality_literal(id, lower_bound).unwrap();
            sat.enqueue(eq, Reason::Fact)
                .expect("a freshly allocated literal cannot already be assigned");
        }

        id
    }

    fn info(&self, id: DomainId) -> &DomainInfo {
        &self.domains[id.index()]
    }

    /// `leq(x, bound)`, or `None` if `bound` is out of the materialised range (I3 makes these
    /// constant-true/constant-false rather than real literals).
    pub fn order_literal(&self, id: DomainId, bound: i32) -> Option<Literal> {
        let info = self.info(id);
        if bound >= info.upper_bound_initial {
            return None; // always true
        }
        if bound < info.lower_bound_initial {
            return None; // always false
        }
        let offset = (bound - info.lower_bound_initial) as usize;
        Some(self.order_lits[info.order_lits_start + offset])
    }

    pub fn equality_literal(&self, id: DomainId, value: i32) -> Option<Literal> {
        let info = self.info(id);
        if value < info.lower_bound_initial || value > info.upper_bound_initial {
            return None;
        }
        let offset = (value - info.lower_bound_initial) as usize;
        Some(self.eq_lits[info.eq_lits_start + offset])
    }

    fn post_invariant_clauses(&self, allocator: &mut ClauseAllocator, id: DomainId) {
        let info = *self.info(id);
        let lo = info.lower_bound_initial;
        let hi = info.upper_bound_initial;

        // I1: leq(x, k) -> leq(x, k+1), for every consecutive pair of materialised order
        // literals (k and k+1 both strictly below `hi`, since leq(x, hi) is always true and
        // never materialised, making the clause for k == hi - 1 trivially satisfied).
        for k in lo..hi {
            if let (Some(a), Some(b)) = (self.order_literal(id, k), self.order_literal(id, k + 1))
            {
                let _ = allocator.allocate(vec![!a, b], false);
            }
        }

        // I2: eq(x, k) <-> leq(x, k) & !leq(x, k-1).
        for k in lo..=hi {
            let eq = self.equality_literal(id, k).unwrap();
            let leq_k = self.order_literal(id, k);
            let leq_k_minus_1 = self.order_literal(id, k - 1);

            match (leq_k, leq_k_minus_1) {
                (Some(leq_k), Some(leq_prev)) => {
                    let _ = allocator.allocate(vec![!eq, leq_k], false);
                    let _ = allocator.allocate(vec![!eq, !leq_prev], false);
                    let _ = allocator.allocate(vec![!leq_k, leq_prev, eq], false);
                }
                (Some(leq_k), None) => {
                    // k == lo: leq(lo - 1) is always false, so the conjunct !leq(k-1) is always
                    // true and drops out of both clauses that mention it.
                    let _ = allocator.allocate(vec![!eq, leq_k], false);
                    let _ = allocator.allocate(vec![!leq_k, eq], false);
                }
                (None, Some(leq_prev)) => {
                    // k == hi: leq(hi) is always true, so the conjunct leq(k) drops out.
                    let _ = allocator.allocate(vec![!eq, !leq_prev], false);
                    let _ = allocator.allocate(vec![leq_prev, eq], false);
                }
                (None, None) => {
                    // Only possible when lo == hi: the variable is fixed, eq is forced true (the
                    // caller fixes it via assign_literal after creation rather than here, since
                    // there is no clause allocator trail entry path for literal facts yet).
                }
            }
        }
    }

    pub fn lower_bound(&self, id: DomainId) -> i32 {
        self.current_lb[id.index()]
    }

    pub fn upper_bound(&self, id: DomainId) -> i32 {
        self.current_ub[id.index()]
    }

    pub fn is_fixed(&self, id: DomainId) -> bool {
        self.lower_bound(id) == self.upper_bound(id)
    }

    pub fn contains(&self, sat: &AssignmentsPropositional, id: DomainId, value: i32) -> bool {
        if value < self.lower_bound(id) || value > self.upper_bound(id) {
            return false;
        }
        match self.equality_literal(id, value) {
            Some(lit) => sat.value(lit) != Some(false),
            None => false,
        }
    }

    pub fn meaning(&self, variable: PropositionalVariable) -> Option<LiteralMeaning> {
        self.meaning_of.get(variable.index()).copied().flatten()
    }

    /// Updates the cached `[lower_bound, upper_bound]` for the domain that `literal` belongs to,
    /// if any. Called once right after every successful `Solver::assign_literal`, regardless of
    /// whether the assignment came from a decision, BCP, or a propagator.
    pub fn notify_assigned(&mut self, literal: Literal) {
        let Some(meaning) = self.meaning(literal.variable()) else {
            return;
        };
        match meaning {
            LiteralMeaning::Order { id, bound } => {
                if literal.is_positive() {
                    self.current_ub[id.index()] = self.current_ub[id.index()].min(bound);
                } else {
                    self.current_lb[id.index()] = self.current_lb[id.index()].max(bound + 1);
                }
            }
            LiteralMeaning::Equality { id, value } => {
                if literal.is_positive() {
                    self.current_lb[id.index()] = value;
                    self.current_ub[id.index()] = value;
                }
            }
        }
    }

    /// Resets every domain's cached bound to its initial value. `Solver::backtrack` calls this
    /// once and then replays `notify_assigned` for each literal remaining on the truncated trail,
    /// rather than trying to undo bound changes one at a time (a materialised order/equality
    /// literal's *un*-assignment doesn't by itself say what the previous bound was).
    pub fn reset_all_bounds_to_initial(&mut self) {
        for (index, info) in self.domains.iter().enumerate() {
            self.current_lb[index] = info.lower_bound_initial;
            self.current_ub[index] = info.upper_bound_initial;
        }
    }

    /// Translates a [`Predicate`] into the literal that encodes it, used to turn a propagator's
    /// reason conjunction into clause literals during explanation.
    pub fn literal_for_predicate(&self, predicate: Predicate) -> Option<Literal> {
        match predicate {
            Predicate::LowerBound { id, bound } => self.order_literal(id, bound - 1).map(|l| !l),
            Predicate::UpperBound { id, bound } => self.order_literal(id, bound),
            Predicate::Equal { id, value } => self.equality_literal(id, value),
            Predicate::NotEqual { id, value } => self.equality_literal(id, value).map(|l| !l),
        }
    }
}

/// Translates a ready-made explanation conjunction into the clause literals used both as the
/// reason clause for a propagated literal and, symmetrically, for conflicts. The implied literal
/// (if any) is placed first.
pub fn explanation_to_clause(
    domains: &IntegerDomains,
    implied: Option<Literal>,
    reason: &crate::variables::PropositionalConjunction,
) -> Vec<Literal> {
    let mut literals = Vec::with_capacity(reason.iter().count() + 1);
    if let Some(implied) = implied {
        literals.push(implied);
    }
    for predicate in reason.iter() {
        let lit = domains
            .literal_for_predicate(*predicate)
            .expect("reason predicate must have a materialised literal");
        literals.push(!lit);
    }
    literals
}

/// A single call-in hook used by [`AssignmentsPropositional::enqueue`]-adjacent call sites that
/// need to report a conflict as a [`Conflict`] rather than a `Result<(), PropositionalConjunction>`.
pub fn conflict_from_reason(
    domains: &IntegerDomains,
    allocator: &mut ClauseAllocator,
    reason: &crate::variables::PropositionalConjunction,
) -> Conflict {
    let literals = explanation_to_clause(domains, None, reason);
    Conflict(allocator.allocate(literals, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_literals_respect_monotonicity_after_propagation() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x = domains.create_domain(&mut sat, &mut allocator, 1, 5);

        // leq(x, 2) true should force leq(x, 3) true via I1.
        let leq2 = domains.order_literal(x, 2).unwrap();
        sat.enqueue(leq2, Reason::Decision).unwrap();
        sat.propagate(&mut allocator, 0).unwrap();
        let leq3 = domains.order_literal(x, 3).unwrap();
        assert_eq!(sat.value(leq3), Some(true));
    }

    #[test]
    fn equality_literal_implies_bounds_via_i2() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x = domains.create_domain(&mut sat, &mut allocator, 0, 3);

        let eq2 = domains.equality_literal(x, 2).unwrap();
        sat.enqueue(eq2, Reason::Decision).unwrap();
        sat.propagate(&mut allocator, 0).unwrap();

        let leq2 = domains.order_literal(x, 2).unwrap();
        let leq1 = domains.order_literal(x, 1).unwrap();
        assert_eq!(sat.value(leq2), Some(true));
        assert_eq!(sat.value(leq1), Some(false));
    }

    #[test]
    fn bound_cache_tracks_order_literal_assignment() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let mut domains = IntegerDomains::default();
        let x = domains.create_domain(&mut sat, &mut allocator, 0, 9);

        let leq4 = domains.order_literal(x, 4).unwrap();
        sat.enqueue(leq4, Reason::Decision).unwrap();
        domains.notify_assigned(leq4);
        assert_eq!(domains.upper_bound(x), 4);
        assert_eq!(domains.lower_bound(x), 0);
    }
}
