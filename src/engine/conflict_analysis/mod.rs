//! 1-UIP conflict analysis (spec §4.5): resolve backward along the trail at the conflict's
//! decision level until exactly one literal from that level remains in the working clause, then
//! backjump to the second-highest decision level among the rest.

use fnv::FnvHashSet;

use crate::engine::clause::ClauseAllocator;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::sat::Conflict;
use crate::engine::trail::Reason;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

#[derive(Debug)]
pub struct ConflictAnalysisResult {
    /// The learned clause, asserting literal first.
    pub learned_literals: Vec<Literal>,
    pub backjump_level: u32,
}

/// Runs 1-UIP resolution starting from `conflict`. `sat`/`allocator` are read-only here; the
/// caller (the search driver) is responsible for adding the learned clause and backtracking.
pub fn analyse(
    sat: &AssignmentsPropositional,
    allocator: &ClauseAllocator,
    conflict: Conflict,
) -> ConflictAnalysisResult {
    let conflict_level = sat.decision_level();
    let mut seen: FnvHashSet<PropositionalVariable> = FnvHashSet::default();
    let mut learned: Vec<Literal> = Vec::new();
    let mut resolve_count = 0usize;

    let mut literals_to_resolve: Vec<Literal> =
        allocator.get(conflict.0).literals.iter().copied().collect();

    // Index into the trail, walked backwards, used to pick the next literal to resolve on.
    let mut trail_cursor = sat.trail.len();

    loop {
        for &literal in &literals_to_resolve {
            let variable = literal.variable();
            if seen.contains(&variable) {
                continue;
            }
            seen.insert(variable);
            let level = sat.decision_level_of(variable);
            if level == conflict_level {
                resolve_count += 1;
            } else if level > 0 {
                learned.push(!literal);
            }
            // level == 0 literals are root-level facts; they contribute nothing to the learned
            // clause since they can never become false again.
        }

        if resolve_count <= 1 {
            break;
        }

        // Find the next seen literal on the trail (scanning backward) that is at the conflict
        // level, and resolve the working clause with its antecedent.
        loop {
            trail_cursor -= 1;
            let entry = sat.trail[trail_cursor];
            if seen.contains(&entry.literal.variable()) && entry.decision_level == conflict_level {
                seen.remove(&entry.literal.variable());
                resolve_count -= 1;
                match entry.reason {
                    Reason::Clause(clause_ref) => {
                        literals_to_resolve = allocator
                            .get(clause_ref)
                            .literals
                            .iter()
                            .copied()
                            .filter(|&l| l.variable() != entry.literal.variable())
                            .collect();
                    }
                    Reason::Decision | Reason::Fact => {
                        literals_to_resolve = Vec::new();
                    }
                }
                break;
            }
        }
    }

    // The one remaining conflict-level literal is the 1-UIP; it becomes the asserting literal,
    // negated (it was true in the falsified antecedents, so its negation is what the new clause
    // asserts once we backjump).
    let uip_literal = seen
        .iter()
        .find(|&&v| sat.decision_level_of(v) == conflict_level)
        .map(|&v| {
            let value = sat
                .value(Literal::new(v, true))
                .expect("UIP variable must be assigned");
            Literal::new(v, !value)
        });

    if let Some(uip) = uip_literal {
        learned.insert(0, uip);
    }

    let backjump_level = learned
        .iter()
        .skip(1)
        .map(|lit| sat.decision_level_of(lit.variable()))
        .max()
        .unwrap_or(0);

    ConflictAnalysisResult {
        learned_literals: learned,
        backjump_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clause::ClauseAllocator;

    fn var(sat: &mut AssignmentsPropositional) -> PropositionalVariable {
        sat.new_variable()
    }

    #[test]
    fn single_decision_level_conflict_learns_unit_like_clause() {
        let mut sat = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let a = var(&mut sat);
        let b = var(&mut sat);
        let lit_a = Literal::new(a, true);
        let lit_b = Literal::new(b, true);

        // Decision: a = true (level 1).
        sat.enqueue(lit_a, Reason::Decision).unwrap();
        // Clause (!a, b): implies b.
        let c1 = allocator.allocate(vec![!lit_a, lit_b], false);
        sat.enqueue(lit_b, Reason::Clause(c1)).unwrap();
        // Clause (!a, !b): conflicts.
        let c2 = allocator.allocate(vec![!lit_a, !lit_b], false);

        let result = analyse(&sat, &allocator, Conflict(c2));
        assert_eq!(result.backjump_level, 0);
        assert_eq!(result.learned_literals.len(), 1);
        assert_eq!(result.learned_literals[0], !lit_a);
    }
}
