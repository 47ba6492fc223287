//! The Boolean core: variable values, the trail, and two-watched-literal unit propagation.

use crate::engine::clause::ClauseAllocator;
use crate::engine::clause::ClauseRef;
use crate::engine::trail::Reason;
use crate::engine::trail::Trail;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// Boolean variable values plus the trail, kept as a single struct since every write to one needs
/// to touch the other (grounded on the teacher's `AssignmentsPropositional`, minus the second
/// trail it keeps in sync with the CP side — this crate unifies the two).
#[derive(Debug, Default)]
pub struct AssignmentsPropositional {
    /// Indexed by `PropositionalVariable::index()`.
    values: Vec<Option<bool>>,
    /// Indexed by `PropositionalVariable::index()`; the decision level the variable was set at.
    levels: Vec<u32>,
    /// Indexed by `PropositionalVariable::index()`; `None` once assigned by a decision.
    reasons: Vec<Option<Reason>>,
    /// Indexed by `Literal::code()`: clauses watching this literal's *negation* becoming true.
    watch_lists: Vec<Vec<ClauseRef>>,
    pub trail: Trail,
}

/// Returned when `enqueue` or `propagate` discovers that a clause is fully falsified.
#[derive(Debug, Clone, Copy)]
pub struct Conflict(pub ClauseRef);

impl AssignmentsPropositional {
    pub fn new_variable(&mut self) -> PropositionalVariable {
        let variable = PropositionalVariable::new(self.values.len() as u32);
        self.values.push(None);
        self.levels.push(0);
        self.reasons.push(None);
        self.watch_lists.push(Vec::new());
        self.watch_lists.push(Vec::new());
        variable
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.values[literal.variable().index()].map(|v| v == literal.is_positive())
    }

    pub fn is_true(&self, literal: Literal) -> bool {
        self.value(literal) == Some(true)
    }

    pub fn is_false(&self, literal: Literal) -> bool {
        self.value(literal) == Some(false)
    }

    pub fn is_assigned(&self, literal: Literal) -> bool {
        self.values[literal.variable().index()].is_some()
    }

    pub fn decision_level_of(&self, variable: PropositionalVariable) -> u32 {
        self.levels[variable.index()]
    }

    pub fn decision_level(&self) -> u32 {
        self.trail.decision_level()
    }

    pub fn reason(&self, variable: PropositionalVariable) -> Option<Reason> {
        self.reasons[variable.index()]
    }

    /// Registers `clause_ref` as watching the two literals at `watch_a`/`watch_b` (by convention,
    /// indices 0 and 1 of the clause).
    pub fn watch(&mut self, literal: Literal, clause_ref: ClauseRef) {
        self.watch_lists[literal.code()].push(clause_ref);
    }

    /// Sets `literal` true for the given reason. Fails if `literal` is already false.
    pub fn enqueue(&mut self, literal: Literal, reason: Reason) -> Result<bool, Conflict> {
        match self.value(literal) {
            Some(true) => Ok(false),
            Some(false) => match reason {
                Reason::Clause(clause_ref) => Err(Conflict(clause_ref)),
                Reason::Decision | Reason::Fact => {
                    unreachable!("a decision or fact literal cannot already be false")
                }
            },
            None => {
                let variable = literal.variable();
                self.values[variable.index()] = Some(literal.is_positive());
                self.reasons[variable.index()] = Some(reason);
                self.trail.push(literal, reason);
                self.levels[variable.index()] = self.trail.decision_level();
                Ok(true)
            }
        }
    }

    pub fn undo(&mut self, literal: Literal) {
        let variable = literal.variable();
        self.values[variable.index()] = None;
        self.reasons[variable.index()] = None;
    }

    /// Runs unit propagation to a fixpoint over `allocator`'s clauses, starting from
    /// `trail_start`. Returns the falsified clause on conflict.
    pub fn propagate(
        &mut self,
        allocator: &mut ClauseAllocator,
        trail_start: usize,
    ) -> Result<(), Conflict> {
        let mut head = trail_start;
        while head < self.trail.len() {
            let propagating_literal = self.trail[head].literal;
            head += 1;

            let false_literal = !propagating_literal;
            let watchers = std::mem::take(&mut self.watch_lists[false_literal.code()]);
            let mut still_watching = Vec::with_capacity(watchers.len());

            let mut iter = watchers.into_iter();
            while let Some(clause_ref) = iter.next() {
                let clause = allocator.get_mut(clause_ref);
                // Normalise so the falsified watch sits at index 1.
                if clause[0] == false_literal {
                    clause.literals.swap(0, 1);
                }
                debug_assert_eq!(clause[1], false_literal);

                if self.is_true(clause[0]) {
                    still_watching.push(clause_ref);
                    continue;
                }

                let mut found_replacement = false;
                for i in 2..clause.literals.len() {
                    if !self.is_false(clause[i]) {
                        clause.literals.swap(1, i);
                        found_replacement = true;
                        break;
                    }
                }

                if found_replacement {
                    self.watch(clause[1], clause_ref);
                    continue;
                }

                still_watching.push(clause_ref);
                let unit = clause[0];
                if self.is_false(unit) {
                    // Conflict: put back remaining watchers and bail out.
                    still_watching.extend(iter);
                    self.watch_lists[false_literal.code()] = still_watching;
                    return Err(Conflict(clause_ref));
                }

                self.enqueue(unit, Reason::Clause(clause_ref))
                    .expect("unit literal cannot already be false");
            }

            self.watch_lists[false_literal.code()] = still_watching;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watched_literal_propagation_derives_unit() {
        let mut assignments = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let a = assignments.new_variable();
        let b = assignments.new_variable();
        let lit_a = Literal::new(a, true);
        let lit_b = Literal::new(b, true);

        let clause_ref = allocator.allocate(vec![lit_a, lit_b], false);
        assignments.watch(lit_a, clause_ref);
        assignments.watch(lit_b, clause_ref);

        assignments.enqueue(!lit_a, Reason::Decision).unwrap();
        assignments.propagate(&mut allocator, 0).unwrap();
        assert!(assignments.is_true(lit_b));
    }

    #[test]
    fn watched_literal_propagation_detects_conflict() {
        let mut assignments = AssignmentsPropositional::default();
        let mut allocator = ClauseAllocator::default();
        let a = assignments.new_variable();
        let b = assignments.new_variable();
        let lit_a = Literal::new(a, true);
        let lit_b = Literal::new(b, true);

        let clause_ref = allocator.allocate(vec![lit_a, lit_b], false);
        assignments.watch(lit_a, clause_ref);
        assignments.watch(lit_b, clause_ref);

        assignments.enqueue(!lit_a, Reason::Decision).unwrap();
        assignments.enqueue(!lit_b, Reason::Decision).unwrap();
        let result = assignments.propagate(&mut allocator, 0);
        assert!(result.is_err());
    }
}
