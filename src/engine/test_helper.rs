#![cfg(any(test, doc))]
//! Helpers for testing propagators in isolation, without spinning up a full [`super::Solver`].
//! Grounded on the teacher's `engine::test_helper::TestSolver`.

use crate::basic_types::PostingError;
use crate::basic_types::PropagationStatusCP;
use crate::engine::clause::ClauseAllocator;
use crate::engine::domains::IntegerDomains;
use crate::engine::propagation::context::PropagationContextMut;
use crate::engine::propagation::propagator::PropagatorInitialisationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorQueue;
use crate::engine::propagation::WatcherTable;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::trail::Reason;
use crate::variables::DomainId;
use crate::variables::IntegerVariable;
use crate::variables::Literal;
use crate::variables::PropositionalConjunction;

/// A minimal container for the pieces a propagator needs, used to set up specific domain
/// scenarios and drive a single `propagate()` call under test.
#[derive(Default)]
pub(crate) struct TestSolver {
    pub(crate) sat: AssignmentsPropositional,
    pub(crate) domains: IntegerDomains,
    pub(crate) allocator: ClauseAllocator,
    pub(crate) queue: PropagatorQueue,
    pub(crate) watchers: WatcherTable,
    propagators: Vec<Box<dyn Propagator>>,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let id = self
            .domains
            .create_domain(&mut self.sat, &mut self.allocator, lower_bound, upper_bound);
        self.watchers.push(Vec::new());
        id
    }

    pub(crate) fn add_clause(&mut self, literals: Vec<Literal>) -> Result<(), PostingError> {
        match literals.len() {
            0 => Err(PostingError::Unsatisfiable),
            1 => {
                let literal = literals[0];
                if self.sat.is_false(literal) {
                    return Err(PostingError::Unsatisfiable);
                }
                match self.sat.enqueue(literal, Reason::Fact) {
                    Ok(_) => Ok(()),
                    Err(_) => Err(PostingError::Unsatisfiable),
                }
            }
            _ => {
                let watch_a = literals[0];
                let watch_b = literals[1];
                let clause_ref = self.allocator.allocate(literals, false);
                self.sat.watch(watch_a, clause_ref);
                self.sat.watch(watch_b, clause_ref);
                Ok(())
            }
        }
    }

    pub(crate) fn set_decision(&mut self, literal: Literal) {
        self.sat
            .enqueue(literal, Reason::Decision)
            .expect("decision literal must not already be falsified");
    }

    pub(crate) fn new_propagator(
        &mut self,
        mut propagator: impl Propagator + 'static,
    ) -> Result<PropagatorId, PropositionalConjunction> {
        let id = PropagatorId(self.propagators.len() as u32);
        let mut registrations = Vec::new();
        {
            let mut init_context = PropagatorInitialisationContext {
                registrations: &mut registrations,
            };
            propagator.initialise_at_root(&mut init_context)?;
        }

        self.propagators.push(Box::new(propagator));
        self.queue.register_propagator();

        for (domain_id, events) in registrations {
            self.watchers[domain_id.index()].push((id, events, 0));
        }

        Ok(id)
    }

    pub(crate) fn propagate(&mut self, propagator: PropagatorId) -> PropagationStatusCP {
        let context = PropagationContextMut::new(
            &mut self.sat,
            &mut self.domains,
            &mut self.allocator,
            &mut self.queue,
            &self.watchers,
        );
        self.propagators[propagator.0 as usize].propagate(context)
    }

    pub(crate) fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.domains.lower_bound(var.domain_id())
    }

    pub(crate) fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.domains.upper_bound(var.domain_id())
    }

    pub(crate) fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        self.domains.contains(&self.sat, var.domain_id(), value)
    }

    pub(crate) fn assert_bounds<Var: IntegerVariable>(&self, var: Var, lb: i32, ub: i32) {
        let actual_lb = self.domains.lower_bound(var.domain_id());
        let actual_ub = self.domains.upper_bound(var.domain_id());
        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "expected bounds [{lb}..{ub}] did not match actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn assert_domain<Var: IntegerVariable>(&self, var: Var, domain: Vec<i32>) {
        assert!(!domain.is_empty(), "expected domain must not be empty");
        let lo = *domain.iter().min().unwrap();
        let hi = *domain.iter().max().unwrap();
        self.assert_bounds(var.clone(), lo, hi);
        for value in lo..=hi {
            let should_contain = domain.contains(&value);
            assert_eq!(
                should_contain,
                self.contains(var.clone(), value),
                "value {value} membership did not match expected domain {domain:?}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::LinearLeqPropagator;
    use crate::propagators::Term;

    #[test]
    fn test_solver_drives_a_propagator_to_a_tightened_bound() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);

        let propagator = LinearLeqPropagator::new(
            vec![
                Term { weight: 1, variable: x },
                Term { weight: 1, variable: y },
            ]
            .into_boxed_slice(),
            -10,
        );
        let id = solver.new_propagator(propagator).unwrap();
        solver.propagate(id).unwrap();

        solver.assert_bounds(x, 0, 10);
        solver.assert_bounds(y, 0, 10);
    }
}
