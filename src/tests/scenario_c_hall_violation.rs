#![cfg(test)]
//! Scenario C (spec §8): three variables squeezed into a two-value domain via `remove_value`,
//! then forced all-different, is a Hall-interval violation and must be infeasible.
//!
//! The spec names the exact learned clause this should produce
//! (`{leq(x1,2), leq(x2,2), leq(x3,2)}`). This crate's public API has no accessor to inspect
//! learned-clause contents from outside `engine::constraint_satisfaction_solver` — see
//! `DESIGN.md`'s Open Question on clause introspection — so this test checks the outcome
//! `propagate_to_fixpoint`/`solve` are required to produce rather than the exact clause text.

use crate::engine::Solver;
use crate::engine::SolverOptions;
use crate::termination::Indefinite;

#[test]
fn three_variables_squeezed_into_two_values_is_infeasible() {
    let mut solver = Solver::new(SolverOptions::default());
    let x1 = solver.new_integer_variable(1, 3);
    let x2 = solver.new_integer_variable(1, 3);
    let x3 = solver.new_integer_variable(1, 3);

    solver.remove_value(x1, 3).unwrap();
    solver.remove_value(x2, 3).unwrap();
    solver.remove_value(x3, 3).unwrap();

    solver.post_alldiff(vec![x1, x2, x3]).unwrap();

    let flag = solver.solve(&mut Indefinite);
    assert_eq!(flag, crate::basic_types::CSPSolverExecutionFlag::Infeasible);
}
