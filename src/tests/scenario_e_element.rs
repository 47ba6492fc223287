#![cfg(test)]
//! Scenario E (spec §8): `R = X[I]` over `X = [1, 2, 3, 4, 5]`, `I in [1, 5]`. Fixing `R` to a
//! value that appears exactly once in `X` must force `I`, and fixing `I` must force `R`, purely
//! through the clausal encoding `post_element` posts (no dedicated element propagator).

use crate::engine::Solver;
use crate::engine::SolverOptions;

const ARRAY: [i32; 5] = [1, 2, 3, 4, 5];

#[test]
fn fixing_result_forces_the_matching_index() {
    let mut solver = Solver::new(SolverOptions::default());
    let result = solver.new_integer_variable(1, 5);
    let index = solver.new_integer_variable(1, 5);
    solver.post_element(result, &ARRAY, index).unwrap();

    solver.assign_value(result, 3).unwrap();
    solver.propagate_to_fixpoint().unwrap();

    assert_eq!(solver.domains().lower_bound(index), 3);
    assert_eq!(solver.domains().upper_bound(index), 3);
}

#[test]
fn fixing_index_forces_the_matching_result() {
    let mut solver = Solver::new(SolverOptions::default());
    let result = solver.new_integer_variable(1, 5);
    let index = solver.new_integer_variable(1, 5);
    solver.post_element(result, &ARRAY, index).unwrap();

    solver.assign_value(index, 2).unwrap();
    solver.propagate_to_fixpoint().unwrap();

    assert_eq!(solver.domains().lower_bound(result), 2);
    assert_eq!(solver.domains().upper_bound(result), 2);
}
