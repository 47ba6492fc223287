#![cfg(test)]
//! Scenario F (spec §8): a set variable over the universe `{1, 2, 3}` (represented here as
//! `{0, 1, 2}`) with no further constraints beyond cardinality bookkeeping must have exactly
//! `2^3 = 8` solutions — every subset of a 3-element universe.

use crate::engine::Solver;
use crate::engine::SolverOptions;
use crate::termination::Indefinite;

#[test]
fn unconstrained_set_variable_enumerates_every_subset() {
    let mut solver = Solver::new(SolverOptions::default());
    let set = solver.new_set_variable(3);
    solver.post_set_cardinality(&set).unwrap();

    let mut found = 0;
    loop {
        let Some(solution) = solver.solve_for_solution(&mut Indefinite) else {
            break;
        };
        found += 1;
        solver.exclude_last(&solution).unwrap();
        assert!(found <= 8, "enumerated more than the 8 possible subsets");
    }

    assert_eq!(found, 8);
}
