#![cfg(test)]
//! Scenario D (spec §8): `x + y + z <= 20`, each variable starting in `[6, 9]`, propagates every
//! upper bound down to 8 — each variable's two partners pin their optimistic (lower-bound)
//! contribution at 6 apiece, leaving `20 - 6 - 6 = 8` of slack for the third.

use crate::engine::Solver;
use crate::engine::SolverOptions;
use crate::propagators::Term;

#[test]
fn sum_at_most_twenty_tightens_every_upper_bound_to_eight() {
    let mut solver = Solver::new(SolverOptions::default());
    let x = solver.new_integer_variable(6, 9);
    let y = solver.new_integer_variable(6, 9);
    let z = solver.new_integer_variable(6, 9);

    let terms = vec![
        Term { weight: 1, variable: x },
        Term { weight: 1, variable: y },
        Term { weight: 1, variable: z },
    ];
    solver.post_lin_leq(terms, -20).unwrap();

    solver.propagate_to_fixpoint().unwrap();

    assert_eq!(solver.domains().upper_bound(x), 8);
    assert_eq!(solver.domains().upper_bound(y), 8);
    assert_eq!(solver.domains().upper_bound(z), 8);
}
