#![cfg(test)]
//! Scenario B (spec §8): the order-4 Golomb ruler, `L = 16`. Positions `x0 < x1 < x2 < x3` with
//! `x0 = 0`, all pairwise differences distinct, minimising the ruler length `x3`. No dedicated
//! `minimise()` call exists (spec §9's Non-goal); optimisation is driven by the caller repeatedly
//! solving and tightening `x3`'s upper bound with `setmax`, the same branch-and-bound shape the
//! teacher's own `golomb` example drives over its `Solver::solve` loop.

use crate::engine::Solver;
use crate::engine::SolverOptions;
use crate::propagators::Term;
use crate::termination::Indefinite;
use crate::variables::DomainId;

const LENGTH_BOUND: i32 = 16;

fn post_difference(solver: &mut Solver, small: DomainId, big: DomainId, diff: DomainId) {
    // diff - big + small == 0
    let terms = vec![
        Term { weight: 1, variable: diff },
        Term { weight: -1, variable: big },
        Term { weight: 1, variable: small },
    ];
    let negated = vec![
        Term { weight: -1, variable: diff },
        Term { weight: 1, variable: big },
        Term { weight: -1, variable: small },
    ];
    solver.post_lin_leq(terms, 0).unwrap();
    solver.post_lin_leq(negated, 0).unwrap();
}

#[test]
fn order_four_golomb_ruler_optimal_length_is_six() {
    let mut solver = Solver::new(SolverOptions::default());
    let positions = solver.new_integer_variable_array(4, 0, LENGTH_BOUND);
    solver.assign_value(positions[0], 0).unwrap();

    for window in positions.windows(2) {
        solver.post_int_less(window[0], window[1], 0).unwrap();
    }

    let pairs = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
    let mut differences = Vec::new();
    for &(i, j) in &pairs {
        let diff = solver.new_integer_variable(1, LENGTH_BOUND);
        post_difference(&mut solver, positions[i], positions[j], diff);
        differences.push(diff);
    }

    solver.post_alldiff(positions.clone()).unwrap();
    solver.post_alldiff(differences).unwrap();

    let mut best = None;
    loop {
        match solver.solve_for_solution(&mut Indefinite) {
            Some(solution) => {
                let length = solution.value(positions[3]);
                best = Some(length);
                if solver.setmax(positions[3], length - 1).is_err() {
                    break;
                }
            }
            None => break,
        }
    }

    assert_eq!(best, Some(6));
}
