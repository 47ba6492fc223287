#![cfg(test)]
//! Scenario A (spec §8): SEND+MORE=MONEY. Eight digit variables, one equality constraint built
//! from two `post_lin_leq` halves, one `post_alldiff`, leading digits forced nonzero.

use crate::engine::Solver;
use crate::engine::SolverOptions;
use crate::propagators::Term;
use crate::termination::Indefinite;

#[test]
fn unique_solution_matches_the_classic_assignment() {
    let mut solver = Solver::new(SolverOptions::default());
    let vars = solver.new_integer_variable_array(8, 0, 9);
    let (s, e, n, d, m, o, r, y) = (
        vars[0], vars[1], vars[2], vars[3], vars[4], vars[5], vars[6], vars[7],
    );

    solver.setmin(s, 1).unwrap();
    solver.setmin(m, 1).unwrap();

    // 1000S + 91E - 90N + D - 9000M - 900O + 10R - Y == 0, split into two inequalities.
    let weights = [
        (s, 1000),
        (e, 91),
        (n, -90),
        (d, 1),
        (m, -9000),
        (o, -900),
        (r, 10),
        (y, -1),
    ];
    let terms: Vec<Term<_>> = weights
        .iter()
        .map(|&(variable, weight)| Term { weight, variable })
        .collect();
    let negated: Vec<Term<_>> = weights
        .iter()
        .map(|&(variable, weight)| Term { weight: -weight, variable })
        .collect();
    solver.post_lin_leq(terms, 0).unwrap();
    solver.post_lin_leq(negated, 0).unwrap();

    solver.post_alldiff(vars.clone()).unwrap();

    let solution = solver
        .solve_for_solution(&mut Indefinite)
        .expect("SEND+MORE=MONEY is satisfiable");

    assert_eq!(solution.value(s), 9);
    assert_eq!(solution.value(e), 5);
    assert_eq!(solution.value(n), 6);
    assert_eq!(solution.value(d), 7);
    assert_eq!(solution.value(m), 1);
    assert_eq!(solution.value(o), 0);
    assert_eq!(solution.value(r), 8);
    assert_eq!(solution.value(y), 2);

    solver.exclude_last(&solution).unwrap();
    assert!(
        solver.solve_for_solution(&mut Indefinite).is_none(),
        "the classic puzzle has exactly one solution"
    );
}
