//! SEND + MORE = MONEY, driven through the embedding API (spec §6 / §8 scenario A).

use clap::Parser;
use lazyclause::options::Cli;
use lazyclause::propagators::Term;
use lazyclause::termination::Indefinite;
use lazyclause::Solver;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut solver = Solver::new(cli.to_solver_options());

    let vars = solver.new_integer_variable_array(8, 0, 9);
    let (s, e, n, d, m, o, r, y) = (
        vars[0], vars[1], vars[2], vars[3], vars[4], vars[5], vars[6], vars[7],
    );
    solver.setmin(s, 1).expect("posting a root bound cannot fail here");
    solver.setmin(m, 1).expect("posting a root bound cannot fail here");

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
    solver.post_lin_leq(terms, 0).expect("the equation is satisfiable in isolation");
    solver.post_lin_leq(negated, 0).expect("the equation is satisfiable in isolation");
    solver.post_alldiff(vars).expect("eight variables in [0, 9] admit distinct values");

    match solver.solve_for_solution(&mut Indefinite) {
        Some(solution) => {
            println!(
                "S={} E={} N={} D={} M={} O={} R={} Y={}",
                solution.value(s),
                solution.value(e),
                solution.value(n),
                solution.value(d),
                solution.value(m),
                solution.value(o),
                solution.value(r),
                solution.value(y),
            );
            if cli.all {
                solver.exclude_last(&solution).expect("blocking clause always posts");
                match solver.solve_for_solution(&mut Indefinite) {
                    Some(_) => println!("found a second solution"),
                    None => println!("unique solution"),
                }
            }
        }
        None => println!("unsat"),
    }

    if cli.stat {
        solver.log_statistics();
    }
}
