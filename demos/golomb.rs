//! Golomb ruler of a given order, minimising its length by repeated solve + `setmax` tightening
//! (spec §8 scenario B; no dedicated `minimise()` entry point exists, per spec §9's Non-goals).

use clap::Parser;
use lazyclause::options::Cli;
use lazyclause::propagators::Term;
use lazyclause::termination::Indefinite;
use lazyclause::variables::DomainId;
use lazyclause::Solver;

#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    cli: Cli,

    /// Number of marks on the ruler.
    #[arg(long, default_value_t = 4)]
    order: usize,

    /// Upper bound on the ruler's length.
    #[arg(long, default_value_t = 16)]
    length: i32,
}

fn post_difference(solver: &mut Solver, small: DomainId, big: DomainId, diff: DomainId) {
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
    solver.post_lin_leq(terms, 0).expect("difference decomposition is satisfiable in isolation");
    solver.post_lin_leq(negated, 0).expect("difference decomposition is satisfiable in isolation");
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut solver = Solver::new(args.cli.to_solver_options());

    let positions = solver.new_integer_variable_array(args.order, 0, args.length);
    solver.assign_value(positions[0], 0).expect("0 is in every position's domain");

    for window in positions.windows(2) {
        solver
            .post_int_less(window[0], window[1], 0)
            .expect("strictly increasing positions are satisfiable in isolation");
    }

    let mut differences = Vec::new();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let diff = solver.new_integer_variable(1, args.length);
            post_difference(&mut solver, positions[i], positions[j], diff);
            differences.push(diff);
        }
    }

    solver.post_alldiff(positions.clone()).expect("positions can be made pairwise distinct");
    solver.post_alldiff(differences).expect("differences can be made pairwise distinct");

    let last = *positions.last().expect("order must be at least 1");
    let mut best = None;
    loop {
        match solver.solve_for_solution(&mut Indefinite) {
            Some(solution) => {
                let length = solution.value(last);
                println!("found ruler of length {length}");
                best = Some(length);
                if solver.setmax(last, length - 1).is_err() {
                    break;
                }
            }
            None => break,
        }
    }

    match best {
        Some(length) => println!("optimal ruler length: {length}"),
        None => println!("unsat"),
    }

    if args.cli.stat {
        solver.log_statistics();
    }
}
