//! The n-queens puzzle: one variable per row holding its queen's column, with column and
//! diagonal all-different constraints. Diagonals are auxiliary variables tied to each row's
//! variable by `post_int_eq`, since this crate's integer variables have no `offset`/`scale` view.

use clap::Parser;
use lazyclause::options::Cli;
use lazyclause::termination::Indefinite;
use lazyclause::Solver;

#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    cli: Cli,

    /// Board size.
    #[arg(long, default_value_t = 8)]
    n: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let n = args.n as i32;
    let mut solver = Solver::new(args.cli.to_solver_options());

    let columns = solver.new_integer_variable_array(args.n, 0, n - 1);

    let mut diag1 = Vec::new();
    let mut diag2 = Vec::new();
    for (row, &column) in columns.iter().enumerate() {
        let row = row as i32;
        let d1 = solver.new_integer_variable(row, row + n - 1);
        solver.post_int_eq(d1, column, row).expect("offset decomposition is satisfiable in isolation");
        diag1.push(d1);

        let d2 = solver.new_integer_variable(-(n - 1), n - 1);
        solver.post_int_eq(d2, column, -row).expect("offset decomposition is satisfiable in isolation");
        diag2.push(d2);
    }

    solver.post_alldiff(columns.clone()).expect("n columns in [0, n - 1] admit distinct values");
    solver.post_alldiff(diag1).expect("diagonal offsets can be made pairwise distinct");
    solver.post_alldiff(diag2).expect("diagonal offsets can be made pairwise distinct");

    match solver.solve_for_solution(&mut Indefinite) {
        Some(solution) => {
            for &column in &columns {
                let placed = solution.value(column);
                let line: String = (0..args.n)
                    .map(|c| if c as i32 == placed { 'Q' } else { '.' })
                    .collect();
                println!("{line}");
            }
        }
        None => println!("{n}-queens is unsatisfiable"),
    }

    if args.cli.stat {
        solver.log_statistics();
    }
}
