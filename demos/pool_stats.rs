use std::fmt;

use clap::Parser;
use log::info;

use formula_pool::pool::FormulaPool;
use formula_pool::reference::Formula;
use formula_pool::theory::{Atom, NegatableAtom, Theory};
use formula_pool::types::Variable;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of queens.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Expected number of formulas.
    #[clap(long, value_name = "INT", default_value = "10000")]
    capacity: usize,

    /// Allocate a Tseitin variable for every constraint.
    #[clap(long)]
    tseitin: bool,

    /// Print the whole pool at the end.
    #[clap(long)]
    dump: bool,
}

/// The queens encoding needs no theory atoms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct NoAtom;

impl fmt::Display for NoAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?")
    }
}

impl Atom for NoAtom {}

impl NegatableAtom for NoAtom {
    fn negation(&self) -> Self {
        NoAtom
    }
}

struct Propositional;

impl Theory for Propositional {
    type Constraint = NoAtom;
    type VarCompare = NoAtom;
    type VarAssign = NoAtom;
    type BvConstraint = NoAtom;
    type UEquality = NoAtom;
    type PbConstraint = NoAtom;
}

type F = Formula<Propositional>;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let pool = FormulaPool::<Propositional>::new(args.capacity);
    println!("pool = {:?}", pool);

    let n = args.n;
    info!("Encoding n-queens problem with n = {}", n);
    let queens: Vec<Vec<F>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| pool.variable(Variable::boolean((i * n + j + 1) as u32)))
                .collect()
        })
        .collect();

    let mut constraints: Vec<F> = vec![];

    // One queen per row
    for row in &queens {
        constraints.push(pool.or(row.iter().cloned()));
    }

    // One queen per column
    for j in 0..n {
        constraints.push(pool.or(queens.iter().map(|row| row[j].clone())));
    }

    // No two queens attack each other
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                for l in 0..n {
                    let same_line = i == k || j == l;
                    let same_diag = i + l == k + j || i + j == k + l;
                    if (i, j) < (k, l) && (same_line || same_diag) {
                        let both = pool.and([queens[i][j].clone(), queens[k][l].clone()]);
                        constraints.push(-both);
                    }
                }
            }
        }
    }

    // Building the same constraints again must not publish anything new.
    let size = pool.size();
    let again = pool.and(constraints.iter().cloned());
    let problem = pool.and(constraints.iter().cloned());
    assert_eq!(again, problem);
    println!("Total {} constraints, pool size {} (+1 for the conjunction)", constraints.len(), size);
    drop(again);

    if args.tseitin {
        let vars: Vec<F> = constraints.iter().map(|c| pool.create_tseitin_var(c)).collect();
        println!("Allocated {} Tseitin variables, pool size {}", vars.len(), pool.size());
        drop(constraints);
        println!("Dropped constraint handles, pool size {}", pool.size());
        drop(vars);
    } else {
        drop(constraints);
    }

    println!("problem: difficulty {}, tree size {}", problem.difficulty(), problem.tree_size());
    if args.dump {
        pool.print();
    }

    drop(problem);
    drop(queens);
    println!("Released everything, pool size {}", pool.size());

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
