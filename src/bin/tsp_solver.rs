use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use ::log::{Level, LevelFilter, info, log_enabled, warn};
use hk_tsp::{log::build_logger_for_verbosity, prelude::*};
use structopt::StructOpt;

/// Solves a traveling salesman instance exactly with the Held-Karp algorithm
#[derive(Debug, StructOpt)]
struct Opts {
    /// Distance matrix (`.json` or text format; `-` reads text from stdin).
    /// Defaults to the built-in 13 city reference instance.
    #[structopt(short, long)]
    instance: Option<PathBuf>,

    /// Start and end of the tour
    #[structopt(short, long, default_value = "0")]
    start: City,

    #[structopt(long, default_value = "memoized", possible_values = &Strategy::VARIANTS)]
    strategy: Strategy,

    /// Memory budget of the state table in MiB
    #[structopt(long)]
    max_table_mib: Option<usize>,

    /// Print the solution as JSON instead of the two-line report
    #[structopt(long)]
    json: bool,

    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Cross-check the optimal cost by enumerating all tours (small instances only)
    #[structopt(long)]
    verify: bool,

    /// Skip the invariant checks after solving
    #[structopt(long)]
    no_paranoid: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn load_matrix(path: &Option<PathBuf>) -> anyhow::Result<DistanceMatrix> {
    match path {
        None => {
            info!("No instance given; use the built-in reference instance");
            Ok(reference_instance())
        }
        Some(path) if path.as_os_str() == "-" => {
            let stdin = std::io::stdin().lock();
            Ok(DistanceMatrix::try_read_text(stdin)?)
        }
        Some(path) => Ok(DistanceMatrix::try_read_file(path)?),
    }
}

fn write_solution(solution: &Solution, opts: &Opts) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    if opts.json {
        solution.write_json(&mut writer)?;
    } else {
        solution.write_report(&mut writer)?;
    }
    writer.flush()?;

    Ok(())
}

/// Cross-checks the cost by brute force. Returns `false` without checking if the
/// instance is too large to enumerate.
fn verify_solution(
    matrix: &DistanceMatrix,
    start: City,
    solution: &Solution,
) -> anyhow::Result<bool> {
    if matrix.number_of_cities() > MAX_BRUTE_FORCE_CITIES {
        warn!(
            "Skip verification: brute force is limited to {MAX_BRUTE_FORCE_CITIES} cities, instance has {}",
            matrix.number_of_cities()
        );
        return Ok(false);
    }

    let (brute_cost, _) = brute_force(matrix, start)?;
    anyhow::ensure!(
        brute_cost == solution.cost,
        "brute force found cost {brute_cost}, Held-Karp {}",
        solution.cost
    );
    info!("Brute force confirms cost {brute_cost}");

    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);

    let matrix = load_matrix(&opts.instance)?;
    if log_enabled!(Level::Info) {
        info!(
            "Loaded {} cities (symmetric: {})",
            matrix.number_of_cities(),
            matrix.is_symmetric()
        );
    }
    if matrix.number_of_cities() > 20 {
        warn!("Large instance; the state table dominates memory usage");
    }

    let mut config = SolverConfig::default()
        .with_strategy(opts.strategy)
        .with_paranoid(!opts.no_paranoid);
    if let Some(mib) = opts.max_table_mib {
        config = config.with_max_table_bytes(mib.saturating_mul(1 << 20));
    }

    let solution = solve_tsp(&matrix, opts.start, &config)?;

    if opts.verify {
        verify_solution(&matrix, opts.start, &solution)?;
    }

    write_solution(&solution, &opts)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_small_instance() {
        let matrix = DistanceMatrix::try_from_rows([
            [0, 10, 15, 20],
            [10, 0, 35, 25],
            [15, 35, 0, 30],
            [20, 25, 30, 0],
        ])
        .unwrap();
        let mut solution = solve_tsp(&matrix, 0, &SolverConfig::default()).unwrap();

        assert!(verify_solution(&matrix, 0, &solution).unwrap());

        solution.cost += 1;
        assert!(verify_solution(&matrix, 0, &solution).is_err());
    }

    #[test]
    fn verify_skips_large_instance() {
        let matrix = reference_instance();
        let solution = solve_tsp(&matrix, REFERENCE_START, &SolverConfig::default()).unwrap();

        // the solution must still be reported
        assert!(!verify_solution(&matrix, REFERENCE_START, &solution).unwrap());

        let mut report = Vec::new();
        solution.write_report(&mut report).unwrap();
        assert!(
            String::from_utf8(report)
                .unwrap()
                .starts_with("Optimal Distance: 4469 km")
        );
    }
}
