use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use ::log::{LevelFilter, info};
use hk_tsp::{log::build_logger_for_verbosity, prelude::*};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(short, long)]
    cities: NumCities,

    #[structopt(short, long, default_value = "100")]
    max_distance: Distance,

    #[structopt(long, default_value = "1234")]
    seed: u64,

    #[structopt(long)]
    symmetric: bool,

    #[structopt(long)]
    json: bool,

    /// Written to stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    anyhow::ensure!(
        (1..=MAX_CITIES).contains(&opt.cities),
        "number of cities must be in 1..={MAX_CITIES}"
    );
    anyhow::ensure!(opt.max_distance > 0, "max distance must be positive");

    let mut rng = Pcg64::seed_from_u64(opt.seed);
    let matrix = if opt.symmetric {
        DistanceMatrix::random_symmetric(&mut rng, opt.cities, opt.max_distance)
    } else {
        DistanceMatrix::random(&mut rng, opt.cities, opt.max_distance)
    };
    info!(
        "Generated {} cities with seed {} (symmetric: {})",
        opt.cities, opt.seed, opt.symmetric
    );

    match (&opt.output, opt.json) {
        (Some(path), true) => matrix.try_write_json_file(path)?,
        (Some(path), false) => matrix.try_write_text_file(path)?,
        (None, json) => {
            let mut writer = BufWriter::new(std::io::stdout().lock());
            if json {
                matrix.try_write_json(&mut writer)?;
            } else {
                matrix.try_write_text(&mut writer)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
