use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use pram::{config::PramConfig, frequency_table, io, Pram};
use std::{path::Path, str::FromStr};
use tracing::{info, subscriber::set_global_default, Level};

fn parse_value<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("Invalid value for '{}': {}", name, value))
        })
        .transpose()
}

fn resolve_config(matches: &ArgMatches) -> Result<PramConfig> {
    let mut config = match matches.value_of("config") {
        Some(path) => pram::config::load_config(Path::new(path))?,
        None => PramConfig::default(),
    };

    if let Some(input) = matches.value_of("input") {
        config.input = Some(input.into());
    }
    if let Some(output) = matches.value_of("output") {
        config.output = output.into();
    }
    if let Some(m) = parse_value(matches, "m")? {
        config.m = m;
    }
    if let Some(alpha) = parse_value(matches, "alpha")? {
        config.alpha = alpha;
    }
    if let Some(seed) = parse_value(matches, "seed")? {
        config.seed = Some(seed);
    }
    if let Some(columns) = matches.value_of("columns") {
        config.columns = Some(
            columns
                .split(',')
                .map(|column| column.trim().to_string())
                .filter(|column| !column.is_empty())
                .collect(),
        );
    }
    if matches.is_present("frequencies") {
        config.print_frequencies = true;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let matches = Command::new("pram")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Post-randomisation method (PRAM) for CSV data")
        .arg(
            Arg::new("input")
                .value_name("input")
                .index(1)
                .help("The name of the CSV data file to process"),
        )
        .arg(
            Arg::new("output")
                .value_name("output")
                .index(2)
                .help("The output file name [default: output.csv]"),
        )
        .arg(
            Arg::new("m")
                .value_name("m")
                .index(3)
                .help("The minimum diagonal value [default: 0.8]"),
        )
        .arg(
            Arg::new("alpha")
                .value_name("a")
                .index(4)
                .help("The alpha value [default: 0.5]"),
        )
        .arg(
            Arg::new("frequencies")
                .short('f')
                .help("Print a frequency table showing original vs changed frequencies"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .help("Path to a config file to use"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .takes_value(true)
                .help("Seed for the random number generator"),
        )
        .arg(
            Arg::new("columns")
                .long("columns")
                .takes_value(true)
                .help("Comma separated names of the columns to perturb"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .takes_value(true)
                .default_value("INFO")
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    let tracing_level = Level::from_str(
        matches
            .value_of("verbosity")
            .expect("Missing value for 'verbosity' argument"),
    )?;

    let collector = tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .finish();

    set_global_default(collector)?;

    let config = resolve_config(&matches)?;
    let input = config
        .input
        .clone()
        .ok_or_else(|| anyhow!("No input data file given"))?;

    info!("Input data file: {}", input.display());
    info!("Output file: {}", config.output.display());

    let options = config.options()?;
    let pram = match config.seed {
        Some(seed) => Pram::with_seed(options, seed),
        None => Pram::new(options),
    };

    let input_data = io::read_csv(&input)?;
    let output_data = pram.transform_records(&input_data)?;

    if config.print_frequencies {
        println!("{}", frequency_table(&input_data, &output_data)?);
    }

    io::write_csv(&config.output, &output_data)?;

    Ok(())
}
