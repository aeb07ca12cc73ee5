use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use reweight::config::load_config;
use reweight::data::loader::{load_csv, write_csv};

/// Apply attribute and instance weight modifiers to a CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "reweight", version, about)]
struct Cli {
    /// JSON file naming the modifiers to apply
    #[arg(short, long)]
    config: PathBuf,

    /// CSV dataset to read
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the result (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let data = load_csv(&cli.input)?;
    log::info!(
        "Loaded {} rows x {} attributes from {}",
        data.len(),
        data.num_attributes(),
        cli.input.display()
    );

    let mut attribute_filter = config.attribute_filter();
    attribute_filter
        .determine_output_schema(&data.schema)
        .context("determining output schema")?;
    let mut data = attribute_filter
        .process(Some(&data))
        .context("modifying attribute weights")?;

    if let Some(mut instance_filter) = config.instance_filter() {
        data = instance_filter
            .process(Some(&data))
            .context("modifying instance weights")?;
    }

    for att in &data.schema.attributes {
        log::info!("attribute '{}' weight {}", att.name, att.weight);
    }

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    write_csv(&data, sink)
}
