use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use airsurvey::{process_file, CsvWriter, JsonLinesWriter, Sink, Summary, Synchronizer};
use anyhow::{Context, Result};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub enum Format {
    Csv,
    Json,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Csv, Self::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Csv => Some(clap::builder::PossibleValue::new("csv")),
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
        }
    }
}

pub fn convert(inputs: &[PathBuf], output: &Path, format: &Format) -> Result<()> {
    let dest =
        File::create(output).with_context(|| format!("failed to create output {output:?}"))?;
    let writer = BufWriter::new(dest);

    match format {
        Format::Csv => {
            let sink = CsvWriter::new(writer).context("writing csv header")?;
            convert_all(inputs, sink)
        }
        Format::Json => convert_all(inputs, JsonLinesWriter::new(writer)),
    }
}

fn convert_all<S: Sink>(inputs: &[PathBuf], mut sink: S) -> Result<()> {
    let mut sync = Synchronizer::new();
    let mut total = Summary::default();

    for input in inputs {
        match process_file(input, &mut sync, &mut sink) {
            Ok(summary) => total.merge(&summary),
            // one bad input does not stop the others
            Err(err) => error!("failed to process {input:?}: {err}"),
        }
    }
    sink.finish().context("finishing output")?;

    info!(
        lines = total.lines,
        records = total.records,
        "wrote {} snapshots",
        total.flushes
    );
    Ok(())
}
