use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::catalog::FilterCatalog;
use crate::data::filter::{FilterSelection, YearRange};
use crate::data::model::Dataset;
use crate::state::{compute, DashboardOutput};

/// JSON document written by `--export`.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub selection: &'a FilterSelection,
    pub output: DashboardOutput,
}

/// Selection from command-line values; the year range defaults to the
/// catalog's full span.
pub fn selection_from_args(
    catalog: &FilterCatalog,
    genres: &[String],
    ratings: &[String],
    years: Option<YearRange>,
) -> FilterSelection {
    let years = years.or_else(|| catalog.year_bounds()).unwrap_or_default();
    FilterSelection::new(genres.iter().cloned(), ratings.iter().cloned(), years)
}

/// Compute the outputs for `selection` and serialize them.
pub fn write_json<W: Write>(dataset: &Dataset, selection: &FilterSelection, writer: W) -> Result<()> {
    let doc = ExportDocument {
        selection,
        output: compute(dataset, selection),
    };
    serde_json::to_writer_pretty(writer, &doc).context("serializing dashboard output")?;
    Ok(())
}

/// Write to `target`, where `-` means stdout.
pub fn export_to(dataset: &Dataset, selection: &FilterSelection, target: &str) -> Result<()> {
    if target == "-" {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_json(dataset, selection, &mut lock)?;
        writeln!(lock)?;
        return Ok(());
    }
    let file = File::create(target).with_context(|| format!("creating {target}"))?;
    let mut writer = BufWriter::new(file);
    write_json(dataset, selection, &mut writer)?;
    writer.flush().with_context(|| format!("writing {target}"))?;
    log::info!("Wrote dashboard output to {target}");
    Ok(())
}
