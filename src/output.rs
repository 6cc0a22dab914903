//! Output formatting for records and aggregate views.
//!
//! CSV rows carry no header: `make,model,year,mpg` for records and
//! `key,average_mpg` for averages. JSON output is pretty-printed.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Opens `path` for writing (truncating it), or standard output when `None`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Writing output to file");
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Writes every record in order.
pub fn write_records<W: Write>(writer: W, records: &[Record], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv_rows(writer, records),
        OutputFormat::Json => write_json(writer, records),
    }
}

/// Writes `key,average` rows in ascending key order.
pub fn write_averages<W, K>(writer: W, averages: &BTreeMap<K, f64>, format: OutputFormat) -> Result<()>
where
    W: Write,
    K: Serialize + Ord,
{
    match format {
        OutputFormat::Csv => write_csv_rows(writer, averages.iter()),
        OutputFormat::Json => write_json(writer, averages),
    }
}

/// Reads records back from the headerless CSV produced by [`write_records`].
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: Record = result?;
        records.push(record);
    }

    Ok(records)
}

fn write_csv_rows<W, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
