//! JSON export of a finished run.

use std::io::Write;

use ordersync_client::SyncReport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dataset {
    Summary,
    Detail,
    Merged,
    All,
}

/// Writes the selected dataset as one JSON document followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_report<W: Write>(
    report: &SyncReport,
    dataset: Dataset,
    pretty: bool,
    mut writer: W,
) -> anyhow::Result<()> {
    match dataset {
        Dataset::Summary => write_json(&mut writer, &report.summaries, pretty)?,
        Dataset::Detail => write_json(&mut writer, &report.details, pretty)?,
        Dataset::Merged => write_json(&mut writer, &report.merged, pretty)?,
        Dataset::All => write_json(&mut writer, report, pretty)?,
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)
    } else {
        serde_json::to_writer(writer, value)
    }
}
