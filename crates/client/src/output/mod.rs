//! Output formatting functions.

pub mod json;

use std::io::{self, Write};

use dynq_core::{ItemSink, QueryError, SinkStatus};

use crate::cli::{OutputFormat, OutputMode};

pub use json::{ArraySink, LineSink};

/// Format a value for output.
pub fn format_output<T: serde::Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<String, QueryError> {
    match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
    .map_err(|e| QueryError::Output(e.to_string()))
}

/// Builds the sink for the requested output mode.
pub fn sink_for<'a, W: Write + 'a>(
    mode: OutputMode,
    format: OutputFormat,
    writer: W,
) -> Box<dyn ItemSink + 'a> {
    match mode {
        OutputMode::Lines => Box::new(LineSink::new(writer, format)),
        OutputMode::Array => Box::new(ArraySink::new(writer, format)),
    }
}

/// Maps a write result to a sink status. A broken pipe means the reader went away.
pub(crate) fn write_status(result: io::Result<()>) -> Result<SinkStatus, QueryError> {
    match result {
        Ok(()) => Ok(SinkStatus::Accepted),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(SinkStatus::Closed),
        Err(e) => Err(QueryError::Output(e.to_string())),
    }
}

/// Writes table names one per line, stopping if the reader goes away.
pub fn write_table_names<W: Write>(
    mut writer: W,
    names: &[String],
) -> Result<SinkStatus, QueryError> {
    for name in names {
        if write_status(writeln!(writer, "{}", name))? == SinkStatus::Closed {
            return Ok(SinkStatus::Closed);
        }
    }
    write_status(writer.flush())
}
