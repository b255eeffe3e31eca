//! JSON item sinks.

use std::io::Write;

use dynq_core::{ItemSink, Result, ResultItem, SinkStatus};

use super::{format_output, write_status};
use crate::cli::OutputFormat;

/// Writes each item as soon as it arrives, one per line.
#[derive(Debug)]
pub struct LineSink<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ItemSink for LineSink<W> {
    fn write_item(&mut self, item: &ResultItem) -> Result<SinkStatus> {
        let line = format_output(item, self.format)?;
        write_status(writeln!(self.writer, "{}", line))
    }

    fn finish(&mut self) -> Result<SinkStatus> {
        write_status(self.writer.flush())
    }
}

/// Collects items and writes them as one JSON array on finish.
#[derive(Debug)]
pub struct ArraySink<W> {
    writer: W,
    format: OutputFormat,
    items: Vec<ResultItem>,
}

impl<W: Write> ArraySink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            items: Vec::new(),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ItemSink for ArraySink<W> {
    fn write_item(&mut self, item: &ResultItem) -> Result<SinkStatus> {
        self.items.push(item.clone());
        Ok(SinkStatus::Accepted)
    }

    fn finish(&mut self) -> Result<SinkStatus> {
        let array = format_output(&self.items, self.format)?;
        self.items.clear();
        match write_status(writeln!(self.writer, "{}", array))? {
            SinkStatus::Accepted => write_status(self.writer.flush()),
            SinkStatus::Closed => Ok(SinkStatus::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::output::tests::ClosedPipe;

    fn item(n: i64) -> ResultItem {
        let mut item = ResultItem::new();
        item.insert("id".to_string(), json!(n));
        item.insert("name".to_string(), json!(format!("item-{}", n)));
        item
    }

    #[test]
    fn test_line_sink_writes_one_item_per_line() {
        let mut sink = LineSink::new(Vec::new(), OutputFormat::Json);

        assert_eq!(sink.write_item(&item(1)).unwrap(), SinkStatus::Accepted);
        assert_eq!(sink.write_item(&item(2)).unwrap(), SinkStatus::Accepted);
        sink.finish().unwrap();

        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "{\"id\":1,\"name\":\"item-1\"}\n{\"id\":2,\"name\":\"item-2\"}\n"
        );
    }

    #[test]
    fn test_line_sink_pretty() {
        let mut sink = LineSink::new(Vec::new(), OutputFormat::Pretty);

        sink.write_item(&item(1)).unwrap();

        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "{\n  \"id\": 1,\n  \"name\": \"item-1\"\n}\n"
        );
    }

    #[test]
    fn test_line_sink_reports_closed_pipe() {
        let mut sink = LineSink::new(ClosedPipe, OutputFormat::Json);

        assert_eq!(sink.write_item(&item(1)).unwrap(), SinkStatus::Closed);
    }

    #[test]
    fn test_array_sink_writes_on_finish() {
        let mut sink = ArraySink::new(Vec::new(), OutputFormat::Json);

        sink.write_item(&item(1)).unwrap();
        sink.write_item(&item(2)).unwrap();
        assert!(sink.writer.is_empty());
        sink.finish().unwrap();

        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "[{\"id\":1,\"name\":\"item-1\"},{\"id\":2,\"name\":\"item-2\"}]\n"
        );
    }

    #[test]
    fn test_array_sink_empty() {
        let mut sink = ArraySink::new(Vec::new(), OutputFormat::Json);

        sink.finish().unwrap();

        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "[]\n");
    }

    #[test]
    fn test_array_sink_closed_pipe_on_finish() {
        let mut sink = ArraySink::new(ClosedPipe, OutputFormat::Json);

        sink.write_item(&item(1)).unwrap();

        assert_eq!(sink.finish().unwrap(), SinkStatus::Closed);
    }
}
