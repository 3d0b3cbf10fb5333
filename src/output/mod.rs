pub mod formatter;

pub use formatter::{decision_row, stub_row, Formatter, DECISION_CSV_HEADER, SCRAPER_WARNING, STUB_CSV_HEADER};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

use crate::cli::OutputFormat;
use crate::decision::DecisionRecord;
use crate::error::Result;
use crate::search::ResultStub;

/// Write a decision as pretty-printed `<id>.json` under `dir`
pub fn save_decision(dir: &Path, record: &DecisionRecord) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", record.id()));
    fs::write(&path, serde_json::to_string_pretty(record)?)?;
    Ok(path)
}

/// Write the raw page as `<id>.html` under `dir`
pub fn dump_html(dir: &Path, id: &str, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.html", id));
    fs::write(&path, html)?;
    Ok(path)
}

enum StubSink<W: Write> {
    Csv(csv::Writer<W>),
    Buffered { out: W, stubs: Vec<ResultStub> },
}

/// Writes search results as they arrive.
///
/// CSV rows are streamed and the header is written with the first row, so
/// an empty search produces an empty file. JSON and table output are
/// rendered once the search is over.
pub struct StubWriter<W: Write> {
    sink: StubSink<W>,
    format: OutputFormat,
    base_url: Url,
    written: usize,
}

impl<W: Write> StubWriter<W> {
    pub fn new(out: W, format: OutputFormat, base_url: Url) -> Self {
        let sink = match format {
            OutputFormat::Csv => StubSink::Csv(csv::Writer::from_writer(out)),
            OutputFormat::Json | OutputFormat::Table => StubSink::Buffered {
                out,
                stubs: Vec::new(),
            },
        };
        Self {
            sink,
            format,
            base_url,
            written: 0,
        }
    }

    pub fn write(&mut self, stub: &ResultStub) -> Result<()> {
        match &mut self.sink {
            StubSink::Csv(wtr) => {
                if self.written == 0 {
                    wtr.write_record(STUB_CSV_HEADER)?;
                }
                wtr.write_record(stub_row(stub, &self.base_url)?)?;
                wtr.flush()?;
            }
            StubSink::Buffered { stubs, .. } => stubs.push(stub.clone()),
        }
        self.written += 1;
        Ok(())
    }

    /// Flush everything and return the number of results written
    pub fn finish(self) -> Result<usize> {
        match self.sink {
            StubSink::Csv(mut wtr) => wtr.flush()?,
            StubSink::Buffered { mut out, stubs } => {
                let rendered = Formatter::new(self.format).format_stubs(&stubs, &self.base_url)?;
                writeln!(out, "{}", rendered)?;
                out.flush()?;
            }
        }
        Ok(self.written)
    }
}

/// Streams decision summary rows, header first
pub struct DecisionCsvWriter<W: Write> {
    wtr: csv::Writer<W>,
    written: usize,
}

impl<W: Write> DecisionCsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            wtr: csv::Writer::from_writer(out),
            written: 0,
        }
    }

    pub fn write(&mut self, record: &DecisionRecord) -> Result<()> {
        if self.written == 0 {
            self.wtr.write_record(DECISION_CSV_HEADER)?;
        }
        self.wtr.write_record(decision_row(record))?;
        self.wtr.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.wtr.flush()?;
        Ok(self.written)
    }
}

/// Output file, or stdout when no path is given
pub fn output_stream(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}
