//! Streaming CSV writer for report rows.

use std::{fs::File, io::Write, path::Path};

use chrono::format::{Item, StrftimeItems};
use subreport_core::ReportRow;

use crate::{
  WriterOptions, columns,
  error::{Error, Result},
};

/// Writes a header line followed by one line per [`ReportRow`].
///
/// The underlying sink is owned; dropping the writer (on success or on an
/// error path) releases it.
pub struct ReportWriter<W: Write> {
  inner:        csv::Writer<W>,
  until_format: String,
}

impl ReportWriter<File> {
  /// Create or truncate the file at `path`.
  ///
  /// Options are validated before the file is touched.
  pub fn create(path: &Path, options: &WriterOptions) -> Result<Self> {
    let builder = builder(options)?;
    Ok(Self {
      inner:        builder.from_path(path)?,
      until_format: options.until_format.clone(),
    })
  }
}

impl<W: Write> ReportWriter<W> {
  pub fn new(sink: W, options: &WriterOptions) -> Result<Self> {
    let builder = builder(options)?;
    Ok(Self {
      inner:        builder.from_writer(sink),
      until_format: options.until_format.clone(),
    })
  }

  pub fn write_header(&mut self) -> Result<()> {
    self.inner.write_record(columns::headers())?;
    Ok(())
  }

  pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
    self
      .inner
      .write_record(columns::cells(row, &self.until_format))?;
    Ok(())
  }

  /// Write the header and then `rows` in the given order. Returns the number
  /// of data rows written.
  pub fn write_rows<'a, I>(&mut self, rows: I) -> Result<usize>
  where
    I: IntoIterator<Item = &'a ReportRow>,
  {
    self.write_header()?;
    let mut written = 0;
    for row in rows {
      self.write_row(row)?;
      written += 1;
    }
    Ok(written)
  }

  /// Flush buffered output and hand back the sink.
  pub fn finish(self) -> Result<W> {
    self
      .inner
      .into_inner()
      .map_err(|e| Error::Io(e.into_error()))
  }
}

fn builder(options: &WriterOptions) -> Result<csv::WriterBuilder> {
  if !options.delimiter.is_ascii() || matches!(options.delimiter, '"' | '\r' | '\n') {
    return Err(Error::InvalidDelimiter(options.delimiter));
  }
  if StrftimeItems::new(&options.until_format).any(|i| matches!(i, Item::Error)) {
    return Err(Error::InvalidDateFormat(options.until_format.clone()));
  }

  let mut builder = csv::WriterBuilder::new();
  builder
    .delimiter(options.delimiter as u8)
    .terminator(csv::Terminator::CRLF)
    .has_headers(false)
    .flexible(false);
  Ok(builder)
}
