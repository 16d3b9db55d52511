use std::io::Write as _;
use std::path::PathBuf;

use csv_core::WriteResult;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Table,
    Jsonl,
    Csv,
}

#[derive(clap::Parser)]
#[group(id = "output::Args")]
pub struct Args {
    /// Write to this file instead of the standard output.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open the output file at {1:?}")]
    OpenOutputFile(#[source] std::io::Error, PathBuf),
    #[error("could not write to the output file at {1:?}")]
    WriteFile(#[source] std::io::Error, PathBuf),
    #[error("could not write to the terminal")]
    WriteStdout(#[source] std::io::Error),
    #[error("could not serialize a record to JSON")]
    SerializeJson(#[source] serde_json::Error),
    #[error("csv header must come before any of the records")]
    LateCsvHeader,
}

impl Args {
    pub fn to_output(self) -> Result<Output, Error> {
        let io: Box<dyn std::io::Write> = match &self.output {
            None => Box::new(std::io::stdout().lock()),
            Some(path) => Box::new(
                std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| Error::OpenOutputFile(e, path.clone()))?,
            ),
        };
        let formatter = match self.format {
            Format::Table => {
                let mut table = comfy_table::Table::new();
                table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
                Formatter::Table(table)
            }
            Format::Jsonl => Formatter::Jsonl,
            Format::Csv => Formatter::Csv { records: 0 },
        };
        Ok(Output { path: self.output, io, formatter })
    }
}

/// Tabular output in one of the [`Format`]s.
///
/// Table and CSV output use the cells of each row, JSON lines output serializes a record
/// instead.
pub struct Output {
    path: Option<PathBuf>,
    io: Box<dyn std::io::Write>,
    formatter: Formatter,
}

enum Formatter {
    Table(comfy_table::Table),
    Jsonl,
    Csv { records: usize },
}

impl Output {
    pub fn header(&mut self, header: &[&'static str]) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Table(table) => {
                table.set_header(header.iter().copied());
            }
            Formatter::Jsonl => {}
            Formatter::Csv { records } => {
                if *records != 0 {
                    return Err(Error::LateCsvHeader);
                }
                *records += 1;
                self.csv_row(header)?;
            }
        }
        Ok(())
    }

    pub fn row<R: serde::Serialize>(
        &mut self,
        cells: impl FnOnce() -> Vec<String>,
        record: impl FnOnce() -> R,
    ) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Table(table) => {
                table.add_row(cells());
            }
            Formatter::Jsonl => {
                serde_json::to_writer(&mut self.io, &record()).map_err(Error::SerializeJson)?;
                writeln!(self.io).map_err(|e| self.io_error(e))?;
            }
            Formatter::Csv { records } => {
                *records += 1;
                self.csv_row(&cells())?;
            }
        }
        Ok(())
    }

    fn csv_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), Error> {
        let mut line = Vec::new();
        let mut writer = csv_core::Writer::new();
        let mut buffer = [0; 256];
        for (i, cell) in cells.iter().enumerate() {
            if i != 0 {
                let (_, written) = writer.delimiter(&mut buffer);
                line.extend_from_slice(&buffer[..written]);
            }
            let mut input = cell.as_ref().as_bytes();
            loop {
                let (result, read, written) = writer.field(input, &mut buffer);
                line.extend_from_slice(&buffer[..written]);
                input = &input[read..];
                if let WriteResult::InputEmpty = result {
                    break;
                }
            }
        }
        loop {
            let (result, written) = writer.terminator(&mut buffer);
            line.extend_from_slice(&buffer[..written]);
            if let WriteResult::InputEmpty = result {
                break;
            }
        }
        self.io.write_all(&line).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, e: std::io::Error) -> Error {
        match &self.path {
            None => Error::WriteStdout(e),
            Some(p) => Error::WriteFile(e, p.clone()),
        }
    }

    /// Write out whatever is still buffered.
    pub fn finish(mut self) -> Result<(), Error> {
        if let Formatter::Table(table) = &self.formatter {
            writeln!(self.io, "{table}").map_err(|e| self.io_error(e))?;
        }
        self.io.flush().map_err(|e| self.io_error(e))
    }
}
