//! Append-only ledger price database.
//!
//! Each record becomes one `P <date> <symbol> <amount>` line, the price
//! directive understood by ledger-style accounting tools.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::LedgerError;
use crate::core::record::{LedgerRecord, PriceWriter, RecordKind};

const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Writes price directives to a file, opening and closing it on every append.
#[derive(Debug, Clone)]
pub struct LedgerWriter {
    path: PathBuf,
}

impl LedgerWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LedgerWriter {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders one price directive, trailing newline included.
pub fn format_line(record: &LedgerRecord) -> String {
    let time = record.time.format(TIME_FORMAT);
    match record.kind {
        RecordKind::Currency => format!("P {} {} ${:.6}\n", time, record.symbol, record.price),
        RecordKind::Commodity => format!("P {} {} €{:.2}\n", time, record.symbol, record.price),
    }
}

impl PriceWriter for LedgerWriter {
    fn append(&self, record: &LedgerRecord) -> Result<(), LedgerError> {
        let line = format_line(record);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!(path = %self.path.display(), line = line.trim_end(), "Appended price");
        Ok(())
    }
}
