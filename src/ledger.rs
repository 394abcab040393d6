//! Append-only trade ledger.
//!
//! One line per executed action, never rewritten.

use std::{
    fs::{File, OpenOptions},
    io::{LineWriter, Write},
    path::{Path, PathBuf},
};

use crate::{engine::TradeRecord, LedgerError};

/// Sink for executed trades
pub trait TradeLedger {
    fn append(&mut self, record: &TradeRecord) -> Result<(), LedgerError>;
}

/// Ledger backed by a text file opened for append for the process lifetime.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl FileLedger {
    /// Open (creating if needed) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LedgerError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TradeLedger for FileLedger {
    fn append(&mut self, record: &TradeRecord) -> Result<(), LedgerError> {
        writeln!(self.writer, "{record}")?;
        Ok(())
    }
}

/// In-memory ledger keeping records in append order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Vec<TradeRecord>,
}

impl MemoryLedger {
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(ToString::to_string).collect()
    }
}

impl TradeLedger for MemoryLedger {
    fn append(&mut self, record: &TradeRecord) -> Result<(), LedgerError> {
        self.records.push(record.clone());
        Ok(())
    }
}

impl<L: TradeLedger + ?Sized> TradeLedger for &mut L {
    fn append(&mut self, record: &TradeRecord) -> Result<(), LedgerError> {
        (**self).append(record)
    }
}
