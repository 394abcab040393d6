//! Offline replay of recorded bars.
//!
//! Recorded files are CSV with `open` and `close` columns, oldest bar first.
//! Replay feeds them through a fresh [`Session`] with an in-memory ledger, so
//! the same file always yields the same final state and trade sequence.

use std::{io, path::Path};

use crate::{engine::PositionEngine, ledger::MemoryLedger, session::Session, Bar, Result};

/// Read recorded bars from a CSV file.
pub fn read_bars(path: impl AsRef<Path>) -> Result<Vec<Bar>> {
    let reader = csv::Reader::from_path(path)?;
    collect(reader)
}

/// Read recorded bars from any CSV source.
pub fn read_bars_from<R: io::Read>(source: R) -> Result<Vec<Bar>> {
    collect(csv::Reader::from_reader(source))
}

fn collect<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Bar>> {
    let bars = reader.deserialize().collect::<std::result::Result<Vec<Bar>, _>>()?;
    Ok(bars)
}

/// Run `bars` through a session built on `engine`.
pub fn replay<I>(bars: I, engine: PositionEngine) -> Session<MemoryLedger>
where
    I: IntoIterator<Item = Bar>,
{
    let mut session = Session::new(engine, MemoryLedger::default());
    for bar in bars {
        session.on_bar(bar);
    }
    session
}
