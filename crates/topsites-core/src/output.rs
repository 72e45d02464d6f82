//! Destinations the accumulated ranking is published to after each window.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TopSitesResult;

/// Receives the full accumulated ranking after every window.
pub trait RankingSink {
    /// Publish the current ranking.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error if the ranking cannot be written.
    fn publish(&mut self, ranking: &BTreeMap<u32, String>) -> TopSitesResult<()>;
}

/// Writes one `<rank> <item>` line per entry, in rank order.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    /// Write to an arbitrary writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<io::Stdout> {
    /// Write to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> RankingSink for ConsoleSink<W> {
    fn publish(&mut self, ranking: &BTreeMap<u32, String>) -> TopSitesResult<()> {
        for (rank, item) in ranking {
            writeln!(self.out, "{rank} {item}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Overwrites a JSON file mapping each rank (as a string key) to its item.
///
/// The snapshot is written to a sibling temporary file and renamed into
/// place, so the previous snapshot survives a failed write.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSink {
    path: PathBuf,
}

impl JsonSnapshotSink {
    /// Snapshot into `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RankingSink for JsonSnapshotSink {
    fn publish(&mut self, ranking: &BTreeMap<u32, String>) -> TopSitesResult<()> {
        let json = serde_json::to_vec(ranking)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), entries = ranking.len(), "Wrote snapshot");
        Ok(())
    }
}
