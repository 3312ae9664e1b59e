//! Station/line table error types.

use std::path::PathBuf;

/// Errors that can occur when loading the station/line table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The table file could not be opened
    #[error("cannot open station/line table {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be read (I/O failure or invalid UTF-8)
    #[error("cannot read station/line table: {0}")]
    Read(#[from] csv::Error),
}
