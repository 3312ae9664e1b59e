//! Station ↔ line lookup.
//!
//! Loaded once at startup from a CSV table of `station,line` rows and
//! immutable afterwards, so it can be shared freely between tasks.

mod error;
mod index;

pub use error::LoadError;
pub use index::StationLineIndex;
