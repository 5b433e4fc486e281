//! Command implementations for OxiFlate CLI.

pub mod bound;
pub mod compress;

pub use bound::{BoundOptions, cmd_bound};
pub use compress::{CompressOptions, cmd_compress};
