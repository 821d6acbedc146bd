//! Shared data types for the mamematic workspace.
//!
//! Holds the normalized machine record, genre metadata and the small timing
//! utility used when loading catalogs. Nothing here parses XML or touches the
//! filesystem; see `mamematic-dat` for that.

pub mod chronolog;
pub mod machine;

pub use chronolog::{Chronolog, ChronologError};
pub use machine::{DRIVER_FIELDS, GenreEntry, Machine};
