//! farprep: normalizes historical roster spreadsheets into a consistent
//! columnar schema, reports per-file structure, and optionally merges many
//! files into one consolidated FAR table.

pub mod analyze;
pub mod consolidate;
pub mod error;
pub mod export;
pub mod load;
pub mod normalize;
pub mod run;
pub mod table;
