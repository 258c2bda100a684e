//! Pure computations over server snapshots.
//!
//! Nothing here performs I/O or keeps state between calls: each function
//! takes a fresh snapshot and returns a new value, so they can run on every
//! refresh or keystroke without coordination.

pub mod cumulative;
pub mod filter;
pub mod risk;

pub use cumulative::CumulativeSeries;
pub use filter::{parse_category_filter, visibility, Filterable};
pub use risk::{classify, classify_all, classify_comparison};
