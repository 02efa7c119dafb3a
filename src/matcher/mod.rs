//! Pattern matching for Ethereum addresses.
//!
//! A search job carries a set of acceptable address starts and a set of
//! acceptable ends; an address is a match when any start/end pair from
//! the cross product holds. The empty string acts as a wildcard on
//! either side.

mod pattern;

pub use pattern::{normalize_ends, normalize_starts, PatternSet};
