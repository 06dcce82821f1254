//! Row model: flatten the capabilities document into one row per GPU.

pub mod flatten;
pub mod row;

pub use flatten::flatten;
pub use row::FlatRow;

use std::collections::BTreeMap;

/// Address (as published by the ENS directory) to display name.
pub type NameDirectory = BTreeMap<String, String>;
