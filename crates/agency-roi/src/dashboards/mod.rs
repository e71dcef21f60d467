//! Dashboard computation layer.
//!
//! All aggregators are pure functions over immutable row snapshots: they
//! take complete input slices and return fresh result structures. Source
//! rows are never mutated; a filter change means a new call over the same
//! snapshot.

pub mod dates;
pub mod domain;
pub mod ingest;
pub mod marketing;
mod normalizer;
pub mod sales;

pub use normalizer::normalize_agency_name;
