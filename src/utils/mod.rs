//! Shared utility functions.
//!
//! - `filename`: deterministic local names for downloaded documents

mod filename;

pub use filename::{output_filename, remote_basename, safe_filename};
