//! Data models for cause list retrieval.

mod criteria;

pub use criteria::{CriteriaError, SelectionCriteria};
