//! User-supplied selection for a single cause list run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used for the court segment of output names when no court is given.
pub const ALL_COURTS: &str = "All";

/// The five strings that drive a run: the cascading dropdown labels and the date.
///
/// Labels are matched against the visible option text of the portal's
/// dropdowns as case-insensitive substrings, so partial names such as
/// `"Bengaluru"` are accepted.
///
/// State, district, court complex and date are mandatory. A run must not
/// start until [`SelectionCriteria::validate`] succeeds. The court label may
/// be empty, meaning "all courts in the complex".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub state: String,
    pub district: String,
    pub court_complex: String,
    #[serde(default)]
    pub court: String,
    /// Free text, conventionally `YYYY-MM-DD`. Typed verbatim into the date field(s).
    pub date: String,
}

/// A mandatory field was left blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl SelectionCriteria {
    pub fn new(
        state: impl Into<String>,
        district: impl Into<String>,
        court_complex: impl Into<String>,
        court: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            court_complex: court_complex.into(),
            court: court.into(),
            date: date.into(),
        }
    }

    /// Check that every mandatory field is filled in.
    ///
    /// Fields are checked in form order, so the first blank one is reported.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        let required = [
            ("state", &self.state),
            ("district", &self.district),
            ("court complex", &self.court_complex),
            ("date", &self.date),
        ];

        for (name, value) in required {
            if value.is_empty() {
                return Err(CriteriaError::MissingField(name));
            }
        }

        Ok(())
    }

    /// Court label to select, or `None` when every court is wanted.
    pub fn court_filter(&self) -> Option<&str> {
        let court = self.court.trim();
        if court.is_empty() {
            None
        } else {
            Some(court)
        }
    }

    /// Court segment used in output filenames.
    ///
    /// A whitespace-only label yields `All` rather than being kept verbatim,
    /// matching [`SelectionCriteria::court_filter`].
    pub fn court_or_all(&self) -> &str {
        if self.court_filter().is_some() {
            &self.court
        } else {
            ALL_COURTS
        }
    }
}
