//! The `hasData` sentinel shared by every analyzer.
//!
//! Analyzers never fail: an empty record store yields `Report::Empty`,
//! which serializes as exactly `{"hasData": false}`. A populated store
//! yields `Report::Data`, serialized as the summary object with
//! `"hasData": true` merged in. The presentation layer branches on the
//! flag and renders an empty state; there is no error path.

use serde::Serialize;

/// Analyzer result: a summary, or the no-data sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report<T> {
    Data {
        #[serde(rename = "hasData")]
        has_data: bool,
        #[serde(flatten)]
        summary: T,
    },
    Empty {
        #[serde(rename = "hasData")]
        has_data: bool,
    },
}

impl<T> Report<T> {
    /// Wrap a computed summary.
    pub fn data(summary: T) -> Self {
        Report::Data {
            has_data: true,
            summary,
        }
    }

    /// The empty-store sentinel.
    pub fn empty() -> Self {
        Report::Empty { has_data: false }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, Report::Data { .. })
    }

    /// The summary, if there was data.
    pub fn summary(&self) -> Option<&T> {
        match self {
            Report::Data { summary, .. } => Some(summary),
            Report::Empty { .. } => None,
        }
    }
}
