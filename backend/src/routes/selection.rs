use serde::{Deserialize, Serialize};

use crate::services::selection::{SelectionState, ViewMode};

// =========================================================
// Selection types + routes
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionData {
    pub mode: ViewMode,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
}

impl From<&SelectionState> for SelectionData {
    fn from(state: &SelectionState) -> Self {
        Self {
            mode: state.mode(),
            ids: state.ids(),
            labels: state.labels(),
        }
    }
}

/// A click on a street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub id: String,
    /// Defaults to the network name of the street
    #[serde(default)]
    pub name: Option<String>,
}
