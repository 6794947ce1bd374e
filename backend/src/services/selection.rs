//! Selected streets and the view mode derived from them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::geo::street_label;

/// Which rendering path the street views take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Top-N most impacted streets
    NoSelection,
    /// Time series of one street
    SingleSelected,
    /// Overlay of several streets
    MultiSelected,
}

/// Selected street ids with their names, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: IndexMap<String, String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns the new mode.
    pub fn toggle(&mut self, id: impl Into<String>, name: impl Into<String>) -> ViewMode {
        let id = id.into();
        if self.selected.shift_remove(&id).is_none() {
            self.selected.insert(id, name.into());
        }
        self.mode()
    }

    pub fn mode(&self) -> ViewMode {
        match self.selected.len() {
            0 => ViewMode::NoSelection,
            1 => ViewMode::SingleSelected,
            _ => ViewMode::MultiSelected,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.selected.keys().cloned().collect()
    }

    pub fn id_set(&self) -> HashSet<String> {
        self.selected.keys().cloned().collect()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.selected.get(id).map(String::as_str)
    }

    /// Display labels parallel to [`SelectionState::ids`].
    pub fn labels(&self) -> Vec<String> {
        self.selected
            .iter()
            .map(|(id, name)| street_label(Some(name), id))
            .collect()
    }
}
