use crate::selection::SelectionState;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterSummary {
    pub selection: SelectionState,
    pub total_points: usize,
    pub total_lines: usize,
    pub rendered_points: usize,
    pub rendered_lines: usize,
    pub sidebar_closed: bool,
}

impl FilterSummary {
    pub fn rendered(&self) -> usize {
        self.rendered_points + self.rendered_lines
    }

    pub fn total(&self) -> usize {
        self.total_points + self.total_lines
    }
}
