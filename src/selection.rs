use crate::facets::{Facet, FacetOptions};
use crate::DashboardError;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Chosen values per facet. A facet without entry, or with an empty set, does
/// not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: BTreeMap<Facet, BTreeSet<String>>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        SelectionState::default()
    }

    pub fn values(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selected.get(&facet).filter(|v| !v.is_empty())
    }

    pub fn set<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selected.remove(&facet);
        } else {
            self.selected.insert(facet, values);
        }
    }

    pub fn insert(&mut self, facet: Facet, value: impl Into<String>) {
        self.selected.entry(facet).or_default().insert(value.into());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_unrestricted(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    pub fn active(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> + '_ {
        self.selected
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, v)| (*f, v))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<SelectionState, DashboardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = SelectionState::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let mut parts = pair.splitn(2, '=');
            let facet = parts.next().unwrap_or_default();
            let value = parts
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DashboardError::InvalidSelection(pair.to_owned()))?;
            state.insert(facet.parse()?, value);
        }
        Ok(state)
    }
}

pub trait SelectionSurface {
    fn selected(&self, facet: Facet) -> Vec<String>;

    fn set_options(&mut self, facet: Facet, options: &[String]);

    fn reset(&mut self);

    fn read_state(&self, facets: &[Facet]) -> SelectionState {
        let mut state = SelectionState::new();
        for &facet in facets {
            state.set(facet, self.selected(facet));
        }
        state
    }
}

/// In-memory form. Selecting a value that is not among the offered options is
/// allowed, the pipeline matches on whatever is selected.
#[derive(Debug, Default)]
pub struct FilterForm {
    options: FacetOptions,
    state: SelectionState,
}

impl FilterForm {
    pub fn new() -> FilterForm {
        FilterForm::default()
    }

    pub fn options(&self, facet: Facet) -> &[String] {
        self.options.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn select<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.set(facet, values);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }
}

impl SelectionSurface for FilterForm {
    fn selected(&self, facet: Facet) -> Vec<String> {
        self.state
            .values(facet)
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn set_options(&mut self, facet: Facet, options: &[String]) {
        self.options.insert(facet, options.to_vec());
    }

    fn reset(&mut self) {
        self.state.clear();
    }
}
