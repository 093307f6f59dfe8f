use crate::facets::{Facet, MatchRule};
use crate::selection::SelectionState;

use geojson::Feature;
use std::collections::BTreeSet;

fn facet_matches(facet: Facet, value: Option<&str>, selected: &BTreeSet<String>) -> bool {
    let value = match value {
        Some(v) => v,
        // A missing value never satisfies a non-empty selection.
        None => return false,
    };

    match facet.rule() {
        MatchRule::Contains => {
            let haystack = value.to_uppercase();
            selected
                .iter()
                .any(|s| haystack.contains(s.to_uppercase().as_str()))
        }
        MatchRule::Exact => selected.contains(value),
    }
}

/// Every facet with a selected value must match.
pub fn matches(feature: &Feature, selection: &SelectionState) -> bool {
    selection
        .active()
        .all(|(facet, selected)| facet_matches(facet, facet.value_of(feature).as_deref(), selected))
}

pub fn filter_features<'a>(features: &'a [Feature], selection: &SelectionState) -> Vec<&'a Feature> {
    features.iter().filter(|f| matches(f, selection)).collect()
}
