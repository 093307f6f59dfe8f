use crate::attributes::resolve_attribute;
use crate::reader::read_features;
use crate::DashboardError;

use geojson::feature::Id;
use geojson::Feature;
use log::{error, info};

use std::collections::HashMap;
use std::path::Path;

const NAME_KEYS: [&str; 3] = ["nm_mun", "NM_MUN", "name"];
const CODE_KEYS: [&str; 5] = ["cd_mun", "CD_MUN", "geocodigo", "cod_ibge", "COD_IBGE"];

#[derive(Debug, Clone)]
pub struct Boundary {
    pub name: Option<String>,
    pub code: Option<String>,
    pub feature: Feature,
}

fn first_attribute(feature: &Feature, keys: &[&str]) -> Option<String> {
    let props = feature.properties.as_ref()?;
    keys.iter().find_map(|k| resolve_attribute(props, k))
}

impl Boundary {
    pub fn new(feature: Feature) -> Boundary {
        Boundary {
            name: first_attribute(&feature, &NAME_KEYS),
            code: first_attribute(&feature, &CODE_KEYS),
            feature,
        }
    }
}

/// String form of a feature identifier: the GeoJSON `id` when present,
/// otherwise an `id` or `fid` property.
pub fn feature_id(feature: &Feature) -> Option<String> {
    match feature.id {
        Some(Id::String(ref s)) => Some(s.clone()),
        Some(Id::Number(ref n)) => Some(n.to_string()),
        None => first_attribute(feature, &["id", "fid"]),
    }
}

#[derive(Debug, Default)]
pub struct FeatureStore {
    pub points: Vec<Feature>,
    pub lines: Vec<Feature>,
    pub boundaries: Vec<Boundary>,
    records: HashMap<String, RecordRef>,
}

#[derive(Debug, Clone, Copy)]
enum RecordRef {
    Point(usize),
    Line(usize),
}

impl FeatureStore {
    pub fn new(points: Vec<Feature>, lines: Vec<Feature>, boundaries: Vec<Feature>) -> FeatureStore {
        let mut records = HashMap::new();
        for (i, f) in lines.iter().enumerate() {
            if let Some(id) = feature_id(f) {
                records.insert(id, RecordRef::Line(i));
            }
        }
        // points win on id collisions
        for (i, f) in points.iter().enumerate() {
            if let Some(id) = feature_id(f) {
                records.insert(id, RecordRef::Point(i));
            }
        }

        FeatureStore {
            points,
            lines,
            boundaries: boundaries.into_iter().map(Boundary::new).collect(),
            records,
        }
    }

    /// Loads the three data files concurrently. Any failure aborts the whole
    /// load; there is no partial store.
    pub fn load<P: AsRef<Path> + Sync>(
        points_path: P,
        lines_path: P,
        boundaries_path: P,
    ) -> Result<FeatureStore, DashboardError> {
        let (boundaries, (lines, points)) = rayon::join(
            || read_features(&boundaries_path),
            || rayon::join(|| read_features(&lines_path), || read_features(&points_path)),
        );

        let (boundaries, lines, points) = match (boundaries, lines, points) {
            (Ok(b), Ok(l), Ok(p)) => (b, l, p),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                error!("fatal error loading GeoJSON: {}", e);
                return Err(e);
            }
        };

        info!(
            "loaded {} points, {} lines, {} boundaries",
            points.len(),
            lines.len(),
            boundaries.len()
        );

        Ok(FeatureStore::new(points, lines, boundaries))
    }

    pub fn all_features(&self) -> Vec<&Feature> {
        self.points.iter().chain(self.lines.iter()).collect()
    }

    pub fn municipality_names(&self) -> Vec<String> {
        self.boundaries.iter().filter_map(|b| b.name.clone()).collect()
    }

    pub fn record(&self, id: &str) -> Option<&Feature> {
        match self.records.get(id)? {
            RecordRef::Point(i) => self.points.get(*i),
            RecordRef::Line(i) => self.lines.get(*i),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_feature;
    use serde_json::json;

    #[test]
    fn boundary_code_keys_in_priority_order() {
        let b = Boundary::new(test_feature(
            None,
            None,
            json!({"nm_mun": "Teresina", "COD_IBGE": "999", "geocodigo": "2211001"}),
        ));
        assert_eq!(Some("Teresina".to_owned()), b.name);
        assert_eq!(Some("2211001".to_owned()), b.code);

        let b = Boundary::new(test_feature(None, None, json!({"NAME": "Picos"})));
        assert_eq!(Some("Picos".to_owned()), b.name);
        assert_eq!(None, b.code);
    }

    #[test]
    fn records_are_looked_up_by_id() {
        let store = FeatureStore::new(
            vec![test_feature(Some("p1"), None, json!({"Eixo": "Água"}))],
            vec![
                test_feature(None, None, json!({"fid": 12})),
                test_feature(Some("p1"), None, json!({"Eixo": "Linha"})),
            ],
            vec![],
        );
        assert_eq!(3, store.len());
        assert!(store.record("12").is_some());
        assert_eq!(
            Some(&json!("Água")),
            store
                .record("p1")
                .and_then(|f| f.properties.as_ref())
                .and_then(|p| p.get("Eixo"))
        );
        assert!(store.record("nope").is_none());
    }
}
