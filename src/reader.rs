use crate::DashboardError;

use geojson::{Feature, GeoJson};
use std::io::Read;
use std::path::Path;

pub fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<Feature>, DashboardError> {
    let path = path.as_ref();
    let load_error = |reason: String| DashboardError::Load {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::open(path).map_err(|e| load_error(e.to_string()))?;
    let mut file = std::io::BufReader::new(file);
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| load_error(e.to_string()))?;

    parse_features(&contents).map_err(load_error)
}

pub fn parse_features(contents: &str) -> Result<Vec<Feature>, String> {
    match contents.parse::<GeoJson>().map_err(|e| e.to_string())? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(_) => Err("expected a feature collection, found a geometry".to_owned()),
    }
}
