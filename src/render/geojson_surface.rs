use super::{Area, Line, Marker, RenderingSurface};
use crate::helpers::Bounds;
use crate::MyResult;

use geojson::{Feature, FeatureCollection};
use log::info;
use serde_json::Value;

use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    pub points: Vec<Marker>,
    pub lines: Vec<Line>,
    pub boundaries: Vec<Area>,
    pub view: Option<Bounds>,
    pub sidebar_closed: bool,
}

fn with_properties(feature: &Feature, extra: Vec<(&str, Value)>) -> Feature {
    let mut feature = feature.clone();
    let props = feature.properties.get_or_insert_with(Default::default);
    for (k, v) in extra {
        props.insert(k.to_owned(), v);
    }
    feature
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn write_json<P: AsRef<Path>>(path: P, value: &FeatureCollection) -> MyResult<()> {
    let file = std::fs::File::create(path)?;
    let mut file = std::io::BufWriter::new(file);
    file.write_all(serde_json::to_string(value)?.as_bytes())?;
    Ok(())
}

impl GeoJsonSurface {
    pub fn new() -> GeoJsonSurface {
        GeoJsonSurface::default()
    }

    pub fn points_collection(&self) -> FeatureCollection {
        collection(
            self.points
                .iter()
                .map(|m| {
                    with_properties(
                        &m.feature,
                        vec![
                            ("icon_key", Value::from(m.icon_key.clone())),
                            ("icon_url", Value::from(m.icon.url.clone())),
                            ("popup_html", Value::from(m.popup_html.clone())),
                        ],
                    )
                })
                .collect(),
        )
    }

    pub fn lines_collection(&self) -> FeatureCollection {
        collection(
            self.lines
                .iter()
                .map(|l| {
                    with_properties(
                        &l.feature,
                        vec![("popup_html", Value::from(l.popup_html.clone()))],
                    )
                })
                .collect(),
        )
    }

    pub fn boundaries_collection(&self) -> FeatureCollection {
        collection(
            self.boundaries
                .iter()
                .map(|a| match a.tooltip {
                    Some(ref t) => with_properties(&a.feature, vec![("tooltip", Value::from(t.clone()))]),
                    None => a.feature.clone(),
                })
                .collect(),
        )
    }

    /// Writes `points.geojson`, `lines.geojson` and `boundaries.geojson` into `dir`.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> MyResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        write_json(dir.join("points.geojson"), &self.points_collection())?;
        write_json(dir.join("lines.geojson"), &self.lines_collection())?;
        write_json(dir.join("boundaries.geojson"), &self.boundaries_collection())?;

        info!(
            "wrote {} points, {} lines and {} boundaries to {}",
            self.points.len(),
            self.lines.len(),
            self.boundaries.len(),
            dir.display()
        );
        Ok(())
    }
}

impl RenderingSurface for GeoJsonSurface {
    fn clear_points(&mut self) {
        self.points.clear();
    }

    fn clear_lines(&mut self) {
        self.lines.clear();
    }

    fn set_points(&mut self, markers: Vec<Marker>) {
        self.points = markers;
    }

    fn add_lines(&mut self, lines: Vec<Line>) {
        self.lines.extend(lines);
    }

    fn set_boundaries(&mut self, areas: Vec<Area>) {
        self.boundaries = areas;
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.view = Some(bounds);
    }

    fn close_sidebar(&mut self) {
        self.sidebar_closed = true;
    }
}
