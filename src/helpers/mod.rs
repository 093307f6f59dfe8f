use geojson::{Feature, Geometry, Value};
use serde::Serialize;

pub type Position = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Position,
    pub north_east: Position,
}

impl Bounds {
    fn from_position(p: &[f64]) -> Option<Bounds> {
        if p.len() < 2 {
            return None;
        }
        let pos = [p[0], p[1]];
        Some(Bounds {
            south_west: pos,
            north_east: pos,
        })
    }

    pub fn extend(self, other: Bounds) -> Bounds {
        Bounds {
            south_west: [
                self.south_west[0].min(other.south_west[0]),
                self.south_west[1].min(other.south_west[1]),
            ],
            north_east: [
                self.north_east[0].max(other.north_east[0]),
                self.north_east[1].max(other.north_east[1]),
            ],
        }
    }
}

fn merge(a: Option<Bounds>, b: Option<Bounds>) -> Option<Bounds> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.extend(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn positions_bounds<'a, I: IntoIterator<Item = &'a Vec<f64>>>(positions: I) -> Option<Bounds> {
    positions
        .into_iter()
        .map(|p| Bounds::from_position(p))
        .fold(None, merge)
}

pub fn geometry_bounds(geometry: &Geometry) -> Option<Bounds> {
    match geometry.value {
        Value::Point(ref p) => Bounds::from_position(p),
        Value::MultiPoint(ref ps) | Value::LineString(ref ps) => positions_bounds(ps),
        Value::MultiLineString(ref lines) | Value::Polygon(ref lines) => {
            positions_bounds(lines.iter().flatten())
        }
        Value::MultiPolygon(ref polygons) => {
            positions_bounds(polygons.iter().flatten().flatten())
        }
        Value::GeometryCollection(ref geometries) => {
            geometries.iter().map(geometry_bounds).fold(None, merge)
        }
    }
}

pub fn features_bounds<'a, I: IntoIterator<Item = &'a Feature>>(features: I) -> Option<Bounds> {
    features
        .into_iter()
        .filter_map(|f| f.geometry.as_ref())
        .map(geometry_bounds)
        .fold(None, merge)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
pub(crate) fn test_feature(
    id: Option<&str>,
    geometry: Option<Value>,
    props: serde_json::Value,
) -> Feature {
    Feature {
        bbox: None,
        geometry: geometry.map(Geometry::new),
        id: id.map(|i| geojson::feature::Id::String(i.to_owned())),
        properties: props.as_object().cloned(),
        foreign_members: None,
    }
}
