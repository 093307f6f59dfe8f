use crate::helpers::Bounds;
use crate::icons::IconSpec;

use geojson::Feature;

mod geojson_surface;

pub use self::geojson_surface::GeoJsonSurface;

#[derive(Debug, Clone)]
pub struct Marker {
    pub feature: Feature,
    pub icon_key: String,
    pub icon: IconSpec,
    pub popup_html: String,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub feature: Feature,
    pub popup_html: String,
}

#[derive(Debug, Clone)]
pub struct Area {
    pub feature: Feature,
    pub tooltip: Option<String>,
}

pub trait RenderingSurface {
    fn clear_points(&mut self);
    fn clear_lines(&mut self);
    fn set_points(&mut self, markers: Vec<Marker>);
    fn add_lines(&mut self, lines: Vec<Line>);
    fn set_boundaries(&mut self, areas: Vec<Area>);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn close_sidebar(&mut self);
}
