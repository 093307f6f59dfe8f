use crate::config::Config;
use crate::detail::{popup_html, DetailSurface, DetailView};
use crate::events::{ChannelSelection, FormEvent};
use crate::facets::{collect_options, FacetOptions};
use crate::filter::filter_features;
use crate::helpers::features_bounds;
use crate::icons::{resolve_icon_key, IconSpec};
use crate::render::{Area, Line, Marker, RenderingSurface};
use crate::selection::SelectionSurface;
use crate::statistics::FilterSummary;
use crate::store::FeatureStore;
use crate::DashboardError;

use crossbeam::channel::Receiver;
use geojson::Feature;
use log::{debug, info, warn};

pub struct Dashboard<S, R> {
    config: Config,
    store: Option<FeatureStore>,
    pub selection: S,
    pub surface: R,
    detail: DetailView,
}

fn marker(feature: &Feature, icon_dir: &str) -> Marker {
    let icon_key = resolve_icon_key(feature);
    Marker {
        feature: feature.clone(),
        icon: IconSpec::for_key(icon_dir, &icon_key),
        icon_key,
        popup_html: popup_html(feature),
    }
}

impl<S: SelectionSurface, R: RenderingSurface> Dashboard<S, R> {
    pub fn new(config: Config, selection: S, surface: R) -> Dashboard<S, R> {
        let detail = DetailView::new(config.detail_retry_delay());
        Dashboard {
            config,
            store: None,
            selection,
            surface,
            detail,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Option<&FeatureStore> {
        self.store.as_ref()
    }

    /// Installs the loaded store, fills the filter form, draws the boundaries
    /// and renders everything unfiltered. The store can only be installed once.
    pub fn initialize(&mut self, store: FeatureStore) -> Option<FilterSummary> {
        if self.store.is_some() {
            warn!("feature store already loaded, ignoring the new one");
            return None;
        }

        let areas: Vec<Area> = store
            .boundaries
            .iter()
            .map(|b| Area {
                feature: b.feature.clone(),
                tooltip: b.name.clone(),
            })
            .collect();
        let bounds = features_bounds(store.boundaries.iter().map(|b| &b.feature));
        self.surface.set_boundaries(areas);
        if let Some(bounds) = bounds {
            self.surface.fit_bounds(bounds);
        }

        self.store = Some(store);

        for (facet, options) in self.facet_options() {
            self.selection.set_options(facet, &options);
        }

        self.apply_filters()
    }

    pub fn facet_options(&self) -> FacetOptions {
        match self.store {
            Some(ref store) => collect_options(
                &self.config.facets,
                &store.all_features(),
                &store.municipality_names(),
            ),
            None => FacetOptions::new(),
        }
    }

    /// Redraws points and lines for the current selection. Does nothing and
    /// returns `None` while no store is loaded.
    pub fn apply_filters(&mut self) -> Option<FilterSummary> {
        let store = match self.store {
            Some(ref store) => store,
            None => {
                warn!("no data loaded yet, nothing to filter");
                return None;
            }
        };

        let selection = self.selection.read_state(&self.config.facets);
        debug!("applying filters: {:?}", selection);

        self.surface.clear_points();
        self.surface.clear_lines();

        let icon_dir = self.config.icon_dir.as_str();
        let markers: Vec<Marker> = filter_features(&store.points, &selection)
            .into_iter()
            .map(|f| marker(f, icon_dir))
            .collect();
        let rendered_points = markers.len();
        self.surface.set_points(markers);

        let lines: Vec<Line> = filter_features(&store.lines, &selection)
            .into_iter()
            .map(|f| Line {
                feature: f.clone(),
                popup_html: popup_html(f),
            })
            .collect();
        let rendered_lines = lines.len();
        self.surface.add_lines(lines);

        let sidebar_closed = self.config.is_narrow_viewport();
        if sidebar_closed {
            self.surface.close_sidebar();
        }

        info!(
            "rendering {}/{} points and {}/{} lines",
            rendered_points,
            store.points.len(),
            rendered_lines,
            store.lines.len()
        );

        Some(FilterSummary {
            selection,
            total_points: store.points.len(),
            total_lines: store.lines.len(),
            rendered_points,
            rendered_lines,
            sidebar_closed,
        })
    }

    pub fn clear_filters(&mut self) -> Option<FilterSummary> {
        if self.store.is_none() {
            warn!("no data loaded yet, nothing to clear");
            return None;
        }
        self.selection.reset();
        self.apply_filters()
    }

    /// Opens the detail panel for the record with `id`. `Ok(false)` when the
    /// panel never got mounted.
    pub fn open_detail<D: DetailSurface>(
        &mut self,
        id: &str,
        panel: &mut D,
    ) -> Result<bool, DashboardError> {
        let feature = self
            .store
            .as_ref()
            .and_then(|s| s.record(id))
            .ok_or_else(|| DashboardError::FeatureNotFound(id.to_owned()))?;
        Ok(self.detail.open(panel, feature))
    }
}

impl<R: RenderingSurface> Dashboard<ChannelSelection, R> {
    pub fn pump_events(&mut self, events: &Receiver<FormEvent>) -> Vec<FilterSummary> {
        let pending: Vec<FormEvent> = events.try_iter().collect();
        pending
            .into_iter()
            .filter_map(|event| match event {
                FormEvent::SelectionChanged(state) => {
                    self.selection.update(state);
                    self.apply_filters()
                }
                FormEvent::Cleared => self.clear_filters(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::{DetailPanel, MiniMap};
    use crate::events::connect;
    use crate::facets::Facet;
    use crate::helpers::test_feature;
    use crate::render::GeoJsonSurface;
    use crate::selection::FilterForm;
    use geojson::Value;
    use serde_json::json;

    fn store() -> FeatureStore {
        FeatureStore::new(
            vec![
                test_feature(
                    Some("p1"),
                    Some(Value::Point(vec![-42.8, -5.1])),
                    json!({"Eixo": "Água", "Status_atual": "completed",
                           "Localizacao (municipio)": "TERESINA - PI"}),
                ),
                test_feature(
                    Some("p2"),
                    Some(Value::Point(vec![-41.4, -7.1])),
                    json!({"Eixo": "Saúde", "Status_atual": "no_progress",
                           "Localizacao (municipio)": "PICOS"}),
                ),
                test_feature(Some("p3"), Some(Value::Point(vec![-42.0, -6.0])), json!({})),
            ],
            vec![test_feature(
                Some("l1"),
                Some(Value::LineString(vec![vec![-42.8, -5.1], vec![-42.5, -5.3]])),
                json!({"Eixo": "Estradas", "Status_atual": "in_progress"}),
            )],
            vec![test_feature(
                None,
                Some(Value::Polygon(vec![vec![
                    vec![-43.0, -5.5],
                    vec![-42.5, -5.5],
                    vec![-42.5, -4.9],
                    vec![-43.0, -5.5],
                ]])),
                json!({"nm_mun": "Teresina", "cd_mun": "2211001"}),
            )],
        )
    }

    fn dashboard() -> Dashboard<FilterForm, GeoJsonSurface> {
        Dashboard::new(Config::default(), FilterForm::new(), GeoJsonSurface::new())
    }

    fn rendered_ids(surface: &GeoJsonSurface) -> Vec<String> {
        surface
            .points
            .iter()
            .filter_map(|m| crate::store::feature_id(&m.feature))
            .chain(
                surface
                    .lines
                    .iter()
                    .filter_map(|l| crate::store::feature_id(&l.feature)),
            )
            .collect()
    }

    #[test]
    fn nothing_happens_before_load() {
        let mut d = dashboard();
        assert!(d.apply_filters().is_none());
        assert!(d.clear_filters().is_none());
        assert!(d.surface.points.is_empty());
        assert!(d.facet_options().is_empty());
    }

    #[test]
    fn initialize_renders_everything_and_fills_the_form() {
        let mut d = dashboard();
        let summary = d.initialize(store()).unwrap();

        assert_eq!(summary.total(), summary.rendered());
        assert_eq!(4, summary.rendered());
        assert_eq!(1, d.surface.boundaries.len());
        assert_eq!(Some("Teresina".to_owned()), d.surface.boundaries[0].tooltip);
        assert!(d.surface.view.is_some());
        assert_eq!(&["TERESINA".to_owned()], d.selection.options(Facet::Municipality));
        assert_eq!(
            vec!["Estradas", "Saúde", "Água"],
            d.selection.options(Facet::Axis)
        );
    }

    #[test]
    fn second_initialize_is_ignored() {
        let mut d = dashboard();
        d.initialize(store());
        assert!(d.initialize(FeatureStore::default()).is_none());
        assert_eq!(4, d.store().unwrap().len());
    }

    #[test]
    fn markers_carry_icon_keys() {
        let mut d = dashboard();
        d.initialize(store());
        let keys: Vec<&str> = d.surface.points.iter().map(|m| m.icon_key.as_str()).collect();
        assert_eq!(vec!["agua_completed", "saude_sem_evolucao", "padrao_indefinido"], keys);
        assert_eq!(
            "icones/icones_camadas/saude_sem_evolucao.svg",
            d.surface.points[1].icon.url
        );
    }

    #[test]
    fn selection_narrows_points_and_lines() {
        let mut d = dashboard();
        d.initialize(store());

        d.selection.select(Facet::Status, vec!["in_progress"]);
        let summary = d.apply_filters().unwrap();
        assert_eq!(0, summary.rendered_points);
        assert_eq!(1, summary.rendered_lines);
        assert_eq!(vec!["l1"], rendered_ids(&d.surface));

        d.selection.select(Facet::Status, Vec::<String>::new());
        d.selection.select(Facet::Municipality, vec!["teresina"]);
        d.apply_filters();
        assert_eq!(vec!["p1"], rendered_ids(&d.surface));
    }

    #[test]
    fn apply_is_idempotent() {
        let mut d = dashboard();
        d.initialize(store());
        d.selection.select(Facet::Axis, vec!["Água", "Estradas"]);

        let first = d.apply_filters().unwrap();
        let first_ids = rendered_ids(&d.surface);
        let second = d.apply_filters().unwrap();
        assert_eq!(first, second);
        assert_eq!(first_ids, rendered_ids(&d.surface));
        assert_eq!(vec!["p1", "l1"], first_ids);
    }

    #[test]
    fn clear_equals_apply_on_empty_selection() {
        let mut d = dashboard();
        d.initialize(store());
        d.selection.select(Facet::Axis, vec!["Água"]);
        d.apply_filters();

        let cleared = d.clear_filters().unwrap();
        let cleared_ids = rendered_ids(&d.surface);

        let mut fresh = dashboard();
        let unfiltered = fresh.initialize(store()).unwrap();
        assert_eq!(unfiltered, cleared);
        assert_eq!(rendered_ids(&fresh.surface), cleared_ids);
        assert!(d.selection.state().is_unrestricted());
    }

    #[test]
    fn disabled_facets_do_not_constrain() {
        let mut config = Config::default();
        config.facets = vec![Facet::Axis];
        let mut d = Dashboard::new(config, FilterForm::new(), GeoJsonSurface::new());
        d.initialize(store());

        d.selection.select(Facet::Status, vec!["in_progress"]);
        assert_eq!(4, d.apply_filters().unwrap().rendered());
    }

    #[test]
    fn narrow_viewport_closes_the_sidebar() {
        let mut config = Config::default();
        config.viewport_width = 400;
        let mut d = Dashboard::new(config, FilterForm::new(), GeoJsonSurface::new());
        assert!(d.initialize(store()).unwrap().sidebar_closed);
        assert!(d.surface.sidebar_closed);

        let mut wide = dashboard();
        wide.initialize(store());
        assert!(!wide.surface.sidebar_closed);
    }

    #[test]
    fn events_drive_the_pipeline() {
        let (selection, mut form, events) = connect();
        let mut d = Dashboard::new(Config::default(), selection, GeoJsonSurface::new());
        d.initialize(store());

        form.sync();
        assert_eq!(vec!["Estradas", "Saúde", "Água"], form.options(Facet::Axis));

        form.select(Facet::Axis, vec!["Saúde"]);
        let summaries = d.pump_events(&events);
        assert_eq!(1, summaries.len());
        assert_eq!(vec!["p2"], rendered_ids(&d.surface));

        form.clear();
        let summaries = d.pump_events(&events);
        assert_eq!(4, summaries[0].rendered());
        form.sync();
        assert!(form.state().is_unrestricted());
    }

    struct Panel(Vec<String>);

    impl DetailSurface for Panel {
        fn is_mounted(&self) -> bool {
            true
        }

        fn show(&mut self, panel: &DetailPanel, _mini_map: &MiniMap) {
            self.0.push(panel.title.clone());
        }
    }

    #[test]
    fn detail_opens_by_id() {
        let mut d = dashboard();
        let mut panel = Panel(Vec::new());
        assert!(d.open_detail("p2", &mut panel).is_err());

        d.initialize(store());
        assert!(d.open_detail("p2", &mut panel).unwrap());
        assert!(d.open_detail("l1", &mut panel).unwrap());
        assert_eq!(vec!["Saúde", "Estradas"], panel.0);
        assert!(d.open_detail("missing", &mut panel).is_err());
    }
}
