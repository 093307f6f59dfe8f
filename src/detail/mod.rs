use crate::attributes::{feature_attribute, lookup, JsonObject};
use crate::facets::Facet;
use crate::helpers::{features_bounds, Bounds};

use geojson::Feature;
use log::{debug, warn};
use serde::Serialize;

use std::fmt::{Display, Formatter};
use std::thread;
use std::time::Duration;

pub mod format;
mod popup;

pub use self::popup::popup_html;

use self::format::{format_currency, format_date_value, format_percent, NOT_INFORMED};

const TEXT_FIELDS: [(&str, Facet); 8] = [
    ("Município", Facet::Municipality),
    ("Território", Facet::Territory),
    ("Órgão", Facet::Agency),
    ("Situação", Facet::Status),
    ("Classificação", Facet::Classification),
    ("Subclassificação", Facet::SubClassification),
    ("Tipologia", Facet::Typology),
    ("Ação", Facet::ActionId),
];

const CURRENCY_FIELDS: [(&str, &str); 3] = [
    ("Valor total", "VALOR TOTAL"),
    ("Valor empenhado", "VALOR EMPENHADO"),
    ("Valor pago", "VALOR PAGO"),
];

const DATE_FIELDS: [(&str, &str); 4] = [
    ("Celebração", "Data de Celebração"),
    ("Início", "DATA DE INÍCIO"),
    ("Conclusão", "DATA DE CONCLUSÃO"),
    ("Recebimento", "Data de Recebimento"),
];

const PERCENT_FIELD: (&str, &str) = ("Execução", "PERCENTUAL EXECUTADO");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl DetailPanel {
    pub fn from_feature(feature: &Feature) -> DetailPanel {
        let title =
            feature_attribute(feature, Facet::Axis.attribute()).unwrap_or_else(|| "Detalhes".to_owned());
        let empty = JsonObject::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);

        let mut rows: Vec<(String, String)> = TEXT_FIELDS
            .iter()
            .map(|(label, facet)| {
                let value = feature_attribute(feature, facet.attribute())
                    .unwrap_or_else(|| NOT_INFORMED.to_owned());
                (label.to_string(), value)
            })
            .collect();

        rows.extend(CURRENCY_FIELDS.iter().map(|(label, key)| {
            (label.to_string(), format_currency(lookup(props, key)))
        }));
        rows.extend(DATE_FIELDS.iter().map(|(label, key)| {
            (label.to_string(), format_date_value(lookup(props, key)))
        }));
        rows.push((
            PERCENT_FIELD.0.to_string(),
            format_percent(lookup(props, PERCENT_FIELD.1)),
        ));

        DetailPanel { title, rows }
    }

    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for DetailPanel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        writeln!(f, "{}", self.title)?;
        for (label, value) in &self.rows {
            writeln!(f, "  {}: {}", label, value)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MiniMap {
    pub id: u64,
    pub bounds: Option<Bounds>,
}

impl Drop for MiniMap {
    fn drop(&mut self) {
        debug!("mini-map {} released", self.id);
    }
}

pub trait DetailSurface {
    fn is_mounted(&self) -> bool;
    fn show(&mut self, panel: &DetailPanel, mini_map: &MiniMap);
}

#[derive(Debug)]
pub struct DetailView {
    mini_map: Option<MiniMap>,
    next_id: u64,
    retry_delay: Duration,
}

impl DetailView {
    pub fn new(retry_delay: Duration) -> DetailView {
        DetailView {
            mini_map: None,
            next_id: 0,
            retry_delay,
        }
    }

    pub fn mini_map(&self) -> Option<&MiniMap> {
        self.mini_map.as_ref()
    }

    /// Shows `feature` on `surface`. If the surface is not mounted it is checked
    /// once more after the retry delay; returns whether the panel was shown.
    pub fn open<D: DetailSurface>(&mut self, surface: &mut D, feature: &Feature) -> bool {
        if !surface.is_mounted() {
            thread::sleep(self.retry_delay);
            if !surface.is_mounted() {
                warn!("detail panel not mounted, giving up");
                return false;
            }
        }

        let panel = DetailPanel::from_feature(feature);

        // the previous mini-map has to be gone before the next one exists
        drop(self.mini_map.take());
        self.next_id += 1;
        let mini_map = MiniMap {
            id: self.next_id,
            bounds: features_bounds(std::iter::once(feature)),
        };

        surface.show(&panel, &mini_map);
        self.mini_map = Some(mini_map);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_feature;
    use geojson::Value;
    use serde_json::json;
    use std::cell::Cell;

    struct Panel {
        mounted_after: Cell<u32>,
        shown: Vec<(String, u64)>,
    }

    impl DetailSurface for Panel {
        fn is_mounted(&self) -> bool {
            let left = self.mounted_after.get();
            if left == 0 {
                true
            } else {
                self.mounted_after.set(left - 1);
                false
            }
        }

        fn show(&mut self, panel: &DetailPanel, mini_map: &MiniMap) {
            self.shown.push((panel.title.clone(), mini_map.id));
        }
    }

    fn record() -> Feature {
        test_feature(
            Some("7"),
            Some(Value::Point(vec![-42.8, -5.1])),
            json!({
                "Eixo": "Água",
                "Localizacao (municipio)": "TERESINA",
                "valor total": "1500000.5",
                "VALOR PAGO": 0,
                "Data de Celebração": "2022-05-10T00:00:00",
                "PERCENTUAL EXECUTADO": 37.26
            }),
        )
    }

    #[test]
    fn panel_formats_fields() {
        let panel = DetailPanel::from_feature(&record());
        assert_eq!("Água", panel.title);
        assert_eq!(Some("TERESINA"), panel.row("Município"));
        assert_eq!(Some(NOT_INFORMED), panel.row("Órgão"));
        assert_eq!(Some("R$ 1.500.000,50"), panel.row("Valor total"));
        assert_eq!(Some(NOT_INFORMED), panel.row("Valor pago"));
        assert_eq!(Some("10/05/2022"), panel.row("Celebração"));
        assert_eq!(Some("37,3%"), panel.row("Execução"));
    }

    #[test]
    fn reopening_replaces_the_mini_map() {
        let mut view = DetailView::new(Duration::from_millis(0));
        let mut panel = Panel {
            mounted_after: Cell::new(0),
            shown: Vec::new(),
        };

        assert!(view.open(&mut panel, &record()));
        assert!(view.open(&mut panel, &record()));
        assert_eq!(vec![("Água".to_owned(), 1), ("Água".to_owned(), 2)], panel.shown);
        assert_eq!(2, view.mini_map().unwrap().id);
        assert!(view.mini_map().unwrap().bounds.is_some());
    }

    #[test]
    fn retries_once_when_not_mounted() {
        let mut view = DetailView::new(Duration::from_millis(1));

        let mut late = Panel {
            mounted_after: Cell::new(1),
            shown: Vec::new(),
        };
        assert!(view.open(&mut late, &record()));
        assert_eq!(1, late.shown.len());

        let mut missing = Panel {
            mounted_after: Cell::new(2),
            shown: Vec::new(),
        };
        assert!(!view.open(&mut missing, &record()));
        assert!(missing.shown.is_empty());
    }
}
