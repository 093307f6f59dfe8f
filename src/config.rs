use crate::facets::Facet;
use crate::DashboardError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub points_path: PathBuf,
    pub lines_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub icon_dir: String,
    pub viewport_width: u32,
    /// Viewports at most this wide close the side panel after filtering.
    pub narrow_viewport_px: u32,
    pub detail_retry_delay_ms: u64,
    pub facets: Vec<Facet>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            points_path: PathBuf::from("data/pontos.geojson"),
            lines_path: PathBuf::from("data/linhas.geojson"),
            boundaries_path: PathBuf::from("data/municipios.geojson"),
            icon_dir: "icones/icones_camadas".to_owned(),
            viewport_width: 1280,
            narrow_viewport_px: 600,
            detail_retry_delay_ms: 100,
            facets: Facet::ALL.to_vec(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, DashboardError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        let file = std::io::BufReader::new(file);
        serde_json::from_reader(file)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn is_narrow_viewport(&self) -> bool {
        self.viewport_width <= self.narrow_viewport_px
    }

    pub fn detail_retry_delay(&self) -> Duration {
        Duration::from_millis(self.detail_retry_delay_ms)
    }
}
