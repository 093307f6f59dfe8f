use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod attributes;
pub mod config;
pub mod detail;
pub mod events;
pub mod facets;
pub mod filter;
pub mod helpers;
pub mod icons;
pub mod pipeline;
pub mod reader;
pub mod render;
pub mod selection;
pub mod statistics;
pub mod store;

pub type MyResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug)]
pub enum DashboardError {
    Load { path: PathBuf, reason: String },
    UnknownFacet(String),
    InvalidSelection(String),
    FeatureNotFound(String),
    Config(String),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            DashboardError::Load { path, reason } => {
                write!(f, "could not load {}: {}", path.display(), reason)
            }
            DashboardError::UnknownFacet(name) => write!(f, "unknown facet \"{}\"", name),
            DashboardError::InvalidSelection(raw) => {
                write!(f, "invalid selection \"{}\", expected facet=value", raw)
            }
            DashboardError::FeatureNotFound(id) => write!(f, "no feature with id \"{}\"", id),
            DashboardError::Config(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for DashboardError {}
