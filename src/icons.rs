use crate::attributes::direct_attribute;

use geojson::Feature;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const AXIS_ATTRIBUTE: &str = "Eixo";
pub const STATUS_ATTRIBUTE: &str = "Status_atual";

const DEFAULT_AXIS: &str = "padrao";
const DEFAULT_STATUS: &str = "indefinido";

const RENAMED_STATUS: (&str, &str) = ("no_progress", "sem_evolucao");

/// Lowercases, strips diacritics and periods, and turns every whitespace run
/// into a single underscore.
pub fn normalize_token(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.to_lowercase().nfd() {
        if is_combining_mark(c) || c == '.' {
            continue;
        }
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        out.push(c);
    }

    out
}

pub fn resolve_icon_key(feature: &Feature) -> String {
    let axis = direct_attribute(feature, AXIS_ATTRIBUTE).unwrap_or_else(|| DEFAULT_AXIS.to_owned());
    let mut status =
        direct_attribute(feature, STATUS_ATTRIBUTE).unwrap_or_else(|| DEFAULT_STATUS.to_owned());

    if status == RENAMED_STATUS.0 {
        status = RENAMED_STATUS.1.to_owned();
    }

    format!("{}_{}", normalize_token(&axis), normalize_token(&status))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconSpec {
    pub url: String,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl IconSpec {
    pub fn for_key(icon_dir: &str, key: &str) -> IconSpec {
        IconSpec {
            url: format!("{}/{}.svg", icon_dir.trim_end_matches('/'), key),
            size: [32, 32],
            anchor: [16, 32],
            popup_anchor: [0, -32],
        }
    }
}
