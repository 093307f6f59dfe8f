use crate::attributes::{is_truthy, stringify};
use crate::helpers::escape_html;
use crate::icons::AXIS_ATTRIBUTE;

use geojson::Feature;

const HIDDEN_KEYS: [&str; 11] = [
    "id",
    "fid",
    "geometry",
    "project_id",
    "element_name",
    "origem",
    "tipo_geo",
    "COD_IBGE_COMPOSTO",
    "tags",
    "provisory",
    "definitive",
];

pub fn popup_html(feature: &Feature) -> String {
    let props = match feature.properties {
        Some(ref p) => p,
        None => return String::new(),
    };

    let mut html =
        String::from(r#"<div class="popup-content" style="min-width: 200px; font-family: sans-serif;">"#);

    match props.get(AXIS_ATTRIBUTE).filter(|v| is_truthy(v)) {
        Some(axis) => html.push_str(&format!(
            r#"<h3 style="margin:0 0 5px 0;">{}</h3>"#,
            escape_html(&stringify(axis))
        )),
        None => html.push_str("<h3>Detalhes</h3>"),
    }

    for (key, value) in props {
        if key == AXIS_ATTRIBUTE || HIDDEN_KEYS.contains(&key.as_str()) || !is_truthy(value) {
            continue;
        }
        html.push_str(&format!(
            "<b>{}:</b> {}<br>",
            escape_html(key),
            escape_html(&stringify(value))
        ));
    }

    html.push_str("</div>");
    html
}
