use crate::attributes::feature_attribute;
use crate::DashboardError;

use geojson::Feature;
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

pub const TERRITORIES: [&str; 12] = [
    "CARNAUBAIS",
    "CHAPADA DAS MANGABEIRAS",
    "CHAPADA VALE DO ITAIM",
    "COCAIS",
    "ENTRE-RIOS",
    "PLANÍCIE LITORÂNEA",
    "SERRA DA CAPIVARA",
    "TABULEIRO DO ALTO PARNAÍBA",
    "VALE DO RIO CANINDÉ",
    "VALE DO RIO GUARIBAS",
    "VALE DO RIO SAMBITO",
    "VALE DOS RIOS PIAUÍ E ITAUEIRAS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Contains,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Municipality,
    Territory,
    Agency,
    Status,
    Axis,
    Classification,
    SubClassification,
    Typology,
    ReceptionDate,
    CelebrationYear,
    ActionId,
}

impl Facet {
    pub const ALL: [Facet; 11] = [
        Facet::Municipality,
        Facet::Territory,
        Facet::Agency,
        Facet::Status,
        Facet::Axis,
        Facet::Classification,
        Facet::SubClassification,
        Facet::Typology,
        Facet::ReceptionDate,
        Facet::CelebrationYear,
        Facet::ActionId,
    ];

    pub fn attribute(self) -> &'static str {
        match self {
            Facet::Municipality => "Localizacao (municipio)",
            Facet::Territory => "TERRITORIO_COMPOSTO",
            Facet::Agency => "Orgão da Açao",
            Facet::Status => "Status_atual",
            Facet::Axis => "Eixo",
            Facet::Classification => "CLASSIFICAÇÃO",
            Facet::SubClassification => "SUB-CLASSIFICAÇÃO OBRA",
            Facet::Typology => "TIPOLOGIA",
            Facet::ReceptionDate => "Data de Recebimento",
            Facet::CelebrationYear => "Data de Celebração",
            Facet::ActionId => "ID_ACAO",
        }
    }

    pub fn control_id(self) -> &'static str {
        match self {
            Facet::Municipality => "filtro-municipio",
            Facet::Territory => "filtro-territorio",
            Facet::Agency => "filtro-orgao",
            Facet::Status => "filtro-situacao",
            Facet::Axis => "filtro-eixo",
            Facet::Classification => "filtro-classificacao",
            Facet::SubClassification => "filtro-subclassificacao",
            Facet::Typology => "filtro-tipologia",
            Facet::ReceptionDate => "filtro-recebimento",
            Facet::CelebrationYear => "filtro-ano-celebracao",
            Facet::ActionId => "filtro-acao",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Facet::Municipality => "municipality",
            Facet::Territory => "territory",
            Facet::Agency => "agency",
            Facet::Status => "status",
            Facet::Axis => "axis",
            Facet::Classification => "classification",
            Facet::SubClassification => "sub_classification",
            Facet::Typology => "typology",
            Facet::ReceptionDate => "reception_date",
            Facet::CelebrationYear => "celebration_year",
            Facet::ActionId => "action_id",
        }
    }

    pub fn rule(self) -> MatchRule {
        match self {
            Facet::Municipality | Facet::Territory => MatchRule::Contains,
            _ => MatchRule::Exact,
        }
    }

    pub fn value_of(self, feature: &Feature) -> Option<String> {
        let raw = feature_attribute(feature, self.attribute())?;
        match self {
            Facet::CelebrationYear => celebration_year(&raw),
            _ => Some(raw),
        }
    }

    pub fn extract(self, features: &[&Feature]) -> Vec<String> {
        features
            .iter()
            .filter_map(|f| self.value_of(f))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromStr for Facet {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Facet::ALL
            .iter()
            .copied()
            .find(|f| f.control_id() == name || f.name() == name)
            .ok_or_else(|| DashboardError::UnknownFacet(name.to_owned()))
    }
}

pub fn celebration_year(date: &str) -> Option<String> {
    let year: String = date.chars().take(4).collect();
    if year.chars().count() == 4 {
        Some(year)
    } else {
        None
    }
}

/// Sorted distinct non-empty values of `attribute` across `features`.
///
/// Ordering is plain code-point order, so `"B"` sorts before `"a"`.
pub fn extract_facet_values<'a, I>(features: I, attribute: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Feature>,
{
    features
        .into_iter()
        .filter_map(|f| feature_attribute(f, attribute))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub type FacetOptions = BTreeMap<Facet, Vec<String>>;

pub fn collect_options(
    enabled: &[Facet],
    features: &[&Feature],
    municipality_names: &[String],
) -> FacetOptions {
    enabled
        .iter()
        .map(|&facet| {
            let options = match facet {
                Facet::Municipality => municipality_names
                    .iter()
                    .map(|n| n.trim().to_uppercase())
                    .filter(|n| !n.is_empty())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                Facet::Territory => TERRITORIES.iter().map(|t| t.to_string()).collect(),
                _ => facet.extract(features),
            };
            (facet, options)
        })
        .collect()
}
