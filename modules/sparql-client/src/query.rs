use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::error::{Result, SparqlError};

static URI_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\{URI\}").unwrap());

/// Separator between an internal routing prefix and the IRI proper.
const ROUTING_SEPARATOR: &str = "~~";

/// The query roles the client knows how to run against one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Document,
    Bnode,
    DocumentUri,
    Inverse,
    InverseSameAs,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Document,
        Axis::Bnode,
        Axis::DocumentUri,
        Axis::Inverse,
        Axis::InverseSameAs,
    ];

    /// Name used for template overrides in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Document => "document",
            Axis::Bnode => "bnode",
            Axis::DocumentUri => "documentUri",
            Axis::Inverse => "inverse",
            Axis::InverseSameAs => "inverseSameAs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Axis::ALL.into_iter().find(|axis| axis.as_str() == name)
    }

    /// Built-in template used when no override is configured.
    pub fn default_template(&self) -> &'static str {
        match self {
            Axis::DocumentUri => {
                "SELECT DISTINCT * WHERE {<{URI}> ?property ?object} ORDER BY ?property"
            }
            Axis::Document => "SELECT DISTINCT * WHERE {<{URI}> ?property ?object}",
            Axis::Bnode => "SELECT DISTINCT *  WHERE {<{URI}> ?property ?object}",
            Axis::Inverse => "SELECT DISTINCT * WHERE {?object ?property <{URI}>.} LIMIT 100",
            Axis::InverseSameAs => {
                "SELECT DISTINCT * WHERE {{?object <http://www.w3.org/2002/07/owl#sameAs> <{URI}> } UNION { ?object <http://www.w3.org/2004/02/skos/core#exactMatch> <{URI}>}}"
            }
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-axis query templates, falling back to the built-in ones.
#[derive(Debug, Clone, Default)]
pub struct QueryTemplates {
    overrides: HashMap<Axis, String>,
}

impl QueryTemplates {
    /// Build from configuration overrides keyed by axis name. Unknown names
    /// are rejected; blank templates leave the built-in one in place.
    pub fn from_overrides(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut templates = Self::default();
        for (name, template) in overrides {
            let axis = Axis::from_name(name)
                .ok_or_else(|| SparqlError::Config(format!("unknown query axis: {name}")))?;
            if template.trim().is_empty() {
                continue;
            }
            templates.overrides.insert(axis, template.clone());
        }
        Ok(templates)
    }

    pub fn template(&self, axis: Axis) -> &str {
        self.overrides
            .get(&axis)
            .map(String::as_str)
            .unwrap_or_else(|| axis.default_template())
    }

    /// The query to send for `iri` on `axis`.
    pub fn render(&self, axis: Axis, iri: &str) -> String {
        substitute(self.template(axis), iri)
    }
}

/// Replace every `{URI}` (any case) in `template` with `iri`, minus any
/// routing prefix up to the last `~~`.
pub fn substitute(template: &str, iri: &str) -> String {
    let iri = strip_routing_prefix(iri);
    URI_PLACEHOLDER
        .replace_all(template, NoExpand(iri))
        .into_owned()
}

fn strip_routing_prefix(iri: &str) -> &str {
    match iri.rfind(ROUTING_SEPARATOR) {
        Some(at) => &iri[at + ROUTING_SEPARATOR.len()..],
        None => iri,
    }
}
