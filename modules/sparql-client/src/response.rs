//! SPARQL JSON results decoding.
//!
//! Only `results.bindings` is read. Each binding must carry an `object`
//! term; `property` may be filled in by the caller for queries that leave
//! the relation implicit.

use lodlens_common::{Binding, Term};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SparqlError};

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(default, rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    datatype: Option<String>,
    #[serde(default, rename = "xml:lang")]
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBinding {
    #[serde(default)]
    property: Option<RawTerm>,
    object: RawTerm,
}

impl RawTerm {
    fn into_term(self) -> Term {
        match self.kind.as_str() {
            "uri" => Term::resource(self.value),
            "bnode" => Term::blank(self.value),
            kind => {
                let mut term = Term::literal(self.value);
                if kind == "typed-literal" {
                    if let Some(datatype) = self.datatype {
                        term = term.with_datatype(datatype);
                    }
                }
                match self.lang {
                    Some(lang) if !lang.is_empty() => term.with_language(lang),
                    _ => term,
                }
            }
        }
    }
}

/// Pull the bindings out of a SPARQL JSON response.
///
/// `default_property` is used for rows without a `property` term; without
/// it such rows make the response malformed.
pub fn decode_bindings(json: &Value, default_property: Option<&str>) -> Result<Vec<Binding>> {
    let Some(rows) = json.pointer("/results/bindings") else {
        return Err(SparqlError::MalformedResults(
            "missing results.bindings".to_string(),
        ));
    };
    let Value::Array(rows) = rows else {
        return Err(SparqlError::MalformedResults(
            "results.bindings is not a list".to_string(),
        ));
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Binding> {
            let raw = RawBinding::deserialize(row).map_err(|e| {
                SparqlError::MalformedResults(format!("binding {i}: {e}"))
            })?;
            let property = match (raw.property, default_property) {
                (Some(term), _) => term.value,
                (None, Some(default)) => default.to_string(),
                (None, None) => {
                    return Err(SparqlError::MalformedResults(format!(
                        "binding {i} has no property"
                    )))
                }
            };
            Ok(Binding::new(property, raw.object.into_term()))
        })
        .collect()
}
