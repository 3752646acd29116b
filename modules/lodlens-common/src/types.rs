use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::predicates::Category;

// --- RDF terms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    Resource,
    Blank,
    Literal,
}

/// The object side of a result row.
///
/// `datatype` and `language` are only ever set on literals, and never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub kind: TermKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Term {
    pub fn resource(iri: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Resource,
            value: iri.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Blank,
            value: label.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Typed literal. Clears any language tag.
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self.language = None;
        self
    }

    /// Language-tagged literal. Ignored when a datatype is already set.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        if self.datatype.is_none() {
            self.language = Some(language.into());
        }
        self
    }
}

/// One row of a neighborhood query: `<subject> property object`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub property: String,
    pub object: Term,
}

impl Binding {
    pub fn new(property: impl Into<String>, object: Term) -> Self {
        Self {
            property: property.into(),
            object,
        }
    }
}

// --- Classifier output ---

/// A literal value attached to the described resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub property: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A link to another named resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub property: String,
    pub object: String,
}

impl Edge {
    pub fn new(property: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            object: object.into(),
        }
    }
}

/// A link to a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankEdge {
    pub property: String,
    pub bnode: String,
}

/// Whatever a single binding was classified into. Extracted category buckets
/// hold the same statement that went into `values`, `related` or `bnodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Statement {
    Value(Field),
    Related(Edge),
    Blank(BlankEdge),
}

impl Statement {
    pub fn property(&self) -> &str {
        match self {
            Statement::Value(field) => &field.property,
            Statement::Related(edge) => &edge.property,
            Statement::Blank(edge) => &edge.property,
        }
    }
}

// --- Grouper output ---

/// A deduplicated relation ready for rendering.
///
/// After the object-then-property merge, a record either has one object and
/// one or more properties, or a property set shared by several objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedEdge {
    pub property: Vec<String>,
    pub object: Vec<String>,
    #[serde(default)]
    pub inverse: bool,
}

/// Everything derived from one query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub extracted: BTreeMap<Category, Vec<Statement>>,
    pub grouped: Vec<GroupedEdge>,
    pub values: Vec<Field>,
    pub related: Vec<Edge>,
    pub bnodes: Vec<BlankEdge>,
}

impl ParsedResult {
    /// Statements extracted for `category`, empty when none were seen.
    pub fn extracted(&self, category: Category) -> &[Statement] {
        self.extracted
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
