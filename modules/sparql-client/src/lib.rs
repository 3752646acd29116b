pub mod error;
pub mod query;
pub mod response;
pub mod transport;

pub use error::{Result, SparqlError};
pub use query::{substitute, Axis, QueryTemplates};
pub use transport::{HttpTransport, SparqlTransport};

use std::sync::Arc;

use lodlens_common::{ClientConfig, Edge, ParsedResult, PredicateDictionary, OWL_SAME_AS};
use lodlens_normalize::{classify, group, group_inverse};
use tracing::{debug, error, warn};

/// Describes the neighborhood of one resource against a SPARQL endpoint.
///
/// Each axis resolves exactly once: `Ok` with the normalized result or `Err`
/// with what went wrong.
pub struct SparqlClient {
    transport: Box<dyn SparqlTransport>,
    templates: QueryTemplates,
    dictionary: Arc<PredicateDictionary>,
    do_inverse: bool,
    do_inverse_same_as: bool,
}

impl SparqlClient {
    /// Client using the bundled predicate dictionary.
    pub fn new(transport: Box<dyn SparqlTransport>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport,
            templates: QueryTemplates::from_overrides(&config.queries)?,
            dictionary: PredicateDictionary::shared(),
            do_inverse: config.do_inverse,
            do_inverse_same_as: config.do_inverse_same_as,
        })
    }

    pub fn with_dictionary(mut self, dictionary: Arc<PredicateDictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// The query string sent for `iri` on `axis`.
    pub fn query(&self, axis: Axis, iri: &str) -> String {
        self.templates.render(axis, iri)
    }

    /// Outgoing properties and values of `iri`.
    pub async fn document(&self, iri: &str) -> Result<ParsedResult> {
        self.fetch(Axis::Document, iri).await
    }

    /// Properties of a blank node.
    pub async fn bnode(&self, iri: &str) -> Result<ParsedResult> {
        self.fetch(Axis::Bnode, iri).await
    }

    /// Resources linking to `iri`.
    pub async fn inverse(&self, iri: &str) -> Result<ParsedResult> {
        self.fetch(Axis::Inverse, iri).await
    }

    /// Resources declared the same as `iri`. The query leaves the relation
    /// implicit, so rows without a property get `owl:sameAs`.
    pub async fn inverse_same_as(&self, iri: &str) -> Result<ParsedResult> {
        self.fetch(Axis::InverseSameAs, iri).await
    }

    /// Describe `iri` and group its links into graph edges, adding inverse
    /// links when configured.
    ///
    /// Only the primary query can fail the call. If the inverse or
    /// inverse-same-as query fails, the primary result is returned without
    /// inverse edges.
    pub async fn document_uri(&self, iri: &str) -> Result<ParsedResult> {
        let mut results = self.fetch(Axis::DocumentUri, iri).await?;
        results.grouped = group(&results.related, &self.dictionary);

        if !self.do_inverse {
            return Ok(results);
        }

        match self.inverse_related(iri).await {
            Ok(related) => {
                let inverse = group_inverse(&related, &self.dictionary);
                debug!(iri, inverse = inverse.len(), "Adding inverse edges");
                results.grouped.extend(inverse);
            }
            Err(err) => {
                warn!(iri, error = %err, "Inverse query failed, returning primary results only");
            }
        }

        Ok(results)
    }

    /// Links pointing at `iri`: same-as links first, then plain inverse ones.
    async fn inverse_related(&self, iri: &str) -> Result<Vec<Edge>> {
        let inverse = self.inverse(iri).await?;
        if !self.do_inverse_same_as {
            return Ok(inverse.related);
        }

        let mut related = self.inverse_same_as(iri).await?.related;
        related.extend(inverse.related);
        Ok(related)
    }

    async fn fetch(&self, axis: Axis, iri: &str) -> Result<ParsedResult> {
        let query = self.query(axis, iri);
        debug!(%axis, iri, "Running SPARQL query");

        let json = self.transport.select(&query).await?;

        let default_property = match axis {
            Axis::InverseSameAs => Some(OWL_SAME_AS),
            _ => None,
        };
        let bindings = match response::decode_bindings(&json, default_property) {
            Ok(bindings) => bindings,
            Err(err) => {
                error!(%axis, response = %json, error = %err, "Malformed SPARQL response");
                return Err(err);
            }
        };

        Ok(classify(&bindings, &self.dictionary))
    }
}
