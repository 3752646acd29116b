//! SparqlClient behaviour over a scripted in-memory transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lodlens_common::{Category, ClientConfig, GroupedEdge};
use serde_json::{json, Value};
use sparql_client::{Axis, Result, SparqlClient, SparqlError, SparqlTransport};

// ---------------------------------------------------------------------------
// Scripted transport: replays canned responses and records every query
// ---------------------------------------------------------------------------

struct ScriptedTransport {
    queries: Arc<Mutex<Vec<String>>>,
    responses: Mutex<VecDeque<Result<Value>>>,
}

#[async_trait]
impl SparqlTransport for ScriptedTransport {
    async fn select(&self, query: &str) -> Result<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SparqlError::Network("no scripted response left".into())))
    }
}

fn client_with(
    config: ClientConfig,
    responses: Vec<Result<Value>>,
) -> (SparqlClient, Arc<Mutex<Vec<String>>>) {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport {
        queries: queries.clone(),
        responses: Mutex::new(responses.into()),
    };
    let client = SparqlClient::new(Box::new(transport), &config).unwrap();
    (client, queries)
}

fn config_with_query(axis: &str, template: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.queries.insert(axis.to_string(), template.to_string());
    config
}

fn basic_results() -> Value {
    serde_json::from_str(include_str!("fixtures/basic-results.json")).unwrap()
}

fn rome_neighborhood() -> Value {
    serde_json::from_str(include_str!("fixtures/rome-neighborhood.json")).unwrap()
}

fn malformed() -> Value {
    json!({ "results": { "data": {} } })
}

fn uri_rows(rows: &[(&str, &str)]) -> Value {
    let bindings: Vec<Value> = rows
        .iter()
        .map(|(property, object)| {
            json!({
                "property": { "type": "uri", "value": property },
                "object": { "type": "uri", "value": object }
            })
        })
        .collect();
    json!({ "results": { "bindings": bindings } })
}

fn same_as_rows(objects: &[&str]) -> Value {
    let bindings: Vec<Value> = objects
        .iter()
        .map(|object| json!({ "object": { "type": "uri", "value": object } }))
        .collect();
    json!({ "results": { "bindings": bindings } })
}

const ROME: &str = "http://dbpedia.org/resource/Rome";
const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sends_configured_query() {
    let (client, queries) = client_with(config_with_query("document", "QUERY"), vec![Ok(basic_results())]);

    client.document("").await.unwrap();

    assert_eq!(*queries.lock().unwrap(), vec!["QUERY".to_string()]);
}

#[tokio::test]
async fn substitutes_iri_into_template() {
    let (client, queries) =
        client_with(config_with_query("inverse", "QUERY {URI}"), vec![Ok(basic_results())]);

    client.inverse("test").await.unwrap();

    assert_eq!(*queries.lock().unwrap(), vec!["QUERY test".to_string()]);
}

#[tokio::test]
async fn strips_routing_prefix_before_substitution() {
    let (client, queries) =
        client_with(config_with_query("inverse", "Q {URI}"), vec![Ok(basic_results())]);

    client.inverse("ns~~local").await.unwrap();

    assert_eq!(*queries.lock().unwrap(), vec!["Q local".to_string()]);
}

#[tokio::test]
async fn falls_back_to_default_queries() {
    let (client, queries) = client_with(ClientConfig::default(), vec![Ok(basic_results())]);

    client.bnode("").await.unwrap();

    assert_eq!(
        *queries.lock().unwrap(),
        vec!["SELECT DISTINCT *  WHERE {<> ?property ?object}".to_string()]
    );
}

#[tokio::test]
async fn empty_configured_query_falls_back_to_default() {
    let (client, queries) = client_with(config_with_query("document", ""), vec![Ok(basic_results())]);

    client.document("http://example.org/a").await.unwrap();

    assert_eq!(
        *queries.lock().unwrap(),
        vec!["SELECT DISTINCT * WHERE {<http://example.org/a> ?property ?object}".to_string()]
    );
}

#[tokio::test]
async fn sends_inverse_same_as_query() {
    let (client, queries) =
        client_with(config_with_query("inverseSameAs", "QUERY"), vec![Ok(same_as_rows(&[]))]);

    client.inverse_same_as("").await.unwrap();

    assert_eq!(*queries.lock().unwrap(), vec!["QUERY".to_string()]);
}

#[test]
fn rejects_unknown_axis_in_config() {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport {
        queries,
        responses: Mutex::new(VecDeque::new()),
    };
    let result = SparqlClient::new(Box::new(transport), &config_with_query("describe", "Q"));
    assert!(matches!(result, Err(SparqlError::Config(_))));
}

#[test]
fn query_is_exposed_for_every_axis() {
    let (client, _) = client_with(ClientConfig::default(), vec![]);
    for axis in Axis::ALL {
        assert!(client.query(axis, ROME).contains(ROME), "{axis}");
    }
}

// ---------------------------------------------------------------------------
// Malformed responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_document_is_an_error() {
    let (client, queries) = client_with(config_with_query("document", "QUERY"), vec![Ok(malformed())]);

    let err = client.document("").await.unwrap_err();

    assert_eq!(queries.lock().unwrap().len(), 1);
    assert!(err.to_string().contains("malformed results"));
}

#[tokio::test]
async fn malformed_document_uri_is_an_error() {
    let mut config = config_with_query("documentUri", "QUERY");
    config.do_inverse = true;
    let (client, queries) = client_with(config, vec![Ok(malformed())]);

    let err = client.document_uri("").await.unwrap_err();

    assert!(matches!(err, SparqlError::MalformedResults(_)));
    // No follow-up queries after a failed primary.
    assert_eq!(queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_inverse_is_an_error() {
    let (client, _) = client_with(config_with_query("inverse", "QUERY"), vec![Ok(malformed())]);

    let err = client.inverse("").await.unwrap_err();

    assert!(err.to_string().contains("malformed results"));
}

#[tokio::test]
async fn transport_errors_pass_through() {
    let (client, _) = client_with(
        ClientConfig::default(),
        vec![Err(SparqlError::Api {
            status: 503,
            message: "busy".into(),
        })],
    );

    let err = client.document(ROME).await.unwrap_err();

    assert!(matches!(err, SparqlError::Api { status: 503, .. }));
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn parses_document_results() {
    let (client, _) = client_with(config_with_query("document", "QUERY"), vec![Ok(basic_results())]);

    let result = client.document("").await.unwrap();

    assert_eq!(result.related.len(), 1);
    assert_eq!(result.values.len(), 1);
    assert_eq!(result.bnodes.len(), 1);
    assert!(result.grouped.is_empty());
    assert_eq!(result.values[0].language.as_deref(), Some("it"));
}

#[tokio::test]
async fn parses_inverse_results() {
    let (client, _) = client_with(config_with_query("inverse", "QUERY"), vec![Ok(basic_results())]);

    let result = client.inverse("").await.unwrap();

    assert_eq!(result.related.len(), 1);
    assert_eq!(result.values.len(), 1);
    assert_eq!(result.bnodes.len(), 1);
}

#[tokio::test]
async fn parses_document_uri_results() {
    let (client, _) = client_with(config_with_query("documentUri", "QUERY"), vec![Ok(basic_results())]);

    let result = client.document_uri("").await.unwrap();

    assert_eq!(result.related.len(), 1);
    assert_eq!(result.values.len(), 1);
    assert_eq!(result.bnodes.len(), 1);
    assert_eq!(result.grouped.len(), 1);
    assert!(!result.grouped[0].inverse);
}

#[tokio::test]
async fn document_uri_extracts_and_groups_neighborhood() {
    let (client, _) = client_with(ClientConfig::default(), vec![Ok(rome_neighborhood())]);

    let result = client.document_uri(ROME).await.unwrap();

    assert_eq!(result.extracted(Category::Types).len(), 2);
    assert_eq!(result.extracted(Category::Titles).len(), 1);
    assert_eq!(result.extracted(Category::Latitudes).len(), 1);
    assert_eq!(result.extracted(Category::Images).len(), 1);
    assert_eq!(
        result.values[1].datatype.as_deref(),
        Some("http://www.w3.org/2001/XMLSchema#float")
    );

    assert_eq!(
        result.grouped,
        vec![
            GroupedEdge {
                property: vec!["http://www.w3.org/1999/02/22-rdf-syntax-ns#type".into()],
                object: vec![
                    "http://dbpedia.org/ontology/City".into(),
                    "http://dbpedia.org/ontology/Place".into(),
                ],
                inverse: false,
            },
            GroupedEdge {
                property: vec![
                    "http://dbpedia.org/ontology/country".into(),
                    "http://dbpedia.org/property/capital".into(),
                ],
                object: vec!["http://dbpedia.org/resource/Italy".into()],
                inverse: false,
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// document_uri chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn document_uri_skips_inverse_unless_enabled() {
    let (client, queries) = client_with(ClientConfig::default(), vec![Ok(basic_results())]);

    client.document_uri(ROME).await.unwrap();

    assert_eq!(queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn document_uri_appends_inverse_edges() {
    let config = ClientConfig {
        do_inverse: true,
        ..ClientConfig::default()
    };
    let (client, queries) = client_with(
        config,
        vec![
            Ok(basic_results()),
            Ok(uri_rows(&[
                ("http://dbpedia.org/ontology/capital", "http://dbpedia.org/resource/Italy"),
                ("http://dbpedia.org/ontology/birthPlace", "http://dbpedia.org/resource/Nero"),
                ("http://dbpedia.org/ontology/birthPlace", "http://dbpedia.org/resource/Caligula"),
            ])),
        ],
    );

    let result = client.document_uri(ROME).await.unwrap();

    let queries = queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert!(queries[1].starts_with("SELECT DISTINCT * WHERE {?object ?property <http://dbpedia.org/resource/Rome>.}"));

    assert_eq!(result.grouped.len(), 3);
    assert!(!result.grouped[0].inverse);
    assert!(result.grouped[1..].iter().all(|g| g.inverse));
    assert_eq!(
        result.grouped[2].object,
        vec![
            "http://dbpedia.org/resource/Nero".to_string(),
            "http://dbpedia.org/resource/Caligula".to_string(),
        ]
    );
    // Inverse rows never leak into the primary buckets.
    assert_eq!(result.related.len(), 1);
}

#[tokio::test]
async fn document_uri_adds_same_as_edges_before_inverse_ones() {
    let config = ClientConfig {
        do_inverse: true,
        do_inverse_same_as: true,
        ..ClientConfig::default()
    };
    let (client, queries) = client_with(
        config,
        vec![
            Ok(basic_results()),
            Ok(uri_rows(&[(
                "http://dbpedia.org/ontology/capital",
                "http://dbpedia.org/resource/Italy",
            )])),
            Ok(same_as_rows(&[
                "http://www.wikidata.org/entity/Q220",
                "http://sws.geonames.org/3169070/",
            ])),
        ],
    );

    let result = client.document_uri(ROME).await.unwrap();

    assert_eq!(queries.lock().unwrap().len(), 3);
    assert_eq!(result.grouped.len(), 3);
    assert_eq!(
        result.grouped[1],
        GroupedEdge {
            property: vec![OWL_SAME_AS.to_string()],
            object: vec![
                "http://www.wikidata.org/entity/Q220".to_string(),
                "http://sws.geonames.org/3169070/".to_string(),
            ],
            inverse: true,
        }
    );
    assert_eq!(result.grouped[2].property, vec!["http://dbpedia.org/ontology/capital".to_string()]);
    assert!(result.grouped[2].inverse);
}

#[tokio::test]
async fn document_uri_survives_inverse_failure() {
    let config = ClientConfig {
        do_inverse: true,
        ..ClientConfig::default()
    };
    let (client, _) = client_with(
        config,
        vec![Ok(basic_results()), Err(SparqlError::Network("connection reset".into()))],
    );

    let result = client.document_uri(ROME).await.unwrap();

    assert_eq!(result.grouped.len(), 1);
    assert!(!result.grouped[0].inverse);
    assert_eq!(result.values.len(), 1);
}

#[tokio::test]
async fn document_uri_survives_same_as_failure() {
    let config = ClientConfig {
        do_inverse: true,
        do_inverse_same_as: true,
        ..ClientConfig::default()
    };
    let (client, queries) = client_with(
        config,
        vec![
            Ok(basic_results()),
            Ok(uri_rows(&[(
                "http://dbpedia.org/ontology/capital",
                "http://dbpedia.org/resource/Italy",
            )])),
            Ok(malformed()),
        ],
    );

    let result = client.document_uri(ROME).await.unwrap();

    assert_eq!(queries.lock().unwrap().len(), 3);
    // The whole inverse stage is dropped, not just the same-as part.
    assert_eq!(result.grouped.len(), 1);
    assert!(result.grouped.iter().all(|g| !g.inverse));
}

#[tokio::test]
async fn inverse_same_as_fills_missing_property() {
    let (client, _) = client_with(
        ClientConfig::default(),
        vec![Ok(same_as_rows(&["http://www.wikidata.org/entity/Q220"]))],
    );

    let result = client.inverse_same_as(ROME).await.unwrap();

    assert_eq!(result.related.len(), 1);
    assert_eq!(result.related[0].property, OWL_SAME_AS);
    assert_eq!(result.related[0].object, "http://www.wikidata.org/entity/Q220");
}

#[tokio::test]
async fn missing_property_is_malformed_outside_same_as() {
    let (client, _) = client_with(
        ClientConfig::default(),
        vec![Ok(same_as_rows(&["http://www.wikidata.org/entity/Q220"]))],
    );

    let err = client.inverse(ROME).await.unwrap_err();

    assert!(err.to_string().contains("malformed results"));
}
