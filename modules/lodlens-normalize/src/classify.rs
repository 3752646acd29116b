use lodlens_common::{
    BlankEdge, Binding, Edge, Field, ParsedResult, PredicateDictionary, Statement, TermKind,
};
use tracing::debug;

/// Sort result rows into literal values, resource links and blank-node links,
/// and copy each row into every extraction category its predicate belongs to.
///
/// Input order is preserved in every bucket. Nothing is dropped here; the
/// grouper decides which links become graph edges.
pub fn classify(bindings: &[Binding], dictionary: &PredicateDictionary) -> ParsedResult {
    let mut result = ParsedResult::default();

    for binding in bindings {
        let property = binding.property.clone();
        let object = &binding.object;

        let statement = match object.kind {
            TermKind::Blank => {
                let edge = BlankEdge {
                    property,
                    bnode: object.value.clone(),
                };
                result.bnodes.push(edge.clone());
                Statement::Blank(edge)
            }
            TermKind::Resource => {
                let edge = Edge {
                    property,
                    object: object.value.clone(),
                };
                result.related.push(edge.clone());
                Statement::Related(edge)
            }
            TermKind::Literal => {
                let field = Field {
                    property,
                    value: object.value.clone(),
                    datatype: object.datatype.clone(),
                    language: object.language.clone(),
                };
                result.values.push(field.clone());
                Statement::Value(field)
            }
        };

        for category in dictionary.categories(&binding.property) {
            result
                .extracted
                .entry(*category)
                .or_default()
                .push(statement.clone());
        }
    }

    debug!(
        rows = bindings.len(),
        values = result.values.len(),
        related = result.related.len(),
        bnodes = result.bnodes.len(),
        "Classified bindings"
    );

    result
}
