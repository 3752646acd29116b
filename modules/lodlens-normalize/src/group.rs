use std::collections::HashMap;

use lodlens_common::{Edge, GroupedEdge, PredicateDictionary};
use tracing::debug;

/// Collapse resource links into the minimal edge set for a node-link diagram.
///
/// Visual-only predicates (images, coordinates, web links) are dropped first.
/// Links sharing an object are then merged into one record listing every
/// property, and records sharing the resulting property list are merged into
/// one record listing every object. Values keep first-seen order.
pub fn group(edges: &[Edge], dictionary: &PredicateDictionary) -> Vec<GroupedEdge> {
    let records: Vec<GroupedEdge> = edges
        .iter()
        .filter(|edge| !dictionary.is_visual_only(&edge.property))
        .map(|edge| GroupedEdge {
            property: vec![edge.property.clone()],
            object: vec![edge.object.clone()],
            inverse: false,
        })
        .collect();

    let by_object = merge_by(records, MergeField::Object);
    let grouped = merge_by(by_object, MergeField::Property);

    debug!(edges = edges.len(), grouped = grouped.len(), "Grouped relations");
    grouped
}

/// [`group`] for links returned by an inverse query: every record is marked
/// `inverse` so the renderer points the arrow at the described resource.
pub fn group_inverse(edges: &[Edge], dictionary: &PredicateDictionary) -> Vec<GroupedEdge> {
    let mut grouped = group(edges, dictionary);
    for edge in &mut grouped {
        edge.inverse = true;
    }
    grouped
}

#[derive(Debug, Clone, Copy)]
enum MergeField {
    Property,
    Object,
}

impl MergeField {
    fn other(self) -> Self {
        match self {
            MergeField::Property => MergeField::Object,
            MergeField::Object => MergeField::Property,
        }
    }

    fn get(self, edge: &GroupedEdge) -> &[String] {
        match self {
            MergeField::Property => &edge.property,
            MergeField::Object => &edge.object,
        }
    }

    fn get_mut(self, edge: &mut GroupedEdge) -> &mut Vec<String> {
        match self {
            MergeField::Property => &mut edge.property,
            MergeField::Object => &mut edge.object,
        }
    }
}

/// Merge records keyed by the comma-joined `key` field, folding the other
/// field's unseen values into the first record seen for each key.
fn merge_by(records: Vec<GroupedEdge>, key: MergeField) -> Vec<GroupedEdge> {
    let merge = key.other();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut output: Vec<GroupedEdge> = Vec::with_capacity(records.len());

    for record in records {
        let joined = key.get(&record).join(",");
        match index.get(&joined).copied() {
            Some(at) => {
                let target = merge.get_mut(&mut output[at]);
                for value in merge.get(&record) {
                    if !target.contains(value) {
                        target.push(value.clone());
                    }
                }
            }
            None => {
                index.insert(joined, output.len());
                output.push(record);
            }
        }
    }

    output
}
