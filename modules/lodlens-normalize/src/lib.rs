//! Turns the rows of a "describe this resource" SPARQL query into buckets of
//! literal values, links and blank nodes, and links into grouped graph edges.

pub mod classify;
pub mod group;

pub use classify::classify;
pub use group::{group, group_inverse};
