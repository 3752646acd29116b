pub mod config;
pub mod error;
pub mod predicates;
pub mod types;

pub use config::{load_config, ClientConfig, ConnectionConfig};
pub use error::{LodLensError, Result};
pub use predicates::{Category, PredicateDictionary, OWL_SAME_AS};
pub use types::*;
