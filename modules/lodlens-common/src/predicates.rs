use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::error::{LodLensError, Result};

/// Dictionary format version understood by this crate.
pub const DICTIONARY_VERSION: u32 = 1;

/// IRI used for the implicit relation of the inverse-same-as query.
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

const BUNDLED: &str = include_str!("../predicates.toml");

static BUILTIN: LazyLock<Arc<PredicateDictionary>> = LazyLock::new(|| {
    Arc::new(PredicateDictionary::from_toml_str(BUNDLED).expect("bundled predicates.toml is valid"))
});

/// Semantic label a predicate can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Types,
    Titles,
    Images,
    Longitudes,
    Latitudes,
    Points,
    Weblinks,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Types => "types",
            Category::Titles => "titles",
            Category::Images => "images",
            Category::Longitudes => "longitudes",
            Category::Latitudes => "latitudes",
            Category::Points => "points",
            Category::Weblinks => "weblinks",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DictionaryFile {
    version: u32,
    #[serde(default)]
    visual_only: Vec<Category>,
    categories: BTreeMap<Category, Vec<String>>,
}

/// Predicate IRI → categories index, plus the set of predicates that only
/// decorate a node.
#[derive(Debug, Clone, Default)]
pub struct PredicateDictionary {
    lookup: HashMap<String, Vec<Category>>,
    visual_only: HashSet<String>,
}

impl PredicateDictionary {
    /// The dictionary bundled with this crate, parsed on first use.
    pub fn builtin() -> &'static PredicateDictionary {
        &BUILTIN
    }

    /// Shared handle to the bundled dictionary.
    pub fn shared() -> Arc<PredicateDictionary> {
        Arc::clone(&BUILTIN)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DictionaryFile =
            toml::from_str(content).map_err(|e| LodLensError::Dictionary(e.to_string()))?;
        if file.version != DICTIONARY_VERSION {
            return Err(LodLensError::Dictionary(format!(
                "unsupported dictionary version {} (expected {DICTIONARY_VERSION})",
                file.version
            )));
        }
        Ok(Self::from_categories(file.categories, &file.visual_only))
    }

    /// Load a dictionary file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dictionary = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            predicates = dictionary.lookup.len(),
            "Loaded predicate dictionary"
        );
        Ok(dictionary)
    }

    /// Invert a category → predicates table.
    pub fn from_categories(
        categories: BTreeMap<Category, Vec<String>>,
        visual_only: &[Category],
    ) -> Self {
        let mut lookup: HashMap<String, Vec<Category>> = HashMap::new();
        let mut visual = HashSet::new();

        for (category, predicates) in categories {
            let is_visual = visual_only.contains(&category);
            for predicate in predicates {
                if is_visual {
                    visual.insert(predicate.clone());
                }
                let entry = lookup.entry(predicate).or_default();
                if !entry.contains(&category) {
                    entry.push(category);
                }
            }
        }

        Self {
            lookup,
            visual_only: visual,
        }
    }

    /// Categories `predicate` belongs to, empty for unknown predicates.
    pub fn categories(&self, predicate: &str) -> &[Category] {
        self.lookup
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_visual_only(&self, predicate: &str) -> bool {
        self.visual_only.contains(predicate)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
