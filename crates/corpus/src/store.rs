//! Corpus store: the static collection of wisdom items.
//!
//! Loaded once at startup from a JSON array of [`Item`] records and read-only
//! afterwards. A `Corpus` is never empty: construction fails with
//! [`CorpusError::Empty`] instead, which lets the local selector stay
//! infallible.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use stoa_core::error::CorpusError;
use stoa_core::item::Item;
use tracing::{debug, info};

use crate::tagging;

/// The corpus bundled into the binary.
const BUILTIN_CORPUS: &str = include_str!("../data/wisdom.json");

/// An immutable, non-empty, id-indexed collection of items.
#[derive(Debug, Clone)]
pub struct Corpus {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Corpus {
    /// Build a corpus, validating ids and content.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CorpusError> {
        if items.is_empty() {
            return Err(CorpusError::Empty);
        }

        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CorpusError::InvalidItem {
                    index: position,
                    reason: "blank id".into(),
                });
            }
            if item.text.trim().is_empty() {
                return Err(CorpusError::InvalidItem {
                    index: position,
                    reason: format!("item '{}' has blank text", item.id),
                });
            }
            if index.insert(item.id.clone(), position).is_some() {
                return Err(CorpusError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self { items, index })
    }

    /// Parse a JSON array of items.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let items: Vec<Item> =
            serde_json::from_str(json).map_err(|e| CorpusError::Parse(e.to_string()))?;
        Self::from_items(items)
    }

    /// Load a JSON corpus file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let corpus = Self::from_json(&content)?;
        info!(path = %path.display(), items = corpus.len(), "Corpus loaded");
        Ok(corpus)
    }

    /// The corpus shipped with the crate.
    pub fn builtin() -> Result<Self, CorpusError> {
        Self::from_json(BUILTIN_CORPUS)
    }

    /// Load from `path` (or the built-in corpus), optionally auto-tagging.
    pub fn open(path: Option<&Path>, auto_tag: bool) -> Result<Self, CorpusError> {
        let corpus = match path {
            Some(path) => Self::load(path)?,
            None => {
                let corpus = Self::builtin()?;
                debug!(items = corpus.len(), "Using built-in corpus");
                corpus
            }
        };

        if auto_tag {
            Ok(corpus.auto_tagged())
        } else {
            Ok(corpus)
        }
    }

    /// A copy with missing tags and preferences filled in by keyword rules.
    pub fn auto_tagged(self) -> Self {
        let mut changed = 0usize;
        let items: Vec<Item> = self
            .items
            .into_iter()
            .map(|item| {
                let tagged = tagging::tag_item(item.clone());
                if tagged != item {
                    changed += 1;
                }
                tagged
            })
            .collect();
        debug!(changed, "Auto-tagging applied");
        // Ids and text are untouched, so the index stays valid.
        Self {
            items,
            index: self.index,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Tag name → number of items carrying it.
    pub fn tag_histogram(&self) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for tag in self.items.iter().flat_map(|item| item.tags.iter()) {
            *histogram.entry(tag.clone()).or_insert(0) += 1;
        }
        histogram
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
