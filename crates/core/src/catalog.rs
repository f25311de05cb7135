use crate::category::Category;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::error;

/// Mob type name whose entries apply to every mob without its own.
pub const DEFAULT_MOB: &str = "default";

/// Catalog written on first start.
pub const DEFAULT_CATALOG: &str = include_str!("../resources/messages.yml");

/// Candidate messages per mob type and category key.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct TemplateCatalog {
    mobs: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl TemplateCatalog {
    /// Loads the catalog, writing the bundled default first if the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<TemplateCatalog> {
        if !path.exists() {
            if let Err(err) = fs::write(path, DEFAULT_CATALOG) {
                error!("Could not save default messages to {}: {}", path.display(), err);
            }
            return TemplateCatalog::from_yaml_str(DEFAULT_CATALOG);
        }
        let str = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        TemplateCatalog::from_yaml_str(&str)
            .with_context(|| format!("Invalid messages in {}", path.display()))
    }

    pub fn from_yaml_str(str: &str) -> Result<TemplateCatalog> {
        // An empty document deserializes to unit, not to an empty map.
        if str.trim().is_empty() {
            return Ok(TemplateCatalog::default());
        }
        let catalog: TemplateCatalog = serde_yaml_ng::from_str(str)?;
        Ok(TemplateCatalog {
            mobs: catalog
                .mobs
                .into_iter()
                .map(|(mob, categories)| (mob.to_lowercase(), categories))
                .collect(),
        })
    }

    /// Adds templates for `mob_type` and `category`, e.g. from code or tests.
    pub fn insert(&mut self, mob_type: &str, category: Category, templates: Vec<String>) {
        self.mobs
            .entry(mob_type.to_lowercase())
            .or_default()
            .insert(category.key().to_owned(), templates);
    }

    fn templates(&self, mob_type: &str, category: Category) -> Option<&[String]> {
        self.mobs
            .get(mob_type)
            .and_then(|categories| categories.get(category.key()))
            .map(Vec::as_slice)
            .filter(|templates| !templates.is_empty())
    }

    /// Returns the templates configured for the mob type, or those of the
    /// `default` mob when there are none. `None` means nothing can be sent.
    pub fn lookup(&self, mob_type: &str, category: Category) -> Option<&[String]> {
        let mob_type = mob_type.to_lowercase();
        self.templates(&mob_type, category)
            .or_else(|| self.templates(DEFAULT_MOB, category))
    }

    pub fn mob_types(&self) -> impl Iterator<Item = &str> {
        self.mobs.keys().map(String::as_str)
    }

    /// Number of templates per category key for one mob type.
    pub fn counts(&self, mob_type: &str) -> Vec<(&str, usize)> {
        self.mobs
            .get(mob_type)
            .map(|categories| {
                categories
                    .iter()
                    .map(|(key, templates)| (key.as_str(), templates.len()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds `(mob, key)` pairs whose key names no category. Such entries are
    /// never used.
    pub fn validate(&self) -> Vec<(&str, &str)> {
        self.mobs
            .iter()
            .flat_map(|(mob, categories)| {
                categories
                    .keys()
                    .filter(|key| key.parse::<Category>().is_err())
                    .map(move |key| (mob.as_str(), key.as_str()))
            })
            .collect()
    }
}
