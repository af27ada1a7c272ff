//! Task catalog: per-category task name lists plus custom categories.
//!
//! This is the `tasks` / `customCategories` half of the JSON export shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::earnings::Category;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCatalog {
    /// Category key -> task names offered for that category.
    #[serde(default)]
    pub tasks: BTreeMap<String, Vec<String>>,
    /// User-defined category names, beyond the five fixed buckets.
    #[serde(default)]
    pub custom_categories: Vec<String>,
}

impl TaskCatalog {
    /// Catalog seeded with the five fixed categories, no tasks.
    pub fn with_defaults() -> Self {
        let mut tasks = BTreeMap::new();
        for c in Category::ALL {
            tasks.insert(c.key().to_string(), Vec::new());
        }
        Self {
            tasks,
            custom_categories: Vec::new(),
        }
    }

    /// Register a custom category. Rejects empty names and names that
    /// collide with a fixed bucket key or an existing custom category.
    pub fn add_custom_category(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("category".to_string()));
        }
        if Category::from_key(name).is_some() || self.custom_categories.iter().any(|c| c == name) {
            return Err(ValidationError::AlreadyExists {
                field: "category".to_string(),
                value: name.to_string(),
            });
        }
        self.custom_categories.push(name.to_string());
        self.tasks.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Add a task name under a category (fixed or custom).
    pub fn add_task(&mut self, category: &str, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("task".to_string()));
        }
        self.tasks
            .entry(category.to_string())
            .or_default()
            .push(name.to_string());
        Ok(())
    }

    pub fn is_known_category(&self, key: &str) -> bool {
        Category::from_key(key).is_some() || self.custom_categories.iter().any(|c| c == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_fixed_buckets() {
        let catalog = TaskCatalog::with_defaults();
        assert_eq!(catalog.tasks.len(), 5);
        assert!(catalog.tasks.contains_key("selfImprovement"));
    }

    #[test]
    fn custom_category_registration() {
        let mut catalog = TaskCatalog::with_defaults();
        catalog.add_custom_category("piano").unwrap();
        assert!(catalog.is_known_category("piano"));
        assert!(catalog.add_custom_category("piano").is_err());
        assert!(catalog.add_custom_category("bodyHealth").is_err());
        assert!(catalog.add_custom_category("   ").is_err());
    }
}
