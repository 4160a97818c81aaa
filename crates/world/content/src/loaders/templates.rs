//! Game object template catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::GameObjectTemplate;

use crate::loaders::{LoadResult, parse_ron};

/// Template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<GameObjectTemplate>,
}

pub struct TemplateLoader;

impl TemplateLoader {
    /// Loads the catalog, rejecting duplicate entries.
    pub fn load(path: &Path) -> LoadResult<Vec<GameObjectTemplate>> {
        let catalog: TemplateCatalog = parse_ron(path, "template catalog")?;
        let mut seen = HashSet::new();
        for template in &catalog.templates {
            anyhow::ensure!(
                seen.insert(template.entry),
                "duplicate template entry {} in {}",
                template.entry,
                path.display()
            );
        }
        tracing::debug!(count = catalog.templates.len(), "templates loaded");
        Ok(catalog.templates)
    }
}
