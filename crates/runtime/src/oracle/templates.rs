use std::collections::HashMap;
use std::sync::Arc;

use world_core::{GameObjectTemplate, TemplateOracle};

/// Template lookup by entry.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<u32, Arc<GameObjectTemplate>>,
}

impl TemplateRegistry {
    /// Later templates replace earlier ones with the same entry.
    pub fn new(templates: impl IntoIterator<Item = GameObjectTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.entry, Arc::new(template)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateOracle for TemplateRegistry {
    fn template(&self, entry: u32) -> Option<Arc<GameObjectTemplate>> {
        self.templates.get(&entry).cloned()
    }
}
