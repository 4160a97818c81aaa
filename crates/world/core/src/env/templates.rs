use std::sync::Arc;

use crate::object::GameObjectTemplate;

/// Read-only access to game-object templates by entry id.
pub trait TemplateOracle: Send + Sync {
    fn template(&self, entry: u32) -> Option<Arc<GameObjectTemplate>>;
}
