use std::collections::HashMap;

use super::node::{EmptyNode, NodeData, Sprite};
use super::WorldError;

pub type NodeFactory = fn() -> Box<dyn NodeData>;

/// Maps a node `Type` tag to a constructor for its payload.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// An empty registry. See [`with_builtins`](Self::with_builtins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `Empty` and `Sprite`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Empty", || Box::new(EmptyNode));
        registry.register("Sprite", || Box::new(Sprite::default()));
        registry
    }

    /// Registers `factory` under `tag`, replacing any previous entry.
    pub fn register(&mut self, tag: impl Into<String>, factory: NodeFactory) {
        let tag = tag.into();
        if self.factories.insert(tag.clone(), factory).is_some() {
            log::warn!("node type `{tag}` registered twice; last registration wins");
        }
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn create(&self, tag: &str) -> Result<Box<dyn NodeData>, WorldError> {
        self.factories
            .get(tag)
            .map(|factory| factory())
            .ok_or_else(|| WorldError::UnknownType(tag.to_string()))
    }
}
