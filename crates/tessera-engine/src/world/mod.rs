//! Scene graph and its persistence container.
//!
//! A [`World`] saves to and loads from a [`SerialMap`]. Loading builds a
//! fresh world and fails as a whole: an unknown type, a malformed field, a
//! dangling parent or a missing resource leaves nothing half-built.

mod error;
mod node;
mod registry;
mod serial;

use std::collections::BTreeMap;

use crate::coords::Mat4;

pub use error::WorldError;
pub use node::{EmptyNode, LoadCtx, NodeData, NodeId, SceneNode, Sprite, Transform};
pub use registry::{NodeFactory, NodeRegistry};
pub use serial::SerialMap;

const NODES_KEY: &str = "Nodes";
const NEXT_ID_KEY: &str = "NextId";

#[derive(Debug, Default)]
pub struct World {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn spawn(&mut self, name: impl Into<String>, data: Box<dyn NodeData>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode::new(id, name, data));
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.values().filter(move |n| n.parent == Some(id)).map(|n| n.id)
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), WorldError> {
        if !self.nodes.contains_key(&id) {
            return Err(WorldError::NoSuchNode(id));
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return Err(WorldError::NoSuchNode(p));
            }
            if self.ancestors_and_self(p).any(|a| a == id) {
                return Err(WorldError::Cycle { node: id, parent: p });
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Removes `id` and its whole subtree. Returns how many nodes went.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            if self.nodes.remove(&next).is_some() {
                removed += 1;
                stack.extend(self.children(next).collect::<Vec<_>>());
            }
        }
        removed
    }

    /// Enabled only if the node and every ancestor are.
    pub fn is_effectively_enabled(&self, id: NodeId) -> bool {
        self.get(id).is_some()
            && self
                .ancestors_and_self(id)
                .all(|a| self.nodes.get(&a).is_some_and(|n| n.enabled))
    }

    /// Composed transform from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let chain: Vec<NodeId> = self.ancestors_and_self(id).collect();
        chain
            .iter()
            .rev()
            .filter_map(|a| self.nodes.get(a))
            .fold(Mat4::identity(), |acc, n| acc * n.transform.matrix())
    }

    fn ancestors_and_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = Some(id);
        let mut steps = 0usize;
        let limit = self.nodes.len();
        // Bounded so that a cyclic map being validated still terminates.
        std::iter::from_fn(move || {
            let node = self.nodes.get(&current?)?;
            steps += 1;
            current = if steps > limit { None } else { node.parent };
            Some(node.id)
        })
    }

    // ── persistence ───────────────────────────────────────────────────────

    pub fn save(&self) -> SerialMap {
        let mut nodes = SerialMap::new();
        for node in self.nodes.values() {
            nodes.set_map(node.id.to_string(), node.save());
        }
        let mut map = SerialMap::new();
        map.set(NEXT_ID_KEY, self.next_id).set_map(NODES_KEY, nodes);
        map
    }

    /// Builds a world from `map`. Nothing is returned unless every node
    /// loaded and every parent reference resolved.
    pub fn load(map: &SerialMap, registry: &NodeRegistry, ctx: &LoadCtx<'_>) -> Result<World, WorldError> {
        let mut world = World::new();
        let entries = map.require_map(NODES_KEY)?;

        for entry in entries.maps.values() {
            let node = load_node(entry, registry, ctx)?;
            if world.nodes.contains_key(&node.id) {
                return Err(WorldError::DuplicateId(node.id));
            }
            // The id after the highest loaded one must still be allocatable.
            let Some(after) = node.id.0.checked_add(1) else {
                return Err(WorldError::Malformed {
                    field: "Id".into(),
                    value: node.id.0.to_string(),
                    reason: "no node ids left after it".into(),
                });
            };
            world.next_id = world.next_id.max(after);
            world.nodes.insert(node.id, node);
        }

        for node in world.nodes.values() {
            if let Some(parent) = node.parent {
                if !world.nodes.contains_key(&parent) {
                    return Err(WorldError::DanglingParent { node: node.id, parent });
                }
            }
        }
        for id in world.nodes.keys() {
            if world.ancestors_and_self(*id).count() > world.nodes.len() {
                let parent = world.nodes[id].parent.unwrap_or(*id);
                return Err(WorldError::Cycle { node: *id, parent });
            }
        }

        if let Some(next) = map.parse_opt::<u64>(NEXT_ID_KEY)? {
            world.next_id = world.next_id.max(next);
        }
        log::debug!("world loaded with {} nodes", world.len());
        Ok(world)
    }
}

fn load_node(entry: &SerialMap, registry: &NodeRegistry, ctx: &LoadCtx<'_>) -> Result<SceneNode, WorldError> {
    let id: NodeId = entry.parse("Id")?;
    let mut data = registry.create(entry.require("Type")?)?;

    let base = entry.require_map("Base")?;
    let transform = Transform::load(entry.require_map("Transform")?)?;
    if let Some(payload) = entry.map("Data") {
        data.load(payload, ctx)?;
    } else {
        data.load(&SerialMap::new(), ctx)?;
    }

    Ok(SceneNode {
        id,
        name: base.require("Name")?.to_string(),
        enabled: base.parse("IsEnabled")?,
        parent: base.parse_opt("Parent")?,
        transform,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Color, Vec2};
    use crate::device::RecordingDriver;
    use crate::resources::{ResourceCache, ResourceData, ResourceError, ResourceKind, ResourceProvider};
    use crate::scene::ZIndex;

    struct OneTexture;

    impl ResourceProvider for OneTexture {
        fn load(&self, key: &str, _kind: ResourceKind) -> Result<ResourceData, ResourceError> {
            match key {
                "grass" => Ok(ResourceData::Texture { pixels: vec![0; 16], width: 2, height: 2 }),
                _ => Err(ResourceError::NotFound(key.to_string())),
            }
        }
    }

    fn resources() -> ResourceCache {
        let mut cache = ResourceCache::new(OneTexture);
        let mut driver = RecordingDriver::default();
        cache.load_now(&mut driver, "grass", ResourceKind::Texture).unwrap();
        cache
    }

    fn sample_world() -> (World, NodeId, NodeId) {
        let mut world = World::new();
        let root = world.spawn("root", Box::new(EmptyNode));
        let sprite = world.spawn(
            "tile",
            Box::new(Sprite {
                texture_key: "grass".into(),
                size: Vec2::new(16.0, 16.0),
                tint: Color::new(1.0, 0.5, 0.25, 1.0),
                ..Sprite::default()
            }),
        );
        world.set_parent(sprite, Some(root)).unwrap();
        if let Some(node) = world.get_mut(sprite) {
            node.transform.position = Vec2::new(3.0, 4.0);
            node.transform.z_index = ZIndex(2);
        }
        (world, root, sprite)
    }

    // ── structure ─────────────────────────────────────────────────────────

    #[test]
    fn reparenting_under_descendant_is_a_cycle() {
        let (mut world, root, sprite) = sample_world();
        assert!(matches!(world.set_parent(root, Some(sprite)), Err(WorldError::Cycle { .. })));
    }

    #[test]
    fn remove_takes_subtree() {
        let (mut world, root, _) = sample_world();
        world.spawn("other", Box::new(EmptyNode));
        assert_eq!(world.remove(root), 2);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn disabled_ancestor_disables_descendants() {
        let (mut world, root, sprite) = sample_world();
        assert!(world.is_effectively_enabled(sprite));
        if let Some(node) = world.get_mut(root) {
            node.enabled = false;
        }
        assert!(!world.is_effectively_enabled(sprite));
    }

    // ── persistence ───────────────────────────────────────────────────────

    #[test]
    fn save_uses_node_schema() {
        let (world, _, sprite) = sample_world();
        let saved = world.save();
        let node = saved.map("Nodes").and_then(|n| n.map(&sprite.to_string())).unwrap();

        assert_eq!(node.get("Type"), Some("Sprite"));
        assert_eq!(node.map("Base").and_then(|b| b.get("Parent")), Some("0"));
        assert_eq!(node.map("Transform").and_then(|t| t.get("Position")), Some("3,4"));
        assert_eq!(node.map("Transform").and_then(|t| t.get("ZIndex")), Some("2"));
        assert_eq!(node.map("Data").and_then(|d| d.get("Texture")), Some("grass"));
    }

    #[test]
    fn load_round_trips_through_json() {
        let (world, _, sprite) = sample_world();
        let json = serde_json::to_string(&world.save()).unwrap();
        let map: SerialMap = serde_json::from_str(&json).unwrap();

        let cache = resources();
        let loaded = World::load(&map, &NodeRegistry::with_builtins(), &LoadCtx { resources: &cache }).unwrap();

        assert_eq!(loaded.len(), 2);
        let node = loaded.get(sprite).unwrap();
        assert_eq!(node.transform.position, Vec2::new(3.0, 4.0));
        let data = node.data_as::<Sprite>().unwrap();
        assert!(data.texture.is_some());
        assert_eq!(data.tint, Color::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(loaded.save(), world.save());
    }

    #[test]
    fn highest_possible_id_is_rejected() {
        let mut world = World::new();
        world.spawn("root", Box::new(EmptyNode));
        let saved = world.save();
        let mut entry = saved.map("Nodes").and_then(|n| n.map("0")).cloned().unwrap();
        entry.set("Id", u64::MAX);

        let mut nodes = SerialMap::new();
        nodes.set_map(u64::MAX.to_string(), entry);
        let mut map = SerialMap::new();
        map.set_map("Nodes", nodes);

        let cache = resources();
        let err = World::load(&map, &NodeRegistry::with_builtins(), &LoadCtx { resources: &cache }).unwrap_err();
        assert!(matches!(err, WorldError::Malformed { ref field, .. } if field == "Id"));
    }

    #[test]
    fn missing_resource_aborts_load() {
        let (mut world, _, sprite) = sample_world();
        if let Some(s) = world.get_mut(sprite).and_then(|n| n.data_as_mut::<Sprite>()) {
            s.texture_key = "lava".into();
        }
        let cache = resources();
        let err = World::load(&world.save(), &NodeRegistry::with_builtins(), &LoadCtx { resources: &cache })
            .unwrap_err();
        assert!(matches!(err, WorldError::Resource(ResourceError::NotFound(k)) if k == "lava"));
    }

    #[test]
    fn unknown_type_and_dangling_parent_abort_load() {
        let (world, root, _) = sample_world();
        let cache = resources();
        let ctx = LoadCtx { resources: &cache };

        let mut registry = NodeRegistry::new();
        registry.register("Empty", || Box::new(EmptyNode));
        assert!(matches!(
            World::load(&world.save(), &registry, &ctx),
            Err(WorldError::UnknownType(t)) if t == "Sprite"
        ));

        let mut saved = world.save();
        if let Some(nodes) = saved.maps.get_mut("Nodes") {
            nodes.maps.remove(&root.to_string());
        }
        assert!(matches!(
            World::load(&saved, &NodeRegistry::with_builtins(), &ctx),
            Err(WorldError::DanglingParent { .. })
        ));
    }
}
