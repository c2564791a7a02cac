use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::coords::{Color, Mat4, Vec2};
use crate::render::Texture;
use crate::resources::ResourceCache;
use crate::scene::ZIndex;

use super::{SerialMap, WorldError};

/// Identifier of a scene node, stable across save and load.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(NodeId)
    }
}

/// Local placement of a node relative to its parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    pub scale: Vec2,
    /// Local-space point that `position` refers to and rotation turns about.
    pub pivot: Vec2,
    pub z_index: ZIndex,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::splat(1.0),
            pivot: Vec2::zero(),
            z_index: ZIndex(0),
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.position)
            * Mat4::rotation_z(self.rotation)
            * Mat4::scale(self.scale)
            * Mat4::translation(-self.pivot)
    }

    pub(crate) fn save(&self) -> SerialMap {
        let mut map = SerialMap::new();
        map.set("Position", self.position)
            .set("Rotation", self.rotation)
            .set("Scale", self.scale)
            .set("Pivot", self.pivot)
            .set("ZIndex", self.z_index.0);
        map
    }

    pub(crate) fn load(map: &SerialMap) -> Result<Self, WorldError> {
        Ok(Self {
            position: map.parse("Position")?,
            rotation: map.parse("Rotation")?,
            scale: map.parse("Scale")?,
            pivot: map.parse("Pivot")?,
            z_index: ZIndex(map.parse("ZIndex")?),
        })
    }
}

/// What node data may consult while loading.
#[derive(Debug, Clone, Copy)]
pub struct LoadCtx<'a> {
    pub resources: &'a ResourceCache,
}

/// Type-specific payload of a [`SceneNode`].
pub trait NodeData: fmt::Debug + Send {
    /// Tag written as the node's `Type`; must match its registry entry.
    fn type_tag(&self) -> &'static str;

    fn save(&self, map: &mut SerialMap);

    fn load(&mut self, map: &SerialMap, ctx: &LoadCtx<'_>) -> Result<(), WorldError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A node with no payload; groups and pivots.
#[derive(Debug, Default)]
pub struct EmptyNode;

impl NodeData for EmptyNode {
    fn type_tag(&self) -> &'static str {
        "Empty"
    }

    fn save(&self, _map: &mut SerialMap) {}

    fn load(&mut self, _map: &SerialMap, _ctx: &LoadCtx<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A textured quad.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture_key: String,
    pub texture: Option<Arc<Texture>>,
    pub size: Vec2,
    pub tint: Color,
}

impl Default for Sprite {
    fn default() -> Self {
        Self { texture_key: String::new(), texture: None, size: Vec2::zero(), tint: Color::white() }
    }
}

impl NodeData for Sprite {
    fn type_tag(&self) -> &'static str {
        "Sprite"
    }

    fn save(&self, map: &mut SerialMap) {
        let t = self.tint;
        map.set("Texture", &self.texture_key)
            .set("Size", self.size)
            .set("Tint", format_args!("{},{},{},{}", t.r, t.g, t.b, t.a));
    }

    fn load(&mut self, map: &SerialMap, ctx: &LoadCtx<'_>) -> Result<(), WorldError> {
        let key = map.require("Texture")?;
        self.texture = Some(ctx.resources.texture(key)?);
        self.texture_key = key.to_string();
        self.size = map.parse("Size")?;
        self.tint = parse_color("Tint", map.require("Tint")?)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn parse_color(field: &str, raw: &str) -> Result<Color, WorldError> {
    let malformed = |reason: String| WorldError::Malformed {
        field: field.to_string(),
        value: raw.to_string(),
        reason,
    };
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(e.to_string()))?;
    match parts[..] {
        [r, g, b, a] => Ok(Color::new(r, g, b, a)),
        _ => Err(malformed(format!("expected 4 components, got {}", parts.len()))),
    }
}

/// An entry of the scene graph.
#[derive(Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub enabled: bool,
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub data: Box<dyn NodeData>,
}

impl SceneNode {
    pub fn new(id: NodeId, name: impl Into<String>, data: Box<dyn NodeData>) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            parent: None,
            transform: Transform::default(),
            data,
        }
    }

    /// Downcasts the payload.
    pub fn data_as<T: NodeData + 'static>(&self) -> Option<&T> {
        self.data.as_any().downcast_ref()
    }

    pub fn data_as_mut<T: NodeData + 'static>(&mut self) -> Option<&mut T> {
        self.data.as_any_mut().downcast_mut()
    }

    pub(crate) fn save(&self) -> SerialMap {
        let mut base = SerialMap::new();
        base.set("Name", &self.name).set("IsEnabled", self.enabled);
        if let Some(parent) = self.parent {
            base.set("Parent", parent);
        }

        let mut data = SerialMap::new();
        self.data.save(&mut data);

        let mut map = SerialMap::new();
        map.set("Id", self.id)
            .set("Type", self.data.type_tag())
            .set_map("Base", base)
            .set_map("Transform", self.transform.save())
            .set_map("Data", data);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_matrix_applies_pivot_then_scale_then_translation() {
        let t = Transform {
            position: Vec2::new(100.0, 50.0),
            scale: Vec2::splat(2.0),
            pivot: Vec2::new(5.0, 5.0),
            ..Transform::default()
        };
        assert_eq!(t.matrix().transform_point(Vec2::new(5.0, 5.0)), Vec2::new(100.0, 50.0));
        assert_eq!(t.matrix().transform_point(Vec2::new(6.0, 5.0)), Vec2::new(102.0, 50.0));
    }

    #[test]
    fn color_needs_four_components() {
        assert_eq!(parse_color("Tint", "1,0,0,1").unwrap(), Color::new(1.0, 0.0, 0.0, 1.0));
        assert!(parse_color("Tint", "1,0,0").is_err());
        assert!(parse_color("Tint", "1,x,0,1").is_err());
    }
}
