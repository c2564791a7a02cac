use crate::coords::Rect;

use super::error::RenderError;

/// A named float attribute inside an interleaved vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: String,
    /// Float components (1..=4).
    pub components: u8,
}

impl VertexAttribute {
    pub fn new(name: impl Into<String>, components: u8) -> Self {
        Self { name: name.into(), components }
    }
}

/// CPU-side geometry: interleaved `f32` vertices described by `attributes`,
/// plus a triangle index list.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    attributes: Vec<VertexAttribute>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Validates the vertex/index data against the attribute layout.
    pub fn new(
        attributes: Vec<VertexAttribute>,
        vertices: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<Self, RenderError> {
        if attributes.is_empty() {
            return Err(RenderError::InvalidMesh("no vertex attributes".into()));
        }
        if let Some(bad) = attributes.iter().find(|a| !(1..=4).contains(&a.components)) {
            return Err(RenderError::InvalidMesh(format!(
                "attribute `{}` has {} components",
                bad.name, bad.components
            )));
        }
        let mesh = Self { attributes, vertices, indices };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Two triangles covering `rect`, with `position` and `uv` attributes.
    pub fn quad(rect: Rect) -> Self {
        Self {
            attributes: vec![VertexAttribute::new("position", 2), VertexAttribute::new("uv", 2)],
            vertices: quad_vertices(rect),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        let stride = self.stride_floats();
        if self.vertices.len() % stride != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "{} floats is not a multiple of the {stride}-float stride",
                self.vertices.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "{} indices do not form whole triangles",
                self.indices.len()
            )));
        }
        let count = self.vertex_count() as u32;
        if let Some(&i) = self.indices.iter().find(|&&i| i >= count) {
            return Err(RenderError::InvalidMesh(format!("index {i} out of {count} vertices")));
        }
        Ok(())
    }

    #[inline]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn stride_floats(&self) -> usize {
        self.attributes.iter().map(|a| a.components as usize).sum()
    }

    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.stride_floats() * std::mem::size_of::<f32>()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride_floats()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Byte offset of each attribute whose name equals `name`.
    pub fn attribute_offsets<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, &'a VertexAttribute)> + 'a {
        let mut offset = 0usize;
        self.attributes.iter().filter_map(move |a| {
            let this = offset;
            offset += a.components as usize * std::mem::size_of::<f32>();
            (a.name == name).then_some((this, a))
        })
    }

    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// True when `other` has the same attribute set and topology, so that
    /// replacing `self` by `other` only changes vertex contents.
    pub fn same_shape(&self, other: &Mesh) -> bool {
        self.attributes == other.attributes
            && self.indices == other.indices
            && self.vertices.len() == other.vertices.len()
    }

    /// Replaces the vertex contents, keeping the layout and topology.
    pub fn set_vertices(&mut self, vertices: Vec<f32>) -> Result<(), RenderError> {
        if vertices.len() != self.vertices.len() {
            return Err(RenderError::InvalidMesh(format!(
                "vertex update has {} floats, mesh has {}",
                vertices.len(),
                self.vertices.len()
            )));
        }
        self.vertices = vertices;
        Ok(())
    }
}

/// `position.xy, uv.xy` for the four corners of `rect`, clockwise from the
/// top-left.
pub fn quad_vertices(rect: Rect) -> Vec<f32> {
    let min = rect.min();
    let max = rect.max();
    vec![
        min.x, min.y, 0.0, 0.0, //
        max.x, min.y, 1.0, 0.0, //
        max.x, max.y, 1.0, 1.0, //
        min.x, max.y, 0.0, 1.0, //
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_interleaved_layout() {
        let mesh = Mesh::quad(Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(mesh.stride_floats(), 4);
        assert_eq!(mesh.stride_bytes(), 16);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.vertex_bytes().len(), 64);
        assert_eq!(mesh.index_bytes().len(), 24);
    }

    #[test]
    fn attribute_offsets_are_byte_offsets() {
        let mesh = Mesh::quad(Rect::new(0.0, 0.0, 1.0, 1.0));
        let uv: Vec<_> = mesh.attribute_offsets("uv").map(|(o, _)| o).collect();
        assert_eq!(uv, vec![8]);
        assert_eq!(mesh.attribute_offsets("color").count(), 0);
    }

    #[test]
    fn rejects_partial_vertices() {
        let err = Mesh::new(vec![VertexAttribute::new("position", 2)], vec![0.0; 3], vec![]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMesh(_)));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new(
            vec![VertexAttribute::new("position", 2)],
            vec![0.0; 6],
            vec![0, 1, 3],
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidMesh(_)));
    }

    #[test]
    fn same_shape_ignores_vertex_contents() {
        let a = Mesh::quad(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = Mesh::quad(Rect::new(5.0, 5.0, 2.0, 2.0));
        assert!(a.same_shape(&b));

        let c = Mesh::new(vec![VertexAttribute::new("position", 2)], vec![0.0; 6], vec![0, 1, 2]).unwrap();
        assert!(!a.same_shape(&c));
    }
}
