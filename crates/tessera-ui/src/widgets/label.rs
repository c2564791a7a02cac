use tessera_engine::coords::Color;

/// Text content of a label. Meshing happens in the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    text: String,
    pub size: f32,
    pub color: Color,
    mesh_dirty: bool,
}

impl LabelData {
    pub fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self { text: text.into(), size, color, mesh_dirty: true }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the text actually changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.mesh_dirty = true;
        true
    }

    #[inline]
    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    pub(crate) fn mark_meshed(&mut self) {
        self.mesh_dirty = false;
    }
}
