//! Turns the component tree into draw requests.
//!
//! Every component keeps its driver objects in a [`RenderSlot`]. Meshes are
//! built in layout space and only rewritten when the component's rectangle
//! or text changes; colours travel as a per-draw `u_color` uniform, so hover
//! and press feedback never touches vertex data.
//!
//! Draws are queued with a decreasing z-index in traversal order, which keeps
//! parents under children and siblings in child order.

use std::sync::Arc;

use tessera_engine::coords::{Color, Mat4, Rect, Vec2};
use tessera_engine::device::{GraphicsDriver, ShaderSource, UniformValue};
use tessera_engine::render::{
    quad_vertices, Drawable, DrawableId, FrameRenderer, Mesh, OffscreenTarget, PreRender, RenderDevice,
    RenderError, Shader, VertexAttribute,
};
use tessera_engine::scene::ZIndex;

use crate::component::{ComponentId, ComponentTree};
use crate::error::UiError;
use crate::widgets::{LabelData, WidgetKind};

/// Fill colour uniform of both UI shaders.
pub const COLOR_UNIFORM: &str = "u_color";

/// Sampler uniform of the textured shader.
pub const TEXTURE_UNIFORM: &str = "u_texture";

const SOLID_VERTEX: &str = "\
#version 330 core
in vec2 a_position;
uniform mat4 u_view_projection;
uniform mat4 u_model;
void main() {
    gl_Position = u_view_projection * u_model * vec4(a_position, 0.0, 1.0);
}
";

const SOLID_FRAGMENT: &str = "\
#version 330 core
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}
";

const TEXTURED_VERTEX: &str = "\
#version 330 core
in vec2 a_position;
in vec2 a_uv;
uniform mat4 u_view_projection;
uniform mat4 u_model;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_view_projection * u_model * vec4(a_position, 0.0, 1.0);
}
";

const TEXTURED_FRAGMENT: &str = "\
#version 330 core
in vec2 v_uv;
uniform sampler2D u_texture;
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = texture(u_texture, v_uv) * u_color;
}
";

/// The two programs every UI draw uses.
#[derive(Debug, Clone)]
pub struct UiShaders {
    pub solid: Arc<Shader>,
    pub textured: Arc<Shader>,
}

impl UiShaders {
    pub fn compile(driver: &mut dyn GraphicsDriver) -> Result<Self, RenderError> {
        let solid = Shader::compile(driver, "ui.solid", &ShaderSource::new(SOLID_VERTEX, SOLID_FRAGMENT))?;
        solid.require_uniforms(&[COLOR_UNIFORM])?;
        let textured =
            Shader::compile(driver, "ui.textured", &ShaderSource::new(TEXTURED_VERTEX, TEXTURED_FRAGMENT))?;
        textured.require_uniforms(&[COLOR_UNIFORM, TEXTURE_UNIFORM])?;
        Ok(Self { solid: Arc::new(solid), textured: Arc::new(textured) })
    }

    pub fn dispose(&self, driver: &mut dyn GraphicsDriver) {
        self.solid.dispose(driver);
        self.textured.dispose(driver);
    }
}

// ── text ──────────────────────────────────────────────────────────────────

/// Glyph layout, provided by the host (font rasterisation is external).
///
/// The mesh must carry `position` and `uv` attributes, two floats each.
pub trait TextMesher: Send {
    /// Glyph quads for `text` at pixel `size`, first glyph's top-left at
    /// `origin`.
    fn mesh(&self, text: &str, size: f32, origin: Vec2) -> Result<Mesh, RenderError>;
}

/// Monospace placeholder: one box per non-whitespace character.
#[derive(Debug, Copy, Clone)]
pub struct FixedAdvanceMesher {
    /// Horizontal advance as a fraction of the text size.
    pub advance: f32,
}

impl Default for FixedAdvanceMesher {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMesher for FixedAdvanceMesher {
    fn mesh(&self, text: &str, size: f32, origin: Vec2) -> Result<Mesh, RenderError> {
        let step = self.advance * size;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let base = (vertices.len() / 4) as u32;
            let glyph = Rect::new(origin.x + i as f32 * step, origin.y, step * 0.8, size);
            vertices.extend(quad_vertices(glyph));
            indices.extend([0, 1, 2, 0, 2, 3].map(|k| base + k));
        }
        Mesh::new(
            vec![VertexAttribute::new("position", 2), VertexAttribute::new("uv", 2)],
            vertices,
            indices,
        )
    }
}

// ── per-component render data ─────────────────────────────────────────────

/// Driver objects owned by one component.
#[derive(Debug, Default)]
pub struct RenderSlot {
    body: Option<DrawableId>,
    body_rect: Option<Rect>,
    mark: Option<DrawableId>,
    mark_rect: Option<Rect>,
    text: Option<DrawableId>,
    text_origin: Option<Vec2>,
    composite: Option<DrawableId>,
    composite_rect: Option<Rect>,
    target: Option<OffscreenTarget>,
}

impl RenderSlot {
    /// Whether nothing was ever created for this component.
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
            && self.mark.is_none()
            && self.text.is_none()
            && self.composite.is_none()
            && self.target.is_none()
    }

    /// Removes every drawable and the offscreen target from the device.
    pub fn release<D: GraphicsDriver>(&mut self, device: &mut RenderDevice<D>) {
        for id in [self.body.take(), self.mark.take(), self.text.take(), self.composite.take()]
            .into_iter()
            .flatten()
        {
            device.remove(id);
        }
        self.body_rect = None;
        self.mark_rect = None;
        self.text_origin = None;
        self.composite_rect = None;
        if let Some(mut target) = self.target.take() {
            target.dispose(device.driver_mut());
        }
    }
}

fn tint(color: Color) -> PreRender {
    Box::new(move |sink| sink.set(COLOR_UNIFORM, UniformValue::Vec4(color.to_array())))
}

/// Returns the quad drawable in `id`, creating it or rewriting its vertices
/// when `rect` moved.
fn sync_quad<D: GraphicsDriver>(
    device: &mut RenderDevice<D>,
    id: &mut Option<DrawableId>,
    last: &mut Option<Rect>,
    label: &str,
    rect: Rect,
    shader: &Arc<Shader>,
) -> Result<DrawableId, RenderError> {
    if let Some(existing) = *id {
        if let Some(drawable) = device.get_mut(existing) {
            if *last != Some(rect) {
                drawable.set_vertices(quad_vertices(rect))?;
                *last = Some(rect);
            }
            return Ok(existing);
        }
    }
    let created = device.insert(Drawable::new(label, Mesh::quad(rect), Arc::clone(shader)));
    *id = Some(created);
    *last = Some(rect);
    Ok(created)
}

// ── passes ────────────────────────────────────────────────────────────────

struct Pass<'a> {
    shaders: &'a UiShaders,
    mesher: &'a dyn TextMesher,
    z: i32,
}

impl Pass<'_> {
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex(-self.z);
        self.z += 1;
        z
    }

    fn paint<D: GraphicsDriver>(
        &mut self,
        tree: &mut ComponentTree,
        device: &mut RenderDevice<D>,
        renderer: &mut FrameRenderer,
        id: ComponentId,
    ) -> Result<(), UiError> {
        match tree.get(id) {
            Some(n) if n.is_visible() && !n.is_destroyed() => {}
            _ => return Ok(()),
        }
        let bounds = tree.bounds(id)?;
        let Some(node) = tree.get_mut(id) else { return Ok(()) };
        let interaction = node.interaction();
        let children = node.children().to_vec();
        let (name, widget, slot) = node.paint_parts();
        widget.take_redraw();

        if let Some(style) = widget.panel {
            let body = sync_quad(device, &mut slot.body, &mut slot.body_rect, name, bounds, &self.shaders.solid)?;
            let color = style.color_for(interaction.hover, interaction.click);
            renderer.render(device, body, self.next_z(), Some(tint(color)));
        }

        if let Some(toggle) = widget.toggle.filter(|t| t.checked) {
            let inset = Rect::new(
                bounds.origin.x + bounds.width() * 0.25,
                bounds.origin.y + bounds.height() * 0.25,
                bounds.width() * 0.5,
                bounds.height() * 0.5,
            );
            let mark = sync_quad(device, &mut slot.mark, &mut slot.mark_rect, name, inset, &self.shaders.solid)?;
            renderer.render(device, mark, self.next_z(), Some(tint(toggle.check_color)));
        }

        if let Some(label) = &mut widget.label {
            if !label.text().is_empty() {
                let text = self.sync_text(device, slot, name, label, bounds.origin)?;
                renderer.render(device, text, self.next_z(), Some(tint(label.color)));
            }
        }

        if widget.kind == WidgetKind::ScrollView {
            // Content is only visible through the composite.
            if let Some(target) = &slot.target {
                let texture = Arc::clone(target.texture());
                let composite = sync_quad(
                    device,
                    &mut slot.composite,
                    &mut slot.composite_rect,
                    name,
                    bounds,
                    &self.shaders.textured,
                )?;
                if let Some(drawable) = device.get_mut(composite) {
                    drawable.set_texture(TEXTURE_UNIFORM, texture);
                }
                renderer.render(device, composite, self.next_z(), Some(tint(Color::white())));
            }
            return Ok(());
        }

        for child in children {
            self.paint(tree, device, renderer, child)?;
        }
        Ok(())
    }

    fn sync_text<D: GraphicsDriver>(
        &self,
        device: &mut RenderDevice<D>,
        slot: &mut RenderSlot,
        name: &str,
        label: &mut LabelData,
        origin: Vec2,
    ) -> Result<DrawableId, RenderError> {
        let existing = slot.text.filter(|id| device.get(*id).is_some());
        if let Some(id) = existing {
            if !label.is_mesh_dirty() && slot.text_origin == Some(origin) {
                return Ok(id);
            }
        }

        let mesh = self.mesher.mesh(label.text(), label.size, origin)?;
        let id = match existing {
            Some(id) => {
                if let Some(drawable) = device.get_mut(id) {
                    drawable.set_mesh(mesh);
                }
                id
            }
            None => device.insert(Drawable::new(name, mesh, Arc::clone(&self.shaders.solid))),
        };
        slot.text = Some(id);
        slot.text_origin = Some(origin);
        label.mark_meshed();
        Ok(id)
    }
}

/// Draws a [`ComponentTree`] through a [`FrameRenderer`].
pub struct Painter {
    shaders: UiShaders,
    mesher: Box<dyn TextMesher>,
    offscreen: FrameRenderer,
    /// Clear colour of scroll-view targets.
    pub clear: Color,
}

impl Painter {
    pub fn new(driver: &mut dyn GraphicsDriver, mesher: Box<dyn TextMesher>) -> Result<Self, RenderError> {
        Ok(Self {
            shaders: UiShaders::compile(driver)?,
            mesher,
            offscreen: FrameRenderer::new(),
            clear: Color::transparent(),
        })
    }

    #[inline]
    pub fn shaders(&self) -> &UiShaders {
        &self.shaders
    }

    /// Renders every visible scroll view's content into its offscreen
    /// target, innermost first. Must run outside any active pass.
    pub fn pre_render<D: GraphicsDriver>(
        &mut self,
        tree: &mut ComponentTree,
        device: &mut RenderDevice<D>,
    ) -> Result<(), UiError> {
        for root in tree.roots().to_vec() {
            self.pre_visit(tree, device, root)?;
        }
        Ok(())
    }

    fn pre_visit<D: GraphicsDriver>(
        &mut self,
        tree: &mut ComponentTree,
        device: &mut RenderDevice<D>,
        id: ComponentId,
    ) -> Result<(), UiError> {
        let children = match tree.get(id) {
            Some(n) if n.is_visible() && !n.is_destroyed() => n.children().to_vec(),
            _ => return Ok(()),
        };
        for &child in &children {
            self.pre_visit(tree, device, child)?;
        }

        let Some(offset) = tree
            .get(id)
            .filter(|n| n.widget().kind == WidgetKind::ScrollView)
            .map(|n| n.widget().scroll_offset())
        else {
            return Ok(());
        };
        let bounds = tree.bounds(id)?;
        let (w, h) = (bounds.width().ceil().max(1.0) as u32, bounds.height().ceil().max(1.0) as u32);

        let mut target = {
            let Some(node) = tree.get_mut(id) else { return Ok(()) };
            let (_, _, slot) = node.paint_parts();
            match &mut slot.target {
                Some(t) => t.ensure_size(device.driver_mut(), w, h)?,
                None => slot.target = Some(OffscreenTarget::new(device.driver_mut(), w, h)?),
            }
            match slot.target.take() {
                Some(t) => t,
                None => return Ok(()),
            }
        };

        target.begin(device.driver_mut(), self.clear);
        let result = if self.offscreen.begin_rendering(device, Mat4::ortho(w as f32, h as f32)) {
            device.push_transform(Mat4::translation(Vec2::new(-bounds.origin.x, -bounds.origin.y - offset)));
            let mut pass = Pass { shaders: &self.shaders, mesher: self.mesher.as_ref(), z: 0 };
            // Rows scrolled fully out of the window are not drawn.
            let window = bounds.translate(Vec2::new(0.0, offset));
            let painted = children.iter().try_for_each(|&c| {
                let extent = tree.bounds(c)?.union(tree.child_bounds(c)?);
                if extent.intersect(window).is_none() {
                    return Ok(());
                }
                pass.paint(tree, device, &mut self.offscreen, c)
            });
            device.pop_transform();
            let ended = self.offscreen.end_rendering(device);
            painted.and(ended.map(|_| ()).map_err(UiError::from))
        } else {
            Ok(())
        };
        target.end(device.driver_mut());

        if let Some(node) = tree.get_mut(id) {
            node.paint_parts().2.target = Some(target);
        }
        result
    }

    /// Queues draws for every visible component, shifted by `offset`.
    pub fn render<D: GraphicsDriver>(
        &mut self,
        tree: &mut ComponentTree,
        device: &mut RenderDevice<D>,
        renderer: &mut FrameRenderer,
        offset: Vec2,
    ) -> Result<(), UiError> {
        let shifted = offset != Vec2::zero();
        if shifted {
            device.push_transform(Mat4::translation(offset));
        }
        let mut pass = Pass { shaders: &self.shaders, mesher: self.mesher.as_ref(), z: 0 };
        let result = tree.roots().to_vec().into_iter().try_for_each(|root| pass.paint(tree, device, renderer, root));
        if shifted {
            device.pop_transform();
        }
        if result.is_ok() {
            tree.mark_painted();
        }
        result
    }

    pub fn dispose(&self, driver: &mut dyn GraphicsDriver) {
        self.shaders.dispose(driver);
    }
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("shaders", &self.shaders)
            .field("offscreen", &self.offscreen)
            .field("clear", &self.clear)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tessera_engine::coords::Viewport;
    use tessera_engine::device::{DriverCall, RecordingDriver};

    use super::*;
    use crate::component::PointerInput;
    use crate::interaction::ButtonPhase;
    use crate::widgets::{PanelStyle, ToggleState, Widget};

    fn setup() -> (ComponentTree, RenderDevice<RecordingDriver>, Painter, FrameRenderer) {
        let mut device = RenderDevice::new(RecordingDriver::default(), None);
        let painter = Painter::new(device.driver_mut(), Box::new(FixedAdvanceMesher::default())).unwrap();
        device.driver_mut().take_calls();
        (ComponentTree::new(Viewport::new(200.0, 100.0)), device, painter, FrameRenderer::new())
    }

    fn frame(
        tree: &mut ComponentTree,
        device: &mut RenderDevice<RecordingDriver>,
        painter: &mut Painter,
        renderer: &mut FrameRenderer,
    ) -> Vec<DriverCall> {
        painter.pre_render(tree, device).unwrap();
        assert!(renderer.begin_rendering(device, Mat4::ortho(200.0, 100.0)));
        painter.render(tree, device, renderer, Vec2::zero()).unwrap();
        renderer.end_rendering(device).unwrap();
        device.driver_mut().take_calls()
    }

    fn colors(calls: &[DriverCall]) -> Vec<[f32; 4]> {
        calls
            .iter()
            .filter_map(|c| match c {
                DriverCall::SetUniform(_, _, UniformValue::Vec4(v)) => Some(*v),
                _ => None,
            })
            .collect()
    }

    fn draws(calls: &[DriverCall]) -> usize {
        calls.iter().filter(|c| matches!(c, DriverCall::Draw { .. })).count()
    }

    // ── shaders ───────────────────────────────────────────────────────────

    #[test]
    fn shaders_reflect_their_uniforms() {
        let mut driver = RecordingDriver::default();
        let shaders = UiShaders::compile(&mut driver).unwrap();
        assert!(shaders.solid.has_uniform(COLOR_UNIFORM));
        assert!(shaders.textured.has_uniform(TEXTURE_UNIFORM));
        assert_eq!(shaders.textured.attributes().len(), 2);
    }

    #[test]
    fn fixed_mesher_skips_whitespace() {
        let mesh = FixedAdvanceMesher::default().mesh("a b", 10.0, Vec2::zero()).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 12);
    }

    // ── painting ──────────────────────────────────────────────────────────

    #[test]
    fn parent_paints_under_child() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let blue = Color::new(0.0, 0.0, 1.0, 1.0);
        let parent = tree
            .spawn(None, "parent", Widget::panel(PanelStyle::solid(red)), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0")
            .unwrap();
        tree.spawn(Some(parent), "child", Widget::panel(PanelStyle::solid(blue)), "x:pixel:5 y:pixel:5 w:pixel:10 h:pixel:10")
            .unwrap();

        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&calls), 2);
        assert_eq!(colors(&calls), [red.to_array(), blue.to_array()]);
    }

    #[test]
    fn unchanged_frame_does_not_touch_buffers() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        tree.spawn(None, "p", Widget::panel(PanelStyle::solid(Color::black())), "x:pixel:0 y:pixel:0 w:pixel:10 h:pixel:10")
            .unwrap();
        frame(&mut tree, &mut device, &mut painter, &mut renderer);

        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&calls), 1);
        assert!(!calls.iter().any(|c| matches!(c, DriverCall::CreateBuffer(..) | DriverCall::UpdateBuffer(..))));
    }

    #[test]
    fn moved_component_uploads_data_only() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let p = tree
            .spawn(None, "p", Widget::panel(PanelStyle::solid(Color::black())), "x:pixel:0 y:pixel:0 w:pixel:10 h:pixel:10")
            .unwrap();
        frame(&mut tree, &mut device, &mut painter, &mut renderer);

        tree.apply_constraints(p, "x:pixel:30").unwrap();
        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert!(calls.iter().any(|c| matches!(c, DriverCall::UpdateBuffer(..))));
        assert!(!calls.iter().any(|c| matches!(c, DriverCall::CreateBuffer(..))));
    }

    #[test]
    fn invisible_subtree_is_skipped() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let style = PanelStyle::solid(Color::black());
        let parent = tree.spawn(None, "parent", Widget::panel(style), "x:pixel:0 y:pixel:0 w:fill:0 h:fill:0").unwrap();
        tree.spawn(Some(parent), "child", Widget::panel(style), "x:pixel:0 y:pixel:0 w:pixel:5 h:pixel:5").unwrap();
        tree.set_visible(parent, false).unwrap();

        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&calls), 0);
    }

    #[test]
    fn checked_checkbox_draws_mark() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let check = Color::new(0.0, 1.0, 0.0, 1.0);
        let widget = Widget::checkbox(PanelStyle::solid(Color::black()), ToggleState::new(true, check));
        tree.spawn(None, "cb", widget, "x:pixel:0 y:pixel:0 w:pixel:20 h:pixel:20").unwrap();

        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(colors(&calls), [Color::black().to_array(), check.to_array()]);
    }

    #[test]
    fn label_text_change_rebuilds_mesh() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let label = Widget::label(LabelData::new("hi", 10.0, Color::white()));
        let id = tree.spawn(None, "label", label, "x:pixel:0 y:pixel:0 w:pixel:50 h:pixel:10").unwrap();
        let first = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&first), 1);

        tree.get_mut(id).unwrap().widget_mut().set_text("hello");
        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        // Glyph count changed, so buffers are recreated.
        assert!(calls.iter().any(|c| matches!(c, DriverCall::CreateBuffer(..))));
    }

    #[test]
    fn scroll_view_composites_offscreen_content() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let view = tree.spawn(None, "view", Widget::scroll_view(None), "x:pixel:10 y:pixel:10 w:pixel:50 h:pixel:40").unwrap();
        tree.spawn(Some(view), "item", Widget::panel(PanelStyle::solid(Color::white())), "x:pixel:0 y:pixel:0 w:fill:0 h:pixel:80")
            .unwrap();

        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        let target = calls.iter().position(|c| matches!(c, DriverCall::BindTarget(Some(_)))).unwrap();
        let restore = calls.iter().position(|c| matches!(c, DriverCall::BindTarget(None))).unwrap();
        let first_draw = calls.iter().position(|c| matches!(c, DriverCall::Draw { .. })).unwrap();
        assert!(calls.iter().any(|c| matches!(c, DriverCall::CreateTarget(..))));
        assert!(target < first_draw && first_draw < restore);
        // Item inside the target, composite on screen.
        assert_eq!(draws(&calls), 2);
        assert!(calls[restore..].iter().any(|c| matches!(c, DriverCall::AssignTextureUnit(..))));
    }

    #[test]
    fn scroll_view_skips_rows_outside_its_window() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let view = tree.spawn(None, "view", Widget::scroll_view(None), "x:pixel:10 y:pixel:10 w:pixel:50 h:pixel:40").unwrap();
        for row in 0..4 {
            let rule = format!("x:pixel:0 y:pixel:{} w:fill:0 h:pixel:20", row * 20);
            tree.spawn(Some(view), format!("row{row}"), Widget::panel(PanelStyle::solid(Color::white())), &rule).unwrap();
        }
        tree.update(0.0);

        // Rows at 0 and 20; the row starting at the bottom edge is out.
        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&calls), 3);

        let wheel = PointerInput { position: Some(Vec2::new(20.0, 20.0)), button: ButtonPhase::Up, wheel: 1.0 };
        tree.update_input(&wheel, &mut false).unwrap();
        assert_eq!(tree.get(view).unwrap().widget().scroll_offset(), 24.0);

        // Window now covers content 24..64: rows at 20, 40 and 60.
        let calls = frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(draws(&calls), 4);
    }

    #[test]
    fn released_slot_frees_driver_objects() {
        let (mut tree, mut device, mut painter, mut renderer) = setup();
        let id = tree
            .spawn(None, "p", Widget::panel(PanelStyle::solid(Color::black())), "x:pixel:0 y:pixel:0 w:pixel:10 h:pixel:10")
            .unwrap();
        frame(&mut tree, &mut device, &mut painter, &mut renderer);
        assert_eq!(device.live_drawables(), 1);

        tree.destroy(id).unwrap();
        for mut slot in tree.purge_destroyed() {
            slot.release(&mut device);
            assert!(slot.is_empty());
        }
        assert_eq!(device.live_drawables(), 0);
        assert_eq!(device.driver().live_buffers(), 0);
    }
}
