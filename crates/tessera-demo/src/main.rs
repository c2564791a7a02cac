//! Headless walkthrough: a small UI and a one-sprite world driven by a
//! scripted input sequence against the recording driver.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tessera_engine::config::EngineConfig;
use tessera_engine::coords::{Color, Rect, Vec2, Viewport};
use tessera_engine::core::{App, AppControl, EngineCtx, FrameCtx, PreRenderCtx, UpdateCtx};
use tessera_engine::device::{DriverCall, RecordingDriver, UniformValue};
use tessera_engine::input::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent};
use tessera_engine::logging::init_logging;
use tessera_engine::render::{Drawable, DrawableId, Mesh};
use tessera_engine::resources::{ResourceData, ResourceError, ResourceKind, ResourceProvider};
use tessera_engine::world::{NodeId, Sprite};
use tessera_ui::painter::COLOR_UNIFORM;
use tessera_ui::prelude::*;

/// Serves a generated checkerboard; everything else is missing.
struct MemoryProvider;

impl ResourceProvider for MemoryProvider {
    fn load(&self, key: &str, kind: ResourceKind) -> Result<ResourceData, ResourceError> {
        match (key, kind) {
            ("checker", ResourceKind::Texture) => {
                let (width, height) = (8u32, 8u32);
                let pixels = (0..width * height)
                    .flat_map(|i| {
                        let on = ((i % width) + (i / width)) % 2 == 0;
                        let v = if on { 255 } else { 40 };
                        [v, v, v, 255]
                    })
                    .collect();
                Ok(ResourceData::Texture { pixels, width, height })
            }
            _ => Err(ResourceError::NotFound(key.to_string())),
        }
    }
}

struct DemoApp {
    ui: UiScene,
    ok: ComponentId,
    status: ComponentId,
    clicks: u32,
    sprites: HashMap<NodeId, DrawableId>,
}

impl DemoApp {
    fn new(driver: &mut RecordingDriver, viewport: Viewport) -> anyhow::Result<Self> {
        let mut ui = UiScene::new(driver, viewport, Box::new(FixedAdvanceMesher::default()))?;
        let tree = ui.tree_mut();

        let grey = Color::new(0.25, 0.25, 0.28, 1.0);
        let light = Color::new(0.4, 0.4, 0.45, 1.0);
        let dark = Color::new(0.15, 0.15, 0.18, 1.0);

        let window = tree.spawn(
            None,
            "window",
            Widget::panel(PanelStyle::solid(Color::new(0.1, 0.1, 0.12, 1.0))),
            "x:center:0 y:center:0 w:relative:0.8 h:ratio:0.75",
        )?;
        let status = tree.spawn(
            Some(window),
            "status",
            Widget::label(LabelData::new("ready", 14.0, Color::white())),
            "x:pixel:12 y:pixel:12 w:fill:-24 h:pixel:16",
        )?;
        let ok = tree.spawn(
            Some(window),
            "ok",
            Widget::button(PanelStyle::interactive(grey, light, dark)),
            "x:pixel:12:right y:pixel:12:bottom w:pixel:96 h:pixel:28",
        )?;
        tree.spawn(
            Some(window),
            "sound",
            Widget::checkbox(PanelStyle::solid(grey), ToggleState::new(false, Color::white())),
            "x:pixel:12 y:pixel:12:bottom w:pixel:20 h:ratio:1",
        )?;

        let list = tree.spawn(
            Some(window),
            "list",
            Widget::scroll_view(Some(PanelStyle::solid(dark))),
            "x:pixel:12 y:pixel:40 w:relative:0.5 h:pixel:120",
        )?;
        for row in 0..8 {
            let rule = format!("x:pixel:4 y:pixel:{} w:fill:-8 h:pixel:28", 4 + row * 32);
            tree.spawn(Some(list), format!("row{row}"), Widget::panel(PanelStyle::solid(grey)), &rule)?;
        }

        Ok(Self { ui, ok, status, clicks: 0, sprites: HashMap::new() })
    }

    fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Clicked { id } if id == self.ok => {
                self.clicks += 1;
                let text = format!("clicked {} time(s)", self.clicks);
                log::info!("ok button: {text}");
                if let Some(node) = self.ui.tree_mut().get_mut(self.status) {
                    node.widget_mut().set_text(text);
                }
            }
            UiEvent::Toggled { id, checked } => log::info!("{id:?} toggled to {checked}"),
            UiEvent::Scrolled { id, offset } => log::info!("{id:?} scrolled to {offset}"),
            other => log::trace!("{other:?}"),
        }
    }

    fn draw_sprites(&mut self, ctx: &mut FrameCtx<'_, RecordingDriver>) {
        let shader = Arc::clone(&self.ui.painter_mut().shaders().textured);
        for node in ctx.world.iter() {
            let Some(sprite) = node.data_as::<Sprite>() else { continue };
            let Some(texture) = sprite.texture.clone() else { continue };
            if !ctx.world.is_effectively_enabled(node.id) {
                continue;
            }
            let id = *self.sprites.entry(node.id).or_insert_with(|| {
                let mesh = Mesh::quad(Rect::from_origin_size(Vec2::zero(), sprite.size));
                ctx.device.insert(Drawable::new(node.name.clone(), mesh, Arc::clone(&shader)))
            });
            if let Some(drawable) = ctx.device.get_mut(id) {
                drawable.set_texture("u_texture", texture);
            }

            let tint = sprite.tint;
            ctx.device.push_transform(ctx.world.world_transform(node.id));
            ctx.renderer.render(
                ctx.device,
                id,
                node.transform.z_index,
                Some(Box::new(move |sink| sink.set(COLOR_UNIFORM, UniformValue::Vec4(tint.to_array())))),
            );
            ctx.device.pop_transform();
        }
    }
}

impl App<RecordingDriver> for DemoApp {
    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl {
        self.ui.set_viewport(ctx.viewport);
        if let Err(e) = self.ui.handle_input(ctx.input, ctx.input_frame) {
            log::error!("ui input failed: {e}");
            return AppControl::Exit;
        }
        if self.ui.update(ctx.time.dt) {
            log::trace!("ui requested a redraw");
        }
        for event in self.ui.drain_events() {
            self.handle(event);
        }
        AppControl::Continue
    }

    fn on_pre_render(&mut self, ctx: &mut PreRenderCtx<'_, RecordingDriver>) {
        if let Err(e) = self.ui.pre_render(ctx.device) {
            log::error!("ui pre-render failed: {e}");
        }
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, RecordingDriver>) -> AppControl {
        self.ui.purge(ctx.device);
        self.draw_sprites(ctx);
        if let Err(e) = self.ui.render(ctx.device, ctx.renderer) {
            log::error!("ui render failed: {e}");
            return AppControl::Exit;
        }
        AppControl::Continue
    }
}

fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
    InputEvent::PointerButton(PointerButtonEvent { button: MouseButton::Left, state, x, y })
}

/// Input for each frame: hover and click the button, toggle the checkbox,
/// then scroll the list.
fn script() -> Vec<Vec<InputEvent>> {
    vec![
        vec![InputEvent::PointerMoved { x: 10.0, y: 10.0 }],
        vec![InputEvent::PointerMoved { x: 650.0, y: 510.0 }],
        vec![button(MouseButtonState::Pressed, 650.0, 510.0)],
        vec![button(MouseButtonState::Released, 650.0, 510.0)],
        vec![button(MouseButtonState::Pressed, 100.0, 515.0)],
        vec![button(MouseButtonState::Released, 100.0, 515.0)],
        vec![InputEvent::PointerMoved { x: 150.0, y: 200.0 }, InputEvent::MouseWheel { delta: 2.0 }],
        vec![InputEvent::MouseWheel { delta: 10.0 }],
        vec![InputEvent::PointerLeft],
    ]
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::default();
    init_logging(config.logging.clone());

    let mut engine = EngineCtx::new(&config, RecordingDriver::default(), MemoryProvider);
    let viewport = Viewport::new(800.0, 600.0);
    engine.set_viewport(viewport);

    {
        let (resources, driver) = engine.resources_mut();
        resources
            .load_now(driver, "checker", ResourceKind::Texture)
            .context("loading the checker texture")?;
    }
    let texture = engine.resources().texture("checker")?;
    engine.with_world_mut(|world| {
        let logo = world.spawn(
            "logo",
            Box::new(Sprite { texture_key: "checker".into(), texture: Some(texture), size: Vec2::splat(64.0), tint: Color::white() }),
        );
        if let Some(node) = world.get_mut(logo) {
            node.transform.position = Vec2::new(700.0, 40.0);
            node.transform.z_index = 10.into();
        }
    });

    let mut app = DemoApp::new(engine.device_mut().driver_mut(), viewport)?;

    for (frame, events) in script().into_iter().enumerate() {
        for event in events {
            engine.push_input(event);
        }
        if engine.update_frame(&mut app) == AppControl::Exit {
            break;
        }
        let (control, stats) = engine.render_frame(&mut app)?;
        let calls = engine.device_mut().driver_mut().take_calls();
        let offscreen = calls.iter().filter(|c| matches!(c, DriverCall::BindTarget(Some(_)))).count();
        log::info!(
            "frame {frame}: {} draws, {} shader binds, {offscreen} offscreen pass(es), {} driver calls",
            stats.draws,
            stats.shader_binds,
            calls.len()
        );
        if control == AppControl::Exit {
            break;
        }
    }

    let saved = engine.save_world();
    log::info!("world saved with {} node(s)", saved.map("Nodes").map_or(0, |m| m.maps.len()));

    app.ui.shutdown(engine.device_mut());
    engine.shutdown();
    Ok(())
}
