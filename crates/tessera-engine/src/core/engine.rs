use std::sync::Arc;

use crate::config::EngineConfig;
use crate::coords::{Mat4, Viewport};
use crate::device::GraphicsDriver;
use crate::input::{InputEvent, InputFrame, InputState};
use crate::render::{FrameRenderer, FrameStats, RenderDevice, RenderError};
use crate::resources::{ResourceCache, ResourceProvider};
use crate::sync::RenderGate;
use crate::time::FrameClock;
use crate::world::{LoadCtx, NodeRegistry, SerialMap, World, WorldError};

use super::app::{App, AppControl};
use super::ctx::{FrameCtx, PreRenderCtx, UpdateCtx};

/// Explicit engine context, threaded through the host loop.
pub struct EngineCtx<D: GraphicsDriver> {
    device: RenderDevice<D>,
    renderer: FrameRenderer,
    resources: ResourceCache,
    gate: Arc<RenderGate>,
    update_clock: FrameClock,
    render_clock: FrameClock,
    input: InputState,
    input_frame: InputFrame,
    viewport: Viewport,
    world: World,
    registry: NodeRegistry,
}

impl<D: GraphicsDriver> EngineCtx<D> {
    pub fn new(config: &EngineConfig, driver: D, provider: impl ResourceProvider + 'static) -> Self {
        log::info!("engine context starting");
        Self {
            device: RenderDevice::new(driver, config.max_texture_units),
            renderer: FrameRenderer::new(),
            resources: ResourceCache::new(provider),
            gate: Arc::new(RenderGate::new()),
            update_clock: FrameClock::with_config(config.clock),
            render_clock: FrameClock::with_config(config.clock),
            input: InputState::default(),
            input_frame: InputFrame::default(),
            viewport: Viewport::new(1.0, 1.0),
            world: World::new(),
            registry: NodeRegistry::with_builtins(),
        }
    }

    #[inline]
    pub fn device(&self) -> &RenderDevice<D> {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut RenderDevice<D> {
        &mut self.device
    }

    #[inline]
    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    /// The device driver and the resource cache, for synchronous loads.
    pub fn resources_mut(&mut self) -> (&mut ResourceCache, &mut D) {
        (&mut self.resources, self.device.driver_mut())
    }

    /// Shared handle for threads that run their own passes.
    ///
    /// `update_frame` and `render_frame` borrow the context mutably, so they
    /// never contend with each other; only passes entered through this handle
    /// from another thread do.
    #[inline]
    pub fn gate(&self) -> Arc<RenderGate> {
        Arc::clone(&self.gate)
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.viewport = viewport;
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Feeds a host input event into this frame's input.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.apply_event(&mut self.input_frame, event);
    }

    /// Runs one update pass. Clears this frame's input afterwards.
    pub fn update_frame(&mut self, app: &mut impl App<D>) -> AppControl {
        let gate = Arc::clone(&self.gate);
        let _pass = gate.enter_update();

        let time = self.update_clock.tick();
        let mut ctx = UpdateCtx {
            input: &self.input,
            input_frame: &self.input_frame,
            time,
            viewport: self.viewport,
            world: &mut self.world,
        };
        let control = app.on_update(&mut ctx);
        self.input_frame.clear();
        control
    }

    /// Runs one render pass: drains pending resource loads, runs the app's
    /// offscreen work, then lets the app queue draws and issues them.
    pub fn render_frame(&mut self, app: &mut impl App<D>) -> Result<(AppControl, FrameStats), RenderError> {
        let gate = Arc::clone(&self.gate);
        let _pass = gate.enter_render();

        for loaded in self.resources.process_pending(self.device.driver_mut()) {
            app.on_resource_loaded(&loaded);
        }

        let time = self.render_clock.tick();
        let mut pre = PreRenderCtx {
            device: &mut self.device,
            resources: &self.resources,
            time,
            viewport: self.viewport,
        };
        app.on_pre_render(&mut pre);

        let view_projection = Mat4::ortho(self.viewport.width, self.viewport.height);
        if !self.renderer.begin_rendering(&mut self.device, view_projection) {
            return Ok((AppControl::Continue, FrameStats::default()));
        }

        let mut ctx = FrameCtx {
            device: &mut self.device,
            renderer: &mut self.renderer,
            resources: &self.resources,
            world: &self.world,
            time,
            viewport: self.viewport,
        };
        let control = app.on_render(&mut ctx);
        let stats = self.renderer.end_rendering(&mut self.device)?;
        Ok((control, stats))
    }

    /// Replaces the world with one loaded from `map`, under the structural
    /// gate. On error the current world is kept.
    pub fn load_world(&mut self, map: &SerialMap) -> Result<(), WorldError> {
        let gate = Arc::clone(&self.gate);
        let _pass = gate.enter_structural();

        let ctx = LoadCtx { resources: &self.resources };
        self.world = World::load(map, &self.registry, &ctx)?;
        Ok(())
    }

    pub fn save_world(&self) -> SerialMap {
        let _pass = self.gate.enter_structural();
        self.world.save()
    }

    /// Runs `f` against the world under the structural gate.
    pub fn with_world_mut<R>(&mut self, f: impl FnOnce(&mut World) -> R) -> R {
        let gate = Arc::clone(&self.gate);
        let _pass = gate.enter_structural();
        f(&mut self.world)
    }

    /// Releases every driver object the engine owns.
    pub fn shutdown(&mut self) {
        self.resources.unload_all(self.device.driver_mut());
        self.device.shutdown();
        log::info!("engine context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::device::{RecordingDriver, ShaderSource};
    use crate::input::{MouseButton, MouseButtonState, PointerButtonEvent};
    use crate::render::{Drawable, Mesh};
    use crate::resources::{ResourceData, ResourceError, ResourceKind, ResourceLoaded};
    use crate::world::EmptyNode;

    struct Provider;

    impl ResourceProvider for Provider {
        fn load(&self, key: &str, _kind: ResourceKind) -> Result<ResourceData, ResourceError> {
            match key {
                "flat" => Ok(ResourceData::Shader(ShaderSource::new(
                    "in vec2 a_position;\nin vec2 a_uv;\nuniform mat4 u_view_projection;",
                    "void main() {}",
                ))),
                _ => Err(ResourceError::NotFound(key.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct QuadApp {
        loaded: Vec<ResourceLoaded>,
        clicks: usize,
        pre_renders: usize,
        quad: Option<crate::render::DrawableId>,
    }

    impl App<RecordingDriver> for QuadApp {
        fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl {
            self.clicks += ctx.input_frame.buttons_pressed.len();
            AppControl::Continue
        }

        fn on_pre_render(&mut self, ctx: &mut PreRenderCtx<'_, RecordingDriver>) {
            assert!(ctx.device.active_pass().is_none());
            self.pre_renders += 1;
        }

        fn on_render(&mut self, ctx: &mut FrameCtx<'_, RecordingDriver>) -> AppControl {
            if self.quad.is_none() {
                if let Ok(shader) = ctx.resources.shader("flat") {
                    let mesh = Mesh::quad(Rect::new(0.0, 0.0, 8.0, 8.0));
                    self.quad = Some(ctx.device.insert(Drawable::new("quad", mesh, shader)));
                }
            }
            if let Some(id) = self.quad {
                ctx.renderer.render(ctx.device, id, 0, None);
            }
            AppControl::Continue
        }

        fn on_resource_loaded(&mut self, loaded: &ResourceLoaded) {
            self.loaded.push(loaded.clone());
        }
    }

    fn engine() -> EngineCtx<RecordingDriver> {
        EngineCtx::new(&EngineConfig::default(), RecordingDriver::default(), Provider)
    }

    #[test]
    fn render_frame_waits_for_structural_work_on_another_thread() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let mut engine = engine();
        let mut app = QuadApp::default();
        let released = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker = {
            let gate = engine.gate();
            let released = Arc::clone(&released);
            thread::spawn(move || {
                let structural = gate.enter_structural();
                let _ = tx.send(());
                thread::sleep(Duration::from_millis(50));
                released.store(true, Ordering::SeqCst);
                drop(structural);
            })
        };

        rx.recv().unwrap();
        engine.render_frame(&mut app).unwrap();
        assert!(released.load(Ordering::SeqCst));
        worker.join().unwrap();
    }

    #[test]
    fn render_frame_loads_then_draws() {
        let mut engine = engine();
        let mut app = QuadApp::default();
        engine.resources().request("flat", ResourceKind::Shader);

        let (_, stats) = engine.render_frame(&mut app).unwrap();
        assert_eq!(app.loaded.len(), 1);
        assert_eq!(stats.draws, 1);

        let (_, stats) = engine.render_frame(&mut app).unwrap();
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.shader_binds, 1);
        assert_eq!(app.pre_renders, 2);
    }

    #[test]
    fn update_frame_sees_and_clears_input() {
        let mut engine = engine();
        let mut app = QuadApp::default();
        engine.push_input(InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 1.0,
            y: 1.0,
        }));
        engine.update_frame(&mut app);
        engine.update_frame(&mut app);
        assert_eq!(app.clicks, 1);
        assert!(engine.input().button_down(MouseButton::Left));
    }

    #[test]
    fn failed_world_load_keeps_current_world() {
        let mut engine = engine();
        engine.with_world_mut(|w| w.spawn("keep", Box::new(EmptyNode)));
        let saved = engine.save_world();

        let mut broken = saved.clone();
        if let Some(nodes) = broken.maps.get_mut("Nodes") {
            for node in nodes.maps.values_mut() {
                node.set("Type", "Unknown");
            }
        }
        assert!(engine.load_world(&broken).is_err());
        assert_eq!(engine.world().len(), 1);

        engine.load_world(&saved).unwrap();
        assert_eq!(engine.world().len(), 1);
    }

    #[test]
    fn shutdown_releases_driver_objects() {
        let mut engine = engine();
        let mut app = QuadApp::default();
        engine.resources().request("flat", ResourceKind::Shader);
        engine.render_frame(&mut app).unwrap();
        engine.shutdown();
        assert_eq!(engine.device().driver().live_buffers(), 0);
        assert_eq!(engine.device().live_drawables(), 0);
    }
}
