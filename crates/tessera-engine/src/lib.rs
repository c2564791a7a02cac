//! Tessera engine crate.
//!
//! Render-state tracking over an external graphics driver, a keyed resource
//! cache, a persisted scene graph and the gate that keeps the render, update
//! and structural passes apart. Higher layers (UI, tools) build on
//! [`core::EngineCtx`].

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod resources;
pub mod scene;
pub mod sync;
pub mod time;
pub mod world;
