use std::sync::Arc;

use crate::coords::Color;
use crate::device::{GraphicsDriver, TargetHandle};

use super::error::RenderError;
use super::texture::Texture;

/// An offscreen surface whose color attachment can be sampled afterwards.
///
/// Used by composited widgets: their subtree is drawn into the target in the
/// pre-render pass, then the [`Texture`] is drawn like any other.
#[derive(Debug)]
pub struct OffscreenTarget {
    handle: TargetHandle,
    texture: Arc<Texture>,
    disposed: bool,
}

impl OffscreenTarget {
    pub fn new(driver: &mut dyn GraphicsDriver, width: u32, height: u32) -> Result<Self, RenderError> {
        let (handle, texture) = driver.create_render_target(width, height)?;
        log::debug!("offscreen target {width}x{height} created");
        Ok(Self {
            handle,
            texture: Arc::new(Texture::from_handle(texture, width, height)),
            disposed: false,
        })
    }

    #[inline]
    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// Redirects subsequent draws here and clears to `clear`.
    pub fn begin(&self, driver: &mut dyn GraphicsDriver, clear: Color) {
        if self.disposed {
            log::warn!("begin on disposed offscreen target ignored");
            return;
        }
        driver.bind_render_target(Some(self.handle));
        driver.clear(clear.to_array());
    }

    /// Restores the default framebuffer.
    pub fn end(&self, driver: &mut dyn GraphicsDriver) {
        driver.bind_render_target(None);
    }

    /// Recreates the target if its size differs.
    pub fn ensure_size(
        &mut self,
        driver: &mut dyn GraphicsDriver,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if !self.disposed && self.size() == (width, height) {
            return Ok(());
        }
        let replacement = Self::new(driver, width, height)?;
        self.dispose(driver);
        *self = replacement;
        Ok(())
    }

    pub fn dispose(&mut self, driver: &mut dyn GraphicsDriver) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        driver.delete_render_target(self.handle);
        self.texture.dispose(driver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DriverCall, RecordingDriver};

    #[test]
    fn zero_size_is_an_error() {
        let mut driver = RecordingDriver::default();
        assert!(OffscreenTarget::new(&mut driver, 0, 10).is_err());
    }

    #[test]
    fn resize_replaces_and_releases() {
        let mut driver = RecordingDriver::default();
        let mut target = OffscreenTarget::new(&mut driver, 32, 32).unwrap();
        let old = target.handle;

        target.ensure_size(&mut driver, 32, 32).unwrap();
        assert_eq!(driver.count(|c| matches!(c, DriverCall::CreateTarget(..))), 1);

        target.ensure_size(&mut driver, 64, 16).unwrap();
        assert_eq!(target.size(), (64, 16));
        assert_eq!(driver.count(|c| *c == DriverCall::DeleteTarget(old)), 1);

        target.dispose(&mut driver);
        target.dispose(&mut driver);
        assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteTarget(_))), 2);
    }
}
