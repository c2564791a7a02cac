use std::sync::atomic::{AtomicBool, Ordering};

use crate::device::{GraphicsDriver, TextureHandle};

use super::error::RenderError;

/// An uploaded texture. Shared through `Arc<Texture>`.
#[derive(Debug)]
pub struct Texture {
    handle: TextureHandle,
    width: u32,
    height: u32,
    disposed: AtomicBool,
}

impl Texture {
    /// Uploads RGBA8 `pixels`.
    pub fn upload(
        driver: &mut dyn GraphicsDriver,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let handle = driver.upload_texture(pixels, width, height)?;
        Ok(Self::from_handle(handle, width, height))
    }

    /// Wraps a texture the driver created by other means (render targets).
    pub fn from_handle(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self { handle, width, height, disposed: AtomicBool::new(false) }
    }

    #[inline]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds this texture to `unit`, evicting whatever was there.
    pub fn bind(
        &self,
        units: &mut TextureUnits,
        driver: &mut dyn GraphicsDriver,
        unit: u32,
    ) -> Result<Option<TextureHandle>, RenderError> {
        if self.is_disposed() {
            log::warn!("bind of disposed texture {:?} ignored", self.handle);
            return Ok(None);
        }
        units.assign(driver, self.handle, unit, true)
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Releases the driver texture. Safe to call more than once.
    pub fn dispose(&self, driver: &mut dyn GraphicsDriver) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            driver.delete_texture(self.handle);
        }
    }
}

/// The bounded set of hardware texture units and what currently occupies
/// each one.
#[derive(Debug, Clone)]
pub struct TextureUnits {
    slots: Vec<Option<TextureHandle>>,
}

impl TextureUnits {
    pub fn new(count: u32) -> Self {
        Self { slots: vec![None; count as usize] }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn occupant(&self, unit: u32) -> Option<TextureHandle> {
        self.slots.get(unit as usize).copied().flatten()
    }

    /// Unit currently holding `texture`, if any.
    pub fn unit_of(&self, texture: TextureHandle) -> Option<u32> {
        self.slots.iter().position(|s| *s == Some(texture)).map(|i| i as u32)
    }

    /// Assigns `texture` to `unit`.
    ///
    /// A unit held by a different texture is only taken over when `overwrite`
    /// is set; the previous occupant is evicted immediately and returned.
    pub fn assign(
        &mut self,
        driver: &mut dyn GraphicsDriver,
        texture: TextureHandle,
        unit: u32,
        overwrite: bool,
    ) -> Result<Option<TextureHandle>, RenderError> {
        let available = self.len();
        let slot = self
            .slots
            .get_mut(unit as usize)
            .ok_or(RenderError::UnitOutOfRange { unit, available })?;

        match *slot {
            Some(current) if current == texture => return Ok(None),
            Some(occupant) if !overwrite => {
                return Err(RenderError::UnitOccupied { unit, occupant });
            }
            _ => {}
        }

        let evicted = slot.replace(texture);
        driver.assign_texture_unit(texture, unit);
        if let Some(old) = evicted {
            log::trace!("texture {old:?} evicted from unit {unit} by {texture:?}");
        }
        Ok(evicted)
    }

    /// Frees every unit.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DriverCall, RecordingDriver};

    #[test]
    fn occupied_unit_requires_overwrite() {
        let mut driver = RecordingDriver::default();
        let mut units = TextureUnits::new(2);
        let a = TextureHandle(1);
        let b = TextureHandle(2);

        assert_eq!(units.assign(&mut driver, a, 0, false).unwrap(), None);
        assert_eq!(
            units.assign(&mut driver, b, 0, false).unwrap_err(),
            RenderError::UnitOccupied { unit: 0, occupant: a }
        );
        assert_eq!(units.assign(&mut driver, b, 0, true).unwrap(), Some(a));
        assert_eq!(units.occupant(0), Some(b));
        assert_eq!(units.unit_of(a), None);
    }

    #[test]
    fn reassigning_same_texture_is_free() {
        let mut driver = RecordingDriver::default();
        let mut units = TextureUnits::new(1);
        units.assign(&mut driver, TextureHandle(7), 0, false).unwrap();
        units.assign(&mut driver, TextureHandle(7), 0, false).unwrap();
        assert_eq!(driver.count(|c| matches!(c, DriverCall::AssignTextureUnit(..))), 1);
    }

    #[test]
    fn unit_out_of_range() {
        let mut driver = RecordingDriver::default();
        let mut units = TextureUnits::new(1);
        assert_eq!(
            units.assign(&mut driver, TextureHandle(1), 3, true).unwrap_err(),
            RenderError::UnitOutOfRange { unit: 3, available: 1 }
        );
    }

    #[test]
    fn texture_dispose_is_idempotent() {
        let mut driver = RecordingDriver::default();
        let tex = Texture::upload(&mut driver, &[255; 4], 1, 1).unwrap();
        tex.dispose(&mut driver);
        tex.dispose(&mut driver);
        assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteTexture(_))), 1);
    }
}
