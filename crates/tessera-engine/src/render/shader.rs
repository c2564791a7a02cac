use std::sync::atomic::{AtomicBool, Ordering};

use crate::device::{
    GraphicsDriver, ReflectedAttribute, ReflectedUniform, ShaderHandle, ShaderSource, UniformValue,
};

use super::error::RenderError;

/// Namespace prefix on shader attribute names. A shader attribute
/// `a_position` is fed by the mesh attribute `position`.
pub const ATTRIBUTE_PREFIX: &str = "a_";

/// Uniform receiving the frame's view-projection matrix, when declared.
pub const VIEW_PROJECTION_UNIFORM: &str = "u_view_projection";

/// Uniform receiving the per-draw model transform, when declared.
pub const MODEL_UNIFORM: &str = "u_model";

/// A linked shader program plus the reflection data the driver reported.
///
/// Shared between drawables through `Arc<Shader>`; the owner that loaded it
/// (usually the resource cache) is responsible for [`Shader::dispose`].
#[derive(Debug)]
pub struct Shader {
    label: String,
    handle: ShaderHandle,
    attributes: Vec<ReflectedAttribute>,
    uniforms: Vec<ReflectedUniform>,
    disposed: AtomicBool,
}

impl Shader {
    pub fn compile(
        driver: &mut dyn GraphicsDriver,
        label: impl Into<String>,
        source: &ShaderSource,
    ) -> Result<Self, RenderError> {
        let label = label.into();
        let compiled = driver.compile_shader(source)?;
        log::debug!(
            "compiled shader `{label}` ({} attributes, {} uniforms)",
            compiled.attributes.len(),
            compiled.uniforms.len()
        );
        Ok(Self {
            label,
            handle: compiled.handle,
            attributes: compiled.attributes,
            uniforms: compiled.uniforms,
            disposed: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    #[inline]
    pub fn attributes(&self) -> &[ReflectedAttribute] {
        &self.attributes
    }

    pub fn uniform_location(&self, name: &str) -> Option<u32> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| u.location)
    }

    #[inline]
    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniform_location(name).is_some()
    }

    /// Fails on the first uniform in `names` the program does not declare.
    pub fn require_uniforms(&self, names: &[&str]) -> Result<(), RenderError> {
        match names.iter().find(|n| !self.has_uniform(n)) {
            Some(missing) => Err(self.missing(missing)),
            None => Ok(()),
        }
    }

    /// Sets a uniform the caller requires to exist.
    pub fn set_uniform(
        &self,
        driver: &mut dyn GraphicsDriver,
        name: &str,
        value: UniformValue,
    ) -> Result<(), RenderError> {
        let location = self.uniform_location(name).ok_or_else(|| self.missing(name))?;
        if self.is_disposed() {
            log::warn!("set_uniform `{name}` on disposed shader `{}` ignored", self.label);
            return Ok(());
        }
        driver.set_uniform(self.handle, location, value);
        Ok(())
    }

    /// Sets a uniform only if the program declares it. Returns whether it did.
    pub fn set_optional_uniform(
        &self,
        driver: &mut dyn GraphicsDriver,
        name: &str,
        value: UniformValue,
    ) -> bool {
        match self.uniform_location(name) {
            Some(location) if !self.is_disposed() => {
                driver.set_uniform(self.handle, location, value);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Releases the driver program. Safe to call more than once.
    pub fn dispose(&self, driver: &mut dyn GraphicsDriver) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        driver.delete_shader(self.handle);
        log::trace!("disposed shader `{}`", self.label);
    }

    fn missing(&self, name: &str) -> RenderError {
        RenderError::MissingUniform { shader: self.label.clone(), name: name.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DriverCall, RecordingDriver};

    fn shader(driver: &mut RecordingDriver) -> Shader {
        let src = ShaderSource::new(
            "in vec2 a_position;\nuniform mat4 u_view_projection;",
            "uniform vec4 u_color;",
        );
        Shader::compile(driver, "flat", &src).unwrap()
    }

    #[test]
    fn missing_uniform_is_an_error() {
        let mut driver = RecordingDriver::default();
        let s = shader(&mut driver);
        let err = s.set_uniform(&mut driver, "u_texture", UniformValue::Sampler(0)).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingUniform { shader: "flat".into(), name: "u_texture".into() }
        );
        assert!(s.require_uniforms(&["u_color", "u_view_projection"]).is_ok());
        assert!(s.require_uniforms(&["u_color", "u_model"]).is_err());
    }

    #[test]
    fn optional_uniform_skips_undeclared() {
        let mut driver = RecordingDriver::default();
        let s = shader(&mut driver);
        assert!(!s.set_optional_uniform(&mut driver, MODEL_UNIFORM, UniformValue::Float(1.0)));
        assert!(s.set_optional_uniform(&mut driver, "u_color", UniformValue::Vec4([1.0; 4])));
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut driver = RecordingDriver::default();
        let s = shader(&mut driver);
        s.dispose(&mut driver);
        s.dispose(&mut driver);
        assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteShader(_))), 1);
        assert!(s.is_disposed());
    }
}
