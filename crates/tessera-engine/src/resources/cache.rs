use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::device::GraphicsDriver;
use crate::render::{Shader, Texture};

use super::{FontData, ResourceData, ResourceError, ResourceKind, ResourceProvider, SoundData};

/// Notification that a queued request finished loading.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResourceLoaded {
    pub key: String,
    pub kind: ResourceKind,
}

#[derive(Debug)]
struct LoadRequest {
    key: String,
    kind: ResourceKind,
}

/// Cloneable handle for queueing loads from other threads.
#[derive(Debug, Clone)]
pub struct ResourceRequester {
    tx: Sender<LoadRequest>,
}

impl ResourceRequester {
    /// Queues a load. Dropped silently if the cache is gone.
    pub fn request(&self, key: impl Into<String>, kind: ResourceKind) {
        let _ = self.tx.send(LoadRequest { key: key.into(), kind });
    }
}

/// Keyed store of loaded resources.
///
/// Texture and shader loads touch the driver, so the queue is drained by
/// [`process_pending`](Self::process_pending) on the render thread.
pub struct ResourceCache {
    provider: Box<dyn ResourceProvider>,
    tx: Sender<LoadRequest>,
    rx: Receiver<LoadRequest>,
    textures: HashMap<String, Arc<Texture>>,
    shaders: HashMap<String, Arc<Shader>>,
    fonts: HashMap<String, Arc<FontData>>,
    sounds: HashMap<String, Arc<SoundData>>,
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("pending", &self.rx.len())
            .field("textures", &self.textures.len())
            .field("shaders", &self.shaders.len())
            .field("fonts", &self.fonts.len())
            .field("sounds", &self.sounds.len())
            .finish()
    }
}

impl ResourceCache {
    pub fn new(provider: impl ResourceProvider + 'static) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            provider: Box::new(provider),
            tx,
            rx,
            textures: HashMap::new(),
            shaders: HashMap::new(),
            fonts: HashMap::new(),
            sounds: HashMap::new(),
        }
    }

    pub fn requester(&self) -> ResourceRequester {
        ResourceRequester { tx: self.tx.clone() }
    }

    #[inline]
    pub fn request(&self, key: impl Into<String>, kind: ResourceKind) {
        let _ = self.tx.send(LoadRequest { key: key.into(), kind });
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Drains the queue, loading each request not already cached.
    ///
    /// Failed loads are logged and skipped; they can be requested again.
    pub fn process_pending(&mut self, driver: &mut dyn GraphicsDriver) -> Vec<ResourceLoaded> {
        let mut loaded = Vec::new();
        while let Ok(req) = self.rx.try_recv() {
            if self.contains(&req.key, req.kind) {
                continue;
            }
            match self.load_now(driver, &req.key, req.kind) {
                Ok(()) => loaded.push(ResourceLoaded { key: req.key, kind: req.kind }),
                Err(e) => log::error!("{e}"),
            }
        }
        loaded
    }

    /// Loads synchronously, replacing any cached entry of the same kind.
    pub fn load_now(
        &mut self,
        driver: &mut dyn GraphicsDriver,
        key: &str,
        kind: ResourceKind,
    ) -> Result<(), ResourceError> {
        let data = self.provider.load(key, kind)?;
        if data.kind() != kind {
            return Err(ResourceError::KindMismatch { key: key.to_string(), expected: kind, found: data.kind() });
        }
        let upload_err = |source| ResourceError::Upload { key: key.to_string(), source };

        match data {
            ResourceData::Texture { pixels, width, height } => {
                let texture = Texture::upload(driver, &pixels, width, height).map_err(upload_err)?;
                if let Some(old) = self.textures.insert(key.to_string(), Arc::new(texture)) {
                    old.dispose(driver);
                }
            }
            ResourceData::Shader(source) => {
                let shader = Shader::compile(driver, key, &source).map_err(upload_err)?;
                if let Some(old) = self.shaders.insert(key.to_string(), Arc::new(shader)) {
                    old.dispose(driver);
                }
            }
            ResourceData::Font(font) => {
                self.fonts.insert(key.to_string(), Arc::new(font));
            }
            ResourceData::Sound(sound) => {
                self.sounds.insert(key.to_string(), Arc::new(sound));
            }
        }
        log::debug!("loaded {kind:?} `{key}`");
        Ok(())
    }

    pub fn contains(&self, key: &str, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Texture => self.textures.contains_key(key),
            ResourceKind::Shader => self.shaders.contains_key(key),
            ResourceKind::Font => self.fonts.contains_key(key),
            ResourceKind::Sound => self.sounds.contains_key(key),
        }
    }

    pub fn texture(&self, key: &str) -> Result<Arc<Texture>, ResourceError> {
        lookup(&self.textures, key)
    }

    pub fn shader(&self, key: &str) -> Result<Arc<Shader>, ResourceError> {
        lookup(&self.shaders, key)
    }

    pub fn font(&self, key: &str) -> Result<Arc<FontData>, ResourceError> {
        lookup(&self.fonts, key)
    }

    pub fn sound(&self, key: &str) -> Result<Arc<SoundData>, ResourceError> {
        lookup(&self.sounds, key)
    }

    /// Releases every driver resource and empties the cache.
    pub fn unload_all(&mut self, driver: &mut dyn GraphicsDriver) {
        for (_, t) in self.textures.drain() {
            t.dispose(driver);
        }
        for (_, s) in self.shaders.drain() {
            s.dispose(driver);
        }
        self.fonts.clear();
        self.sounds.clear();
    }
}

fn lookup<T>(map: &HashMap<String, Arc<T>>, key: &str) -> Result<Arc<T>, ResourceError> {
    map.get(key).cloned().ok_or_else(|| ResourceError::NotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::device::{DriverCall, RecordingDriver, ShaderSource};

    struct Fixed;

    impl ResourceProvider for Fixed {
        fn load(&self, key: &str, kind: ResourceKind) -> Result<ResourceData, ResourceError> {
            match (key, kind) {
                ("white", ResourceKind::Texture) => {
                    Ok(ResourceData::Texture { pixels: vec![255; 4], width: 1, height: 1 })
                }
                ("sprite", ResourceKind::Shader) => Ok(ResourceData::Shader(ShaderSource::new(
                    "in vec2 a_position;",
                    "uniform sampler2D u_texture;",
                ))),
                ("white", _) => Ok(ResourceData::Font(FontData { family: "x".into(), bytes: vec![] })),
                _ => Err(ResourceError::NotFound(key.to_string())),
            }
        }
    }

    #[test]
    fn missing_key_names_the_key() {
        let cache = ResourceCache::new(Fixed);
        let err = cache.texture("grass").unwrap_err();
        assert!(err.to_string().contains("grass"));
    }

    #[test]
    fn queued_requests_load_once_per_drain() {
        let mut cache = ResourceCache::new(Fixed);
        let mut driver = RecordingDriver::default();
        let requester = cache.requester();

        thread::spawn(move || {
            requester.request("white", ResourceKind::Texture);
            requester.request("sprite", ResourceKind::Shader);
            requester.request("white", ResourceKind::Texture);
        })
        .join()
        .unwrap();
        cache.request("missing", ResourceKind::Sound);

        let loaded = cache.process_pending(&mut driver);
        assert_eq!(
            loaded,
            vec![
                ResourceLoaded { key: "white".into(), kind: ResourceKind::Texture },
                ResourceLoaded { key: "sprite".into(), kind: ResourceKind::Shader },
            ]
        );
        assert_eq!(cache.pending(), 0);
        assert_eq!(driver.count(|c| matches!(c, DriverCall::UploadTexture(..))), 1);
        assert!(cache.shader("sprite").unwrap().has_uniform("u_texture"));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut cache = ResourceCache::new(Fixed);
        let mut driver = RecordingDriver::default();
        let err = cache.load_now(&mut driver, "white", ResourceKind::Sound).unwrap_err();
        assert!(matches!(err, ResourceError::KindMismatch { found: ResourceKind::Font, .. }));
    }

    #[test]
    fn unload_disposes_driver_objects() {
        let mut cache = ResourceCache::new(Fixed);
        let mut driver = RecordingDriver::default();
        cache.load_now(&mut driver, "white", ResourceKind::Texture).unwrap();
        cache.load_now(&mut driver, "sprite", ResourceKind::Shader).unwrap();
        cache.unload_all(&mut driver);

        assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteTexture(_))), 1);
        assert_eq!(driver.count(|c| matches!(c, DriverCall::DeleteShader(_))), 1);
        assert!(cache.texture("white").is_err());
    }
}
