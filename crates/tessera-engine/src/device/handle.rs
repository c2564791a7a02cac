/// Opaque driver object names. The driver hands these out; the engine only
/// stores and passes them back.
macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(pub u32);
    };
}

handle!(
    /// GPU buffer (vertex or index data).
    BufferHandle
);
handle!(
    /// Vertex-attribute layout object (a VAO on GL-like drivers).
    LayoutHandle
);
handle!(
    /// Linked shader program.
    ShaderHandle
);
handle!(
    /// Uploaded texture.
    TextureHandle
);
handle!(
    /// Offscreen render target.
    TargetHandle
);

/// What a buffer holds; decides the bind point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}
