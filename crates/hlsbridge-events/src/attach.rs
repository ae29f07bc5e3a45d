/// Engine lifecycle on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachEvent {
    /// A fresh engine took over the surface and was handed `src`.
    Attached { src: String, generation: u64 },
    /// The engine was released and disposed.
    Detached { generation: u64 },
    /// A source was handed to the host without an engine.
    NativeSource { src: String },
}
