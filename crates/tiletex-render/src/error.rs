use thiserror::Error;

/// Failures the rasterization side can produce.
///
/// Propagation policy: these are caught at tile granularity by the
/// pipeline and turned into placeholder tiles; a single bad chunk never
/// aborts the remaining sequence. Only [`TileError::FontUnavailable`]
/// escapes to the caller, and only from renderer construction.
#[derive(Debug, Error)]
pub enum TileError {
    /// A macro survived normalization that the lightweight math mode
    /// has no mapping for.
    #[error("unsupported macro \\{name} in lightweight math mode")]
    UnsupportedMacro { name: String },

    /// No usable font face could be resolved at startup.
    #[error("no usable font face found (system fonts and embedded fallback)")]
    FontUnavailable,

    /// The backend could not lay out the given content.
    #[error("layout failed: {0}")]
    Layout(String),

    /// PNG encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
