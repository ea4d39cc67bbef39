//! # tiletex core
//!
//! Mid-pipeline services for the tiletex renderer: the immutable render
//! configuration (including the startup LaTeX capability probe), the
//! greedy tile packer, and the math-safe text wrapper.
//!
//! ## Modules
//!
//! - [`config`] - Process-wide [`RenderConfig`](config::RenderConfig),
//!   resolved once at startup and passed explicitly into the pipeline
//! - [`pack`] - Merges consecutive same-kind blocks into size-bounded
//!   [`Chunk`](pack::Chunk)s, one chunk per output tile
//! - [`wrap`] - Reflows non-math chunks to a column budget without ever
//!   splitting an inline math span
//!
//! ## Design Philosophy
//!
//! - **No hidden globals**: everything configurable lives in
//!   `RenderConfig`; the probe result is data, not ambient state
//! - **Pure transforms**: packing and wrapping are deterministic
//!   functions of their inputs, trivially testable
//! - **Degrade, don't fail**: nothing in this crate returns an error;
//!   malformed content flows through as literal text

pub mod config;
pub mod pack;
pub mod wrap;

pub use config::{detect_full_latex, RenderConfig};
pub use pack::{pack_blocks, Chunk};
pub use wrap::wrap_chunk;
