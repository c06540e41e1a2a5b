//! Rasterlab Core - Raster transformation engine
//!
//! This crate is the computational core beneath a command dispatcher and a
//! desktop UI: a library of pixel-matrix algorithms operating on named
//! in-memory raster buffers. It provides convolution filters, color
//! transforms, Haar-wavelet lossy compression, histogram rendering,
//! peak-aligned color correction, quadratic levels adjustment, region
//! compositing, and bilinear downscaling.
//!
//! Script parsing, interactive sessions, UI wiring, and file codecs are
//! external collaborators: the engine consumes decoded pixel grids and
//! produces pixel grids, nothing else.
//!
//! # Buffer model
//!
//! All state lives in a [`BufferStore`], a name-keyed registry of
//! [`RasterBuffer`]s. Operations read operands by name, compute a fresh
//! buffer, and write it back under a target name; a failed operation never
//! mutates the store. Channel arithmetic is deliberately unclamped (see
//! [`buffer`]); values are narrowed to 0-255 only when handed back to the
//! codec layer.

pub mod buffer;
pub mod color;
pub mod composite;
pub mod compress;
pub mod correct;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod levels;
pub mod ops;
pub mod scale;
pub mod store;

pub use buffer::{Channel, RasterBuffer};
pub use color::BrightnessMode;
pub use error::EngineError;
pub use levels::LevelsParams;
pub use ops::{execute, execute_partial, Operation};
pub use store::BufferStore;
