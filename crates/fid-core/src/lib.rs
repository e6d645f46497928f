//! fid-core: Shared types for FID preprocessing
//!
//! This crate provides the foundational types used by the preprocessing
//! pipeline: interleaved complex sample helpers, per-channel acquisition
//! parameters and preprocessing flags, channel identity and the error type.

mod channel;
mod config;
mod constants;
mod error;
mod params;
mod sample;

pub use channel::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use params::*;
pub use sample::*;

pub use num_complex::Complex64;
