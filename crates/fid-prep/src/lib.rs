//! fid-prep: Time-Domain NMR Preprocessing
//!
//! Numeric corrections applied to FIDs (free induction decays) before they
//! are Fourier transformed elsewhere:
//! - Amplitude scaling with decade normalization and near-zero rescue
//! - Baseline (DC offset) removal from the tail of the FID
//! - Peak normalization into a scratch buffer
//! - Eddy current correction (ECC) against an unsuppressed reference
//! - QUALITY deconvolution and the hybrid QUALITY/ECC (QUECC)
//! - Exponential apodization, with a QUECC-derived constant
//! - Zero filling
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      PreprocessPipeline                           │
//! │                                                                   │
//! │  per channel          pair                 per channel   pair     │
//! │  ┌──────────────┐   ┌───────────────┐   ┌──────┐   ┌──────────┐  │
//! │  │ Scale        │ → │ ECC           │ → │ Tilt │ → │ Filter   │  │
//! │  │ Baseline     │   │ QUALITY       │   └──────┘   │ ZeroFill │  │
//! │  │ Normalize    │   │ QUECC         │              └──────────┘  │
//! │  └──────────────┘   └───────────────┘                            │
//! │                                                                   │
//! │  BatchPreprocessor: independent acquisition sets on a rayon pool  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Buffers are interleaved `(re, im)` `f32` slices owned by the caller and
//! corrected in place.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fid_prep::{ChannelBuffers, PreprocessPipeline};
//! use fid_core::{AcquisitionParams, ChannelCount, PreprocessConfig};
//!
//! let params = AcquisitionParams::new(4096, 1.024, 0.0);
//! let mut pipeline = PreprocessPipeline::new(
//!     ChannelCount::Pair,
//!     vec![PreprocessConfig::new().with_scaling(true).with_ecc(true), PreprocessConfig::new()],
//!     vec![params, params],
//! )?;
//!
//! let report = pipeline.run(&mut [
//!     ChannelBuffers::new(&mut suppressed, &mut suppressed_scratch),
//!     ChannelBuffers::new(&mut unsuppressed, &mut unsuppressed_scratch),
//! ])?;
//! assert_eq!(report.status_code(), 1);
//! ```

mod baseline;
mod batch;
mod ecc;
mod filter;
mod normalize;
mod pipeline;
mod quality;
mod report;
mod scale;
mod zero_fill;

pub use baseline::*;
pub use batch::*;
pub use ecc::*;
pub use filter::*;
pub use normalize::*;
pub use pipeline::*;
pub use quality::*;
pub use report::*;
pub use scale::*;
pub use zero_fill::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
