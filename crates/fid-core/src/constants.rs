//! Named numeric constants shared by the preprocessing stages

/// π used by the apodization and filter derivation formulas
pub const PI: f64 = std::f64::consts::PI;

/// Float slots searched for the decade-normalization point (25 complex samples)
pub const SCALE_SEARCH_FLOATS: usize = 50;

/// Float slots searched for the normalization peak (50 complex samples)
pub const NORMALIZE_SEARCH_FLOATS: usize = 100;

/// Scaled components below this magnitude are rebuilt from their neighbours
pub const NEAR_ZERO: f32 = 1e-9;

/// Reference magnitudes below this are treated as zero by QUECC
pub const QUECC_MAGNITUDE_FLOOR: f64 = 1e-6;

/// Pre-acquisition delay is supplied in microseconds
pub const MICROSECONDS_PER_SECOND: f64 = 1e6;
