//! Interleaved complex sample helpers
//!
//! Acquisition buffers store N complex samples as 2N `f32` values laid out
//! `(re0, im0, re1, im1, ...)`. Every helper here addresses a sample by the
//! float index of its real component, so callers walk buffers in strides of 2.
//! Arithmetic happens in `f64`; only the stored result is narrowed to `f32`.

use num_complex::Complex64;

/// Complex value of the sample whose real part sits at float index `j`
#[inline]
pub fn sample_at(data: &[f32], j: usize) -> Complex64 {
    Complex64::new(data[j] as f64, data[j + 1] as f64)
}

/// Magnitude `sqrt(re² + im²)` of the sample at `j`
#[inline]
pub fn magnitude_at(data: &[f32], j: usize) -> f64 {
    sample_at(data, j).norm()
}

/// Magnitude and phase (`atan2(im, re)`, radians) of the sample at `j`
#[inline]
pub fn polar_at(data: &[f32], j: usize) -> (f64, f64) {
    sample_at(data, j).to_polar()
}

/// Rebuild the sample at `j` from magnitude and phase
///
/// Magnitude and trigonometric terms are narrowed separately before the
/// product, so a zero phase stores the magnitude exactly and a zero imaginary part.
#[inline]
pub fn write_polar(data: &mut [f32], j: usize, magnitude: f64, phase: f64) {
    let magnitude = magnitude as f32;
    data[j] = magnitude * phase.cos() as f32;
    data[j + 1] = magnitude * phase.sin() as f32;
}

/// Largest sample magnitude among the first `float_limit` floats
///
/// Samples that do not fit in `data` are ignored. Returns 0.0 for an empty window.
pub fn peak_magnitude(data: &[f32], float_limit: usize) -> f64 {
    let end = float_limit.min(data.len());
    let mut peak = 0.0;
    for j in (0..end).step_by(2) {
        if j + 1 >= data.len() {
            break;
        }
        let magnitude = magnitude_at(data, j);
        if magnitude > peak {
            peak = magnitude;
        }
    }
    peak
}
