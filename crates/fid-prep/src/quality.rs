//! QUALITY deconvolution and the hybrid QUALITY/ECC (QUECC) correction
//!
//! QUALITY divides each acquisition by a normalized water reference (the
//! unsuppressed channel's scratch buffer) in the polar domain: magnitudes are
//! divided and reference phase subtracted. QUECC applies the same division up
//! to a boundary and eddy current correction from the boundary onwards.

use fid_core::{AcquisitionParams, QUECC_MAGNITUDE_FLOOR, polar_at, write_polar};

use crate::ecc::ecc_sample;

/// Divide the sample at `j` by the reference sample, in place
#[inline]
fn deconvolve_sample(data: &mut [f32], j: usize, ref_magnitude: f64, ref_phase: f64, floor: Option<f64>) {
    let (magnitude, phase) = polar_at(data, j);

    let divided = match floor {
        Some(floor) if ref_magnitude < floor => 0.0,
        _ => magnitude / ref_magnitude,
    };

    write_polar(data, j, divided, phase - ref_phase);
}

/// QUALITY deconvolution of both buffers against `reference`, in place
///
/// The reference magnitude is used as a divisor unguarded: a zero reference
/// sample yields infinite or NaN output for that sample.
pub fn quality(
    suppressed: &mut [f32],
    unsuppressed: &mut [f32],
    reference: &[f32],
    params: &AcquisitionParams,
) {
    for j in (0..params.num_points).step_by(2) {
        let (ref_magnitude, ref_phase) = polar_at(reference, j);
        deconvolve_sample(suppressed, j, ref_magnitude, ref_phase, None);
        deconvolve_sample(unsuppressed, j, ref_magnitude, ref_phase, None);
    }
}

/// QUALITY before float index `boundary`, eddy current correction from it on, in place
///
/// In the QUALITY region a reference magnitude below
/// [`QUECC_MAGNITUDE_FLOOR`] produces a zero magnitude instead of a division.
pub fn quecc(
    suppressed: &mut [f32],
    unsuppressed: &mut [f32],
    reference: &[f32],
    params: &AcquisitionParams,
    boundary: usize,
) {
    for j in (0..params.num_points).step_by(2) {
        if j < boundary {
            let (ref_magnitude, ref_phase) = polar_at(reference, j);
            let floor = Some(QUECC_MAGNITUDE_FLOOR);
            deconvolve_sample(suppressed, j, ref_magnitude, ref_phase, floor);
            deconvolve_sample(unsuppressed, j, ref_magnitude, ref_phase, floor);
        } else {
            ecc_sample(suppressed, unsuppressed, j);
        }
    }
}
