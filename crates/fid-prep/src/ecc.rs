//! Eddy current correction
//!
//! The unsuppressed acquisition carries the same eddy-current phase error as
//! the suppressed one, so its phase is subtracted point by point. The
//! reference channel itself ends up with zero phase (real, non-negative).

use fid_core::{AcquisitionParams, polar_at, write_polar};

/// Correct one complex sample of the pair at float index `j`, in place
#[inline]
pub(crate) fn ecc_sample(suppressed: &mut [f32], unsuppressed: &mut [f32], j: usize) {
    let (mag_sup, phase_sup) = polar_at(suppressed, j);
    let (mag_unsup, phase_unsup) = polar_at(unsuppressed, j);

    write_polar(suppressed, j, mag_sup, phase_sup - phase_unsup);
    write_polar(unsuppressed, j, mag_unsup, phase_unsup - phase_unsup);
}

/// Apply eddy current correction to both buffers over `num_points` floats, in place
pub fn ecc_correction(suppressed: &mut [f32], unsuppressed: &mut [f32], params: &AcquisitionParams) {
    for j in (0..params.num_points).step_by(2) {
        ecc_sample(suppressed, unsuppressed, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fid_core::magnitude_at;

    #[test]
    fn test_identical_phase_is_removed() {
        let params = AcquisitionParams::new(6, 0.1, 0.0);
        let mut sup = vec![1.0_f32, 1.0, -2.0, 0.5, 0.3, -0.7];
        let mut unsup = sup.clone();
        let mags: Vec<f64> = (0..3).map(|k| magnitude_at(&sup, 2 * k)).collect();

        ecc_correction(&mut sup, &mut unsup, &params);

        for k in 0..3 {
            let j = 2 * k;
            // Zero residual phase on the suppressed channel, magnitude kept
            assert!((sup[j] as f64 - mags[k]).abs() < 1e-6);
            assert!(sup[j + 1].abs() < 1e-6);
            // Reference channel is flattened exactly
            assert_eq!(unsup[j], mags[k] as f32);
            assert_eq!(unsup[j + 1], 0.0);
        }
    }

    #[test]
    fn test_relative_phase_survives() {
        let params = AcquisitionParams::new(2, 0.1, 0.0);
        // Suppressed at 90 degrees, reference at 45 degrees
        let mut sup = vec![0.0_f32, 2.0];
        let mut unsup = vec![1.0_f32, 1.0];

        ecc_correction(&mut sup, &mut unsup, &params);

        let expected = std::f64::consts::FRAC_PI_4;
        assert!((sup[0] as f64 - 2.0 * expected.cos()).abs() < 1e-6);
        assert!((sup[1] as f64 - 2.0 * expected.sin()).abs() < 1e-6);
        assert!((unsup[0] as f64 - 2.0_f64.sqrt()).abs() < 1e-6);
        assert_eq!(unsup[1], 0.0);
    }
}
