//! DC offset removal from the tail of the FID

use fid_core::AcquisitionParams;

/// Average real and imaginary offset over the last eighth of the buffer
///
/// The window starts `num_points / 8` floats before the end and is walked in
/// strides of 2; the sums are divided by half the window length.
pub fn baseline_offset(data: &[f32], params: &AcquisitionParams) -> (f32, f32) {
    let num_points = params.num_points;
    let last_eighth = num_points / 8;

    let mut sum_real = 0.0_f64;
    let mut sum_imag = 0.0_f64;
    for j in ((num_points - last_eighth)..num_points).step_by(2) {
        sum_real += data[j] as f64;
        sum_imag += data.get(j + 1).copied().unwrap_or(0.0) as f64;
    }

    let count = last_eighth as f64 / 2.0;
    ((sum_real / count) as f32, (sum_imag / count) as f32)
}

/// Subtract the tail offset from every sample, in place
pub fn baseline_correct(data: &mut [f32], params: &AcquisitionParams) -> (f32, f32) {
    let (offset_real, offset_imag) = baseline_offset(data, params);

    for j in (0..params.num_points).step_by(2) {
        data[j] -= offset_real;
        data[j + 1] -= offset_imag;
    }

    (offset_real, offset_imag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal_goes_to_zero() {
        let params = AcquisitionParams::new(64, 0.1, 0.0);
        let mut data: Vec<f32> = (0..64).map(|i| if i % 2 == 0 { 0.37 } else { -1.25 }).collect();

        let (re, im) = baseline_correct(&mut data, &params);

        assert_eq!(re, 0.37);
        assert_eq!(im, -1.25);
        assert!(data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_only_tail_is_averaged() {
        // 32 floats: tail window is the last 4 floats (2 complex samples)
        let params = AcquisitionParams::new(32, 0.1, 0.0);
        let mut data = vec![5.0_f32; 32];
        data[28] = 1.0;
        data[29] = 2.0;
        data[30] = 3.0;
        data[31] = 4.0;

        let (re, im) = baseline_offset(&data, &params);
        assert!((re - 2.0).abs() < 1e-6);
        assert!((im - 3.0).abs() < 1e-6);

        baseline_correct(&mut data, &params);
        assert!((data[0] - 3.0).abs() < 1e-6);
        assert!((data[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_second_pass_is_stable() {
        let params = AcquisitionParams::new(128, 0.1, 0.0);
        let mut data: Vec<f32> = (0..128)
            .map(|i| ((i as f32) * 0.3).sin() * (-(i as f32) * 0.05).exp() + 0.2)
            .collect();

        baseline_correct(&mut data, &params);
        let once = data.clone();
        baseline_correct(&mut data, &params);

        for (a, b) in data.iter().zip(&once) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_samples_past_num_points_untouched() {
        let params = AcquisitionParams::new(16, 0.1, 0.0);
        let mut data = vec![1.0_f32; 20];

        baseline_correct(&mut data, &params);

        assert!(data[..16].iter().all(|&v| v == 0.0));
        assert!(data[16..].iter().all(|&v| v == 1.0));
    }
}
