//! Peak-magnitude normalization into the scratch buffer

use fid_core::{AcquisitionParams, NORMALIZE_SEARCH_FLOATS, peak_magnitude};

/// Write `data / peak` into `scratch`, leaving `data` untouched
///
/// The peak is searched over the first 50 complex samples since an echo
/// acquisition may not peak at the first point. Returns the peak magnitude;
/// a zero peak is not guarded and yields non-finite output.
pub fn normalize(data: &[f32], scratch: &mut [f32], params: &AcquisitionParams) -> f64 {
    let peak = peak_magnitude(data, NORMALIZE_SEARCH_FLOATS);
    let divisor = peak as f32;

    for j in (0..params.num_points).step_by(2) {
        scratch[j] = data[j] / divisor;
        scratch[j + 1] = data[j + 1] / divisor;
    }

    peak
}
