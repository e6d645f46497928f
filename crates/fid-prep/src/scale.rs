//! Amplitude scaling with decade normalization and near-zero rescue

use fid_core::{AcquisitionParams, NEAR_ZERO, SCALE_SEARCH_FLOATS, peak_magnitude};

/// Largest magnitude among the first 25 complex samples
#[inline]
pub fn scale_search_point(data: &[f32]) -> f64 {
    peak_magnitude(data, SCALE_SEARCH_FLOATS)
}

/// Move `point` into its first decade, tracking the same powers of ten in `scale_factor`
///
/// Points below 1 are multiplied up until they reach at least 1; points above 10
/// are divided down until they are no longer greater than 10, so exactly 10 is
/// left alone. Returns `None` without touching the factor when `point` is zero
/// or not finite, since no number of decades would bring it into range.
pub fn decade_search(point: f64, scale_factor: &mut f64) -> Option<f64> {
    if point == 0.0 || !point.is_finite() {
        return None;
    }

    let mut point = point;
    if point < 1.0 {
        while point < 1.0 {
            point *= 10.0;
            *scale_factor *= 10.0;
        }
    } else if point > 10.0 {
        while point > 10.0 {
            point /= 10.0;
            *scale_factor /= 10.0;
        }
    }
    Some(point)
}

#[inline]
fn is_negligible(value: f32) -> bool {
    value.abs() < NEAR_ZERO
}

#[inline]
fn scale_value(value: f32, scale_factor: f64) -> f32 {
    (value as f64 * scale_factor) as f32
}

/// Multiply every component of the first `num_points` floats by `scale_factor`, in place
///
/// A scaled component that collapses below [`NEAR_ZERO`] is rebuilt from the
/// previous (already scaled) component of the same kind and the next one
/// (scaled on the fly): `sqrt(0.5 * (prev² + next²))` when both are significant
/// and a next sample exists, otherwise `prev * 0.5`. The first sample has no
/// predecessor and is never rebuilt.
pub fn scale(data: &mut [f32], params: &AcquisitionParams, scale_factor: f64) {
    let num_points = params.num_points;

    for j in (0..num_points).step_by(2) {
        data[j] = scale_value(data[j], scale_factor);
        data[j + 1] = scale_value(data[j + 1], scale_factor);

        rescue_component(data, j, 0, num_points, scale_factor);
        rescue_component(data, j, 1, num_points, scale_factor);
    }
}

fn rescue_component(data: &mut [f32], j: usize, part: usize, num_points: usize, scale_factor: f64) {
    let k = j + part;
    if j < 2 || !is_negligible(data[k]) {
        return;
    }

    let next = data
        .get(k + 2)
        .map_or(0.0, |&v| scale_value(v.abs(), scale_factor));
    let prev = data[k - 2];

    data[k] = if !is_negligible(prev) && !is_negligible(next) && j + 2 < num_points {
        let prev = prev as f64;
        let next = next as f64;
        (0.5 * (prev * prev + next * next)).sqrt() as f32
    } else {
        prev * 0.5
    };
}
