//! Exponential apodization
//!
//! Each complex sample is weighted by `exp(-π · |t| · lb)` where `t` is the
//! sample time (dwell × index + pre-acquisition delay) and `lb` the channel's
//! `comp_filter` constant. After QUECC the constant can instead be derived
//! from the amplitude step at the QUALITY/ECC boundary, and only the QUALITY
//! region is weighted.

use fid_core::{AcquisitionParams, Channel, PI, PreprocessConfig};

/// Weight applied to the sample at float index `j`
#[inline]
pub fn apodization_weight(params: &AcquisitionParams, j: usize, comp_filter: f64) -> f32 {
    (-PI * params.sample_time(j).abs() * comp_filter).exp() as f32
}

/// Decay constant that bridges the amplitude step across the QUECC boundary
///
/// Uses the real parts of the unsuppressed samples just before (`boundary - 2`)
/// and at `boundary`. Returns `None` when the boundary leaves no sample on
/// either side.
pub fn derive_quecc_filter(unsuppressed: &[f32], params: &AcquisitionParams, boundary: usize) -> Option<f64> {
    if boundary < 2 || boundary >= params.num_points {
        return None;
    }

    let last_quality = unsuppressed[boundary - 2] as f64;
    let first_ecc = unsuppressed[boundary] as f64;
    let time = params.sample_time(boundary - 2);

    Some(-(first_ecc / last_quality).ln() / (time.abs() * PI))
}

/// Apply the exponential weight in place, stopping at `limit` when one is given
pub fn apodize(data: &mut [f32], params: &AcquisitionParams, comp_filter: f64, limit: Option<usize>) {
    let end = limit.map_or(params.num_points, |limit| limit.min(params.num_points));

    for j in (0..end).step_by(2) {
        let weight = apodization_weight(params, j, comp_filter);
        data[j] *= weight;
        data[j + 1] *= weight;
    }
}

/// Filter both channels, deriving QUECC constants first, in place
///
/// `configs` holds one entry per buffer supplied. Hybrid mode follows the
/// suppressed channel's `pre_quecc` flag and boundary; a channel with
/// `pre_quecc_if` set has its `comp_filter` overwritten by
/// [`derive_quecc_filter`] on the unsuppressed buffer. Returns the channels
/// that were weighted.
pub fn filter(
    suppressed: &mut [f32],
    unsuppressed: Option<&mut [f32]>,
    params: &AcquisitionParams,
    configs: &mut [PreprocessConfig],
) -> Vec<Channel> {
    let Some(primary) = configs.first() else {
        return Vec::new();
    };
    let hybrid = primary.pre_quecc;
    let boundary = primary.pre_quecc_points;

    if hybrid {
        for (index, config) in configs.iter_mut().enumerate() {
            if !config.pre_quecc_if {
                continue;
            }
            let derived = unsuppressed
                .as_deref()
                .and_then(|reference| derive_quecc_filter(reference, params, boundary));
            match derived {
                Some(comp_filter) => {
                    log::debug!(
                        "Filter: channel {} comp_filter derived from boundary {}: {:.6}",
                        index,
                        boundary,
                        comp_filter
                    );
                    config.comp_filter = comp_filter;
                }
                None => log::warn!(
                    "Filter: cannot derive comp_filter for channel {} (boundary {}, {} points); keeping {}",
                    index,
                    boundary,
                    params.num_points,
                    config.comp_filter
                ),
            }
        }
    }

    let limit = hybrid.then_some(boundary);
    let mut filtered = Vec::new();
    let buffers = std::iter::once(suppressed).chain(unsuppressed);

    for ((channel, buffer), config) in Channel::ALL.into_iter().zip(buffers).zip(configs.iter()) {
        if config.comp_filter_enabled() {
            apodize(buffer, params, config.comp_filter, limit);
            filtered.push(channel);
        }
    }

    filtered
}
