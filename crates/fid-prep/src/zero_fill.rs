//! Trailing zero padding

use fid_core::{AcquisitionParams, Channel, PrepError, PrepResult};

/// Outcome of a zero-fill request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroFillOutcome {
    /// Floats from `num_points` up to `target` were set to zero
    Filled { from: usize, to: usize },
    /// Target shorter than the acquisition; nothing was written
    Skipped { target: usize, num_points: usize },
}

impl ZeroFillOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Floats written when padding up to `target` (complex samples are never split)
#[inline]
pub fn zero_fill_len(target: usize) -> usize {
    target + target % 2
}

/// Zero the region `num_points..target` of both buffers, in place
///
/// The same target and point count apply to both channels. Buffers must
/// already be allocated to [`zero_fill_len`] of the target.
pub fn zero_fill(
    suppressed: &mut [f32],
    unsuppressed: Option<&mut [f32]>,
    params: &AcquisitionParams,
    target: usize,
) -> PrepResult<ZeroFillOutcome> {
    let num_points = params.num_points;
    if target < num_points {
        return Ok(ZeroFillOutcome::Skipped { target, num_points });
    }

    let end = zero_fill_len(target);
    let mut buffers = vec![(Channel::Suppressed, suppressed)];
    if let Some(unsuppressed) = unsuppressed {
        buffers.push((Channel::Unsuppressed, unsuppressed));
    }

    for (channel, buffer) in &buffers {
        if buffer.len() < end {
            return Err(PrepError::BufferTooShort {
                channel: *channel,
                buffer: "data",
                required: end,
                actual: buffer.len(),
            });
        }
    }

    for (_, buffer) in buffers {
        buffer[num_points..end].fill(0.0);
    }

    Ok(ZeroFillOutcome::Filled {
        from: num_points,
        to: end,
    })
}
