//! Acquisition parameters

use serde::{Deserialize, Serialize};

use crate::{MICROSECONDS_PER_SECOND, PrepError, PrepResult};

/// Per-channel acquisition metadata, immutable during a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionParams {
    /// Float count of the acquisition (2 × complex samples)
    pub num_points: usize,
    /// Total acquisition time (seconds)
    pub acquisition_time: f64,
    /// Delay before the first sample (microseconds)
    pub pre_delay_time: f64,
}

impl Default for AcquisitionParams {
    fn default() -> Self {
        Self {
            num_points: 2048,
            acquisition_time: 0.512,
            pre_delay_time: 0.0,
        }
    }
}

impl AcquisitionParams {
    pub fn new(num_points: usize, acquisition_time: f64, pre_delay_time: f64) -> Self {
        Self {
            num_points,
            acquisition_time,
            pre_delay_time,
        }
    }

    /// Number of complex samples
    #[inline]
    pub fn complex_points(&self) -> usize {
        self.num_points / 2
    }

    /// Time between consecutive complex samples (seconds)
    #[inline]
    pub fn dwell_time(&self) -> f64 {
        self.acquisition_time / self.complex_points() as f64
    }

    /// Pre-acquisition delay converted to seconds
    #[inline]
    pub fn delay_seconds(&self) -> f64 {
        self.pre_delay_time / MICROSECONDS_PER_SECOND
    }

    /// Time of the sample whose real part sits at float index `j`
    #[inline]
    pub fn sample_time(&self, j: usize) -> f64 {
        (j / 2) as f64 * self.dwell_time() + self.delay_seconds()
    }

    /// Check the point count is even and holds at least one sample
    pub fn validate(&self) -> PrepResult<()> {
        if self.num_points < 2 {
            return Err(PrepError::InvalidParams(format!(
                "num_points must be at least 2, got {}",
                self.num_points
            )));
        }
        if self.num_points % 2 != 0 {
            return Err(PrepError::InvalidParams(format!(
                "num_points must be even, got {}",
                self.num_points
            )));
        }
        Ok(())
    }
}
