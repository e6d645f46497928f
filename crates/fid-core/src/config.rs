//! Per-channel preprocessing configuration

use serde::{Deserialize, Serialize};

use crate::{AcquisitionParams, ChannelCount, PrepResult};

/// Preprocessing flags and derived state for one channel
///
/// Pair-wide corrections (`pre_ecc`, `pre_quality`, `pre_quecc` and the
/// QUECC boundary) are read from the suppressed channel's config only.
/// `scale_factor` and `comp_filter` are rewritten by the pipeline during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Decade-normalize the amplitude before scaling
    pub scale: bool,
    /// Remove the DC offset after scaling
    pub baseline_correct: bool,
    /// Write a peak-normalized copy into the scratch buffer
    pub max_normalize: bool,
    /// Baseline correct again after ECC/QUALITY/QUECC
    pub tilt: bool,

    /// Eddy current correction across the pair
    pub pre_ecc: bool,
    /// QUALITY deconvolution against the unsuppressed scratch buffer
    pub pre_quality: bool,
    /// QUALITY before `pre_quecc_points`, ECC from there on
    pub pre_quecc: bool,
    /// Derive this channel's `comp_filter` from the QUECC boundary step
    pub pre_quecc_if: bool,
    /// Float index where the QUALITY region ends and the ECC region begins
    pub pre_quecc_points: usize,

    /// Exponential apodization constant (Hz); 0 disables the filter
    pub comp_filter: f64,
    /// Zero-fill target length in floats
    pub zero_fill: Option<usize>,

    /// Amplitude multiplier, adjusted by the decade search
    pub scale_factor: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            scale: false,
            baseline_correct: false,
            max_normalize: false,
            tilt: false,
            pre_ecc: false,
            pre_quality: false,
            pre_quecc: false,
            pre_quecc_if: false,
            pre_quecc_points: 0,
            comp_filter: 0.0,
            zero_fill: None,
            scale_factor: 1.0,
        }
    }
}

impl PreprocessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn comp_filter_enabled(&self) -> bool {
        self.comp_filter != 0.0
    }

    #[inline]
    pub fn zero_fill_enabled(&self) -> bool {
        self.zero_fill.is_some()
    }

    pub fn with_scaling(mut self, enabled: bool) -> Self {
        self.scale = enabled;
        self
    }

    pub fn with_baseline_correction(mut self, enabled: bool) -> Self {
        self.baseline_correct = enabled;
        self
    }

    pub fn with_max_normalize(mut self, enabled: bool) -> Self {
        self.max_normalize = enabled;
        self
    }

    pub fn with_tilt(mut self, enabled: bool) -> Self {
        self.tilt = enabled;
        self
    }

    pub fn with_ecc(mut self, enabled: bool) -> Self {
        self.pre_ecc = enabled;
        self
    }

    pub fn with_quality(mut self, enabled: bool) -> Self {
        self.pre_quality = enabled;
        self
    }

    /// Enable QUECC with the given boundary (float index)
    pub fn with_quecc(mut self, boundary: usize) -> Self {
        self.pre_quecc = true;
        self.pre_quecc_points = boundary;
        self
    }

    pub fn with_quecc_filter(mut self, enabled: bool) -> Self {
        self.pre_quecc_if = enabled;
        self
    }

    pub fn with_comp_filter(mut self, hz: f64) -> Self {
        self.comp_filter = hz;
        self
    }

    pub fn with_zero_fill(mut self, target: usize) -> Self {
        self.zero_fill = Some(target);
        self
    }

    pub fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }
}

/// Parameters and flags for one channel of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSetup {
    pub params: AcquisitionParams,
    pub preprocess: PreprocessConfig,
}

impl ChannelSetup {
    pub fn new(params: AcquisitionParams, preprocess: PreprocessConfig) -> Self {
        Self { params, preprocess }
    }
}

/// Complete description of a preprocessing run (serializable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Suppressed channel first, optional unsuppressed reference second
    pub channels: Vec<ChannelSetup>,
}

impl PipelineConfig {
    pub fn single(setup: ChannelSetup) -> Self {
        Self {
            channels: vec![setup],
        }
    }

    pub fn pair(suppressed: ChannelSetup, unsuppressed: ChannelSetup) -> Self {
        Self {
            channels: vec![suppressed, unsuppressed],
        }
    }

    pub fn channel_count(&self) -> PrepResult<ChannelCount> {
        ChannelCount::from_len(self.channels.len())
    }

    pub fn from_json(json: &str) -> PrepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PrepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreprocessConfig::default();
        assert_eq!(config.scale_factor, 1.0);
        assert!(!config.comp_filter_enabled());
        assert!(!config.zero_fill_enabled());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "channels": [
                { "params": { "num_points": 4096, "acquisition_time": 1.024 },
                  "preprocess": { "scale": true, "pre_quecc": true, "pre_quecc_points": 200 } },
                { "preprocess": { "comp_filter": 2.5, "zero_fill": 8192 } }
            ]
        }"#;

        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.channel_count().unwrap(), ChannelCount::Pair);

        let sup = &config.channels[0];
        assert_eq!(sup.params.num_points, 4096);
        assert_eq!(sup.params.pre_delay_time, 0.0);
        assert!(sup.preprocess.scale);
        assert_eq!(sup.preprocess.pre_quecc_points, 200);
        assert_eq!(sup.preprocess.scale_factor, 1.0);

        let unsup = &config.channels[1];
        assert_eq!(unsup.params, AcquisitionParams::default());
        assert!(unsup.preprocess.comp_filter_enabled());
        assert_eq!(unsup.preprocess.zero_fill, Some(8192));
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig::single(ChannelSetup::new(
            AcquisitionParams::new(512, 0.256, 100.0),
            PreprocessConfig::new().with_scaling(true).with_comp_filter(1.5),
        ));
        let json = config.to_json().unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(PipelineConfig::from_json("{ \"channels\": 3 }").is_err());
    }
}
