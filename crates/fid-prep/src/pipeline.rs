//! Preprocessing pipeline
//!
//! Runs the corrections in a fixed order over caller-owned buffers:
//! 1. Per channel: decade search, scale, baseline correction, normalization
//! 2. ECC, QUALITY and QUECC across the pair (each flag checked on its own)
//! 3. Per channel: tilt (baseline correction again)
//! 4. Apodization filter
//! 5. Zero fill
//!
//! Later steps see the output of earlier ones. Pair-wide decisions and the
//! shared point count come from the suppressed channel.

use fid_core::{
    AcquisitionParams, Channel, ChannelCount, PipelineConfig, PrepError, PrepResult,
    PreprocessConfig,
};
use serde::{Deserialize, Serialize};

use crate::baseline::baseline_correct;
use crate::ecc::ecc_correction;
use crate::filter::filter;
use crate::normalize::normalize;
use crate::quality::{quality, quecc};
use crate::report::{ChannelSummary, PipelineReport, Step, StepOutcome};
use crate::scale::{decade_search, scale, scale_search_point};
use crate::zero_fill::{ZeroFillOutcome, zero_fill, zero_fill_len};

// ═══════════════════════════════════════════════════════════════════════════════
// PIPELINE STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Pipeline execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Scaling,
    Correcting,
    Filtering,
    ZeroFilling,
    Complete,
    Failed,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Idle
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHANNEL BUFFERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Caller-owned storage for one channel
///
/// `data` holds the interleaved acquisition and is corrected in place.
/// `scratch` receives the normalized copy; the unsuppressed channel's scratch
/// is the water reference for QUALITY and QUECC.
#[derive(Debug)]
pub struct ChannelBuffers<'a> {
    pub data: &'a mut [f32],
    pub scratch: &'a mut [f32],
}

impl<'a> ChannelBuffers<'a> {
    pub fn new(data: &'a mut [f32], scratch: &'a mut [f32]) -> Self {
        Self { data, scratch }
    }
}

/// Minimum buffer lengths (in floats) for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRequirement {
    pub data: usize,
    pub scratch: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREPROCESS PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered FID preprocessing over one or two channels
#[derive(Debug, Clone)]
pub struct PreprocessPipeline {
    channels: ChannelCount,
    configs: Vec<PreprocessConfig>,
    params: Vec<AcquisitionParams>,
    state: PipelineState,
}

impl PreprocessPipeline {
    /// Create a pipeline; `configs` and `params` are indexed by channel
    pub fn new(
        channels: ChannelCount,
        configs: Vec<PreprocessConfig>,
        params: Vec<AcquisitionParams>,
    ) -> PrepResult<Self> {
        for len in [configs.len(), params.len()] {
            if len != channels.count() {
                return Err(PrepError::ChannelMismatch {
                    expected: channels.count(),
                    actual: len,
                });
            }
        }
        for p in &params {
            p.validate()?;
        }

        Ok(Self {
            channels,
            configs,
            params,
            state: PipelineState::Idle,
        })
    }

    pub fn from_config(config: PipelineConfig) -> PrepResult<Self> {
        let channels = config.channel_count()?;
        let (params, configs) = config
            .channels
            .into_iter()
            .map(|setup| (setup.params, setup.preprocess))
            .unzip();
        Self::new(channels, configs, params)
    }

    pub fn channel_count(&self) -> ChannelCount {
        self.channels
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self, channel: Channel) -> Option<&PreprocessConfig> {
        self.configs.get(channel.index())
    }

    /// Configs including state derived by the last run
    pub fn configs(&self) -> &[PreprocessConfig] {
        &self.configs
    }

    pub fn into_configs(self) -> Vec<PreprocessConfig> {
        self.configs
    }

    pub fn params(&self) -> &[AcquisitionParams] {
        &self.params
    }

    fn set_state(&mut self, state: PipelineState) {
        self.state = state;
    }

    fn zero_fill_requested(&self) -> bool {
        self.configs.iter().any(PreprocessConfig::zero_fill_enabled)
    }

    /// Zero-fill always pads to the suppressed channel's target
    fn zero_fill_target(&self) -> usize {
        self.configs[0].zero_fill.unwrap_or(0)
    }

    /// Buffer lengths every channel needs for the configured steps
    pub fn required_lengths(&self) -> Vec<BufferRequirement> {
        let shared = self.params[0].num_points;
        let target = self.zero_fill_target();
        let zero_fill_end = if self.zero_fill_requested() && target >= shared {
            zero_fill_len(target)
        } else {
            0
        };
        let primary = &self.configs[0];
        let deconvolving = self.channels.is_pair() && (primary.pre_quality || primary.pre_quecc);

        self.configs
            .iter()
            .zip(&self.params)
            .enumerate()
            .map(|(index, (config, params))| {
                let points = shared.max(params.num_points);
                let needs_scratch = config.max_normalize || (index == 1 && deconvolving);
                BufferRequirement {
                    data: points.max(zero_fill_end),
                    scratch: if needs_scratch { points } else { 0 },
                }
            })
            .collect()
    }

    fn check_buffers(&self, buffers: &[ChannelBuffers<'_>]) -> PrepResult<()> {
        if buffers.len() != self.channels.count() {
            return Err(PrepError::ChannelMismatch {
                expected: self.channels.count(),
                actual: buffers.len(),
            });
        }

        for ((&channel, buffer), required) in self
            .channels
            .channels()
            .iter()
            .zip(buffers)
            .zip(self.required_lengths())
        {
            if buffer.data.len() < required.data {
                return Err(PrepError::BufferTooShort {
                    channel,
                    buffer: "data",
                    required: required.data,
                    actual: buffer.data.len(),
                });
            }
            if buffer.scratch.len() < required.scratch {
                return Err(PrepError::BufferTooShort {
                    channel,
                    buffer: "scratch",
                    required: required.scratch,
                    actual: buffer.scratch.len(),
                });
            }
        }
        Ok(())
    }

    /// Run every configured correction over `buffers` (suppressed first), in place
    ///
    /// Buffers are checked against [`Self::required_lengths`] before anything
    /// is written. Numeric degeneracy never fails the run.
    pub fn run(&mut self, buffers: &mut [ChannelBuffers<'_>]) -> PrepResult<PipelineReport> {
        if let Err(e) = self.check_buffers(buffers) {
            self.set_state(PipelineState::Failed);
            return Err(e);
        }

        let mut report = PipelineReport::new();
        let shared = self.params[0];

        // Step 1: scale, baseline, normalize
        self.set_state(PipelineState::Scaling);
        let mut scaled_points = Vec::with_capacity(buffers.len());
        for (&channel, buffer) in self.channels.channels().iter().zip(buffers.iter_mut()) {
            let point = self.prepare_channel(channel, buffer, &mut report);
            scaled_points.push(point);
        }

        // Step 2: pair-wide corrections
        self.set_state(PipelineState::Correcting);
        self.correct_pair(buffers, &shared, &mut report);

        // Step 3: tilt
        for (&channel, buffer) in self.channels.channels().iter().zip(buffers.iter_mut()) {
            if self.configs[channel.index()].tilt {
                baseline_correct(buffer.data, &self.params[channel.index()]);
                report.record(Step::Tilt, Some(channel), StepOutcome::Applied);
            }
        }

        // Step 4: filter
        let wants_filter = self
            .configs
            .iter()
            .any(|config| config.comp_filter_enabled() || config.pre_quecc_if);
        if wants_filter {
            self.set_state(PipelineState::Filtering);
            if let Some((first, rest)) = buffers.split_first_mut() {
                let reference = rest.first_mut().map(|buffer| &mut *buffer.data);
                let filtered = filter(first.data, reference, &shared, &mut self.configs);
                for &channel in self.channels.channels() {
                    let outcome = if filtered.contains(&channel) {
                        StepOutcome::Applied
                    } else {
                        StepOutcome::Skipped("comp_filter is zero".to_string())
                    };
                    report.record(Step::Filter, Some(channel), outcome);
                }
            }
        }

        // Step 5: zero fill, triggered per channel but always padding the pair
        for &channel in self.channels.channels() {
            if !self.configs[channel.index()].zero_fill_enabled() {
                continue;
            }
            self.set_state(PipelineState::ZeroFilling);
            let target = self.zero_fill_target();
            let Some((first, rest)) = buffers.split_first_mut() else {
                continue;
            };
            let reference = rest.first_mut().map(|buffer| &mut *buffer.data);

            match zero_fill(first.data, reference, &shared, target)? {
                ZeroFillOutcome::Filled { from, to } => {
                    log::debug!("ZeroFill: padded floats {}..{} (triggered by {:?})", from, to, channel);
                    report.record(Step::ZeroFill, Some(channel), StepOutcome::Applied);
                }
                ZeroFillOutcome::Skipped { target, num_points } => {
                    let message = format!(
                        "zero fill target {} is less than {} points, zero fill ignored",
                        target, num_points
                    );
                    log::warn!("ZeroFill: {}", message);
                    report.record(Step::ZeroFill, Some(channel), StepOutcome::Skipped(message));
                }
            }
        }

        report.channels = self
            .channels
            .channels()
            .iter()
            .zip(scaled_points)
            .map(|(&channel, scaled_point)| {
                let config = &self.configs[channel.index()];
                ChannelSummary {
                    channel,
                    scaled_point,
                    scale_factor: config.scale_factor,
                    comp_filter: config.comp_filter,
                }
            })
            .collect();

        self.set_state(PipelineState::Complete);
        log::debug!(
            "Pipeline: complete, {} steps applied, status {:?}",
            report.applied().count(),
            report.status()
        );

        Ok(report)
    }

    /// Decade search, scale, then optional baseline correction and normalization
    fn prepare_channel(
        &mut self,
        channel: Channel,
        buffer: &mut ChannelBuffers<'_>,
        report: &mut PipelineReport,
    ) -> f64 {
        let index = channel.index();
        let shared = self.params[0];
        let params = self.params[index];
        let config = &mut self.configs[index];

        let mut point = scale_search_point(buffer.data);
        if config.scale {
            match decade_search(point, &mut config.scale_factor) {
                Some(normalized) => {
                    log::debug!(
                        "Scale: {:?} peak {:.6e} -> {:.6}, scale factor {:.6e}",
                        channel,
                        point,
                        normalized,
                        config.scale_factor
                    );
                    point = normalized;
                }
                None => log::warn!(
                    "Scale: {:?} peak {} cannot be brought into [1, 10); scale factor left at {}",
                    channel,
                    point,
                    config.scale_factor
                ),
            }
        }

        // Always runs; an unscaled channel keeps its initial factor
        scale(buffer.data, &shared, config.scale_factor);
        report.record(Step::Scale, Some(channel), StepOutcome::Applied);

        if config.baseline_correct {
            baseline_correct(buffer.data, &params);
            report.record(Step::BaselineCorrect, Some(channel), StepOutcome::Applied);
        }

        if config.max_normalize {
            let peak = normalize(buffer.data, buffer.scratch, &params);
            log::debug!("Normalize: {:?} peak magnitude {:.6e}", channel, peak);
            report.record(Step::Normalize, Some(channel), StepOutcome::Applied);
        }

        point
    }

    /// ECC, QUALITY and QUECC; each flag is honoured independently
    fn correct_pair(
        &self,
        buffers: &mut [ChannelBuffers<'_>],
        shared: &AcquisitionParams,
        report: &mut PipelineReport,
    ) {
        let primary = &self.configs[0];
        let requested = [
            (Step::EccCorrection, primary.pre_ecc),
            (Step::Quality, primary.pre_quality),
            (Step::Quecc, primary.pre_quecc),
        ];

        for (step, enabled) in requested {
            if !enabled {
                continue;
            }

            let [sup, unsup] = buffers else {
                log::warn!("{:?}: requires the unsuppressed reference channel, skipped", step);
                report.record(
                    step,
                    None,
                    StepOutcome::Skipped("single-channel run".to_string()),
                );
                continue;
            };

            match step {
                Step::EccCorrection => ecc_correction(sup.data, unsup.data, shared),
                Step::Quality => quality(sup.data, unsup.data, unsup.scratch, shared),
                _ => quecc(
                    sup.data,
                    unsup.data,
                    unsup.scratch,
                    shared,
                    primary.pre_quecc_points,
                ),
            }
            report.record(step, None, StepOutcome::Applied);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decaying_fid(num_points: usize, amplitude: f32) -> Vec<f32> {
        (0..num_points / 2)
            .flat_map(|k| {
                let t = k as f32;
                let envelope = amplitude * (-t * 0.02).exp();
                [envelope * (t * 0.3).cos(), envelope * (t * 0.3).sin()]
            })
            .collect()
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let err = PreprocessPipeline::new(
            ChannelCount::Pair,
            vec![PreprocessConfig::default()],
            vec![AcquisitionParams::default(), AcquisitionParams::default()],
        )
        .unwrap_err();
        assert!(matches!(err, PrepError::ChannelMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_new_rejects_odd_points() {
        let result = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::default()],
            vec![AcquisitionParams::new(9, 0.1, 0.0)],
        );
        assert!(matches!(result, Err(PrepError::InvalidParams(_))));
    }

    #[test]
    fn test_required_lengths() {
        let pipeline = PreprocessPipeline::new(
            ChannelCount::Pair,
            vec![
                PreprocessConfig::new().with_quality(true).with_zero_fill(101),
                PreprocessConfig::new(),
            ],
            vec![AcquisitionParams::new(64, 0.1, 0.0), AcquisitionParams::new(64, 0.1, 0.0)],
        )
        .unwrap();

        let required = pipeline.required_lengths();
        assert_eq!(required[0], BufferRequirement { data: 102, scratch: 0 });
        assert_eq!(required[1], BufferRequirement { data: 102, scratch: 64 });
    }

    #[test]
    fn test_short_buffer_fails_before_mutation() {
        let mut pipeline = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::new().with_scaling(true).with_zero_fill(128)],
            vec![AcquisitionParams::new(64, 0.1, 0.0)],
        )
        .unwrap();
        let mut data = decaying_fid(64, 500.0);
        let original = data.clone();
        let mut scratch = vec![0.0_f32; 64];

        let err = pipeline
            .run(&mut [ChannelBuffers::new(&mut data, &mut scratch)])
            .unwrap_err();

        assert!(matches!(err, PrepError::BufferTooShort { required: 128, actual: 64, .. }));
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert_eq!(data, original);
    }

    #[test]
    fn test_single_channel_skips_pair_corrections() {
        let mut pipeline = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::new().with_ecc(true).with_quality(true)],
            vec![AcquisitionParams::new(64, 0.1, 0.0)],
        )
        .unwrap();
        let mut data = decaying_fid(64, 1.0);
        let original = data.clone();
        let mut scratch = vec![0.0_f32; 64];

        let report = pipeline
            .run(&mut [ChannelBuffers::new(&mut data, &mut scratch)])
            .unwrap();

        assert!(!report.was_applied(Step::EccCorrection, None));
        assert!(!report.was_applied(Step::Quality, None));
        assert_eq!(report.status_code(), 1);
        assert_eq!(pipeline.state(), PipelineState::Complete);
        // Unit scale factor leaves the data as it was
        assert_eq!(data, original);
    }

    #[test]
    fn test_scale_factor_is_tracked() {
        let mut pipeline = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::new().with_scaling(true)],
            vec![AcquisitionParams::new(128, 0.1, 0.0)],
        )
        .unwrap();
        let mut data = decaying_fid(128, 4_200.0);
        let mut scratch = vec![0.0_f32; 128];

        let report = pipeline
            .run(&mut [ChannelBuffers::new(&mut data, &mut scratch)])
            .unwrap();

        let summary = report.summary(Channel::Suppressed).unwrap();
        assert!((summary.scale_factor - 1e-3).abs() < 1e-12);
        assert!((1.0..10.0).contains(&summary.scaled_point));
        assert!((data[0] - 4.2).abs() < 1e-5);
        assert_eq!(pipeline.configs()[0].scale_factor, summary.scale_factor);
    }

    #[test]
    fn test_unscaled_channel_keeps_initial_factor() {
        let mut pipeline = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::new().with_scale_factor(2.0)],
            vec![AcquisitionParams::new(64, 0.1, 0.0)],
        )
        .unwrap();
        let mut data = decaying_fid(64, 1.0);
        let mut scratch: Vec<f32> = Vec::new();

        let report = pipeline
            .run(&mut [ChannelBuffers::new(&mut data, &mut scratch)])
            .unwrap();

        assert_eq!(report.summary(Channel::Suppressed).unwrap().scale_factor, 2.0);
        assert_eq!(data[0], 2.0);
    }

    #[test]
    fn test_zero_fill_warning_sets_status() {
        let mut pipeline = PreprocessPipeline::new(
            ChannelCount::Single,
            vec![PreprocessConfig::new().with_zero_fill(32)],
            vec![AcquisitionParams::new(64, 0.1, 0.0)],
        )
        .unwrap();
        let mut data = decaying_fid(64, 1.0);
        let mut scratch: Vec<f32> = Vec::new();

        let report = pipeline
            .run(&mut [ChannelBuffers::new(&mut data, &mut scratch)])
            .unwrap();

        assert_eq!(report.status_code(), 0);
        assert_eq!(report.warnings().count(), 1);
    }
}
