//! Per-run record of what the pipeline did

use fid_core::Channel;
use serde::{Deserialize, Serialize};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Scale,
    BaselineCorrect,
    Normalize,
    EccCorrection,
    Quality,
    Quecc,
    Tilt,
    Filter,
    ZeroFill,
}

/// What happened when a step was visited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    Applied,
    /// Not run, with the reason
    Skipped(String),
}

/// One visited step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    /// `None` for pair-wide corrections
    pub channel: Option<Channel>,
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// A skipped zero fill is the one skip the caller must be warned about
    pub fn is_warning(&self) -> bool {
        self.step == Step::ZeroFill && matches!(self.outcome, StepOutcome::Skipped(_))
    }
}

/// Derived per-channel state after a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: Channel,
    /// Peak of the first 25 samples, after decade search when scaling is on
    pub scaled_point: f64,
    pub scale_factor: f64,
    pub comp_filter: f64,
}

/// Overall status, mirroring the legacy 1 / 0 return code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    Success,
    Warning,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub steps: Vec<StepRecord>,
    pub channels: Vec<ChannelSummary>,
}

impl PipelineReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, step: Step, channel: Option<Channel>, outcome: StepOutcome) {
        self.steps.push(StepRecord {
            step,
            channel,
            outcome,
        });
    }

    pub fn status(&self) -> PipelineStatus {
        if self.warnings().next().is_some() {
            PipelineStatus::Warning
        } else {
            PipelineStatus::Success
        }
    }

    /// 1 on success, 0 when a warning was reported
    pub fn status_code(&self) -> i32 {
        match self.status() {
            PipelineStatus::Success => 1,
            PipelineStatus::Warning => 0,
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|record| record.is_warning())
    }

    /// Steps that actually ran, in order
    pub fn applied(&self) -> impl Iterator<Item = (Step, Option<Channel>)> + '_ {
        self.steps
            .iter()
            .filter(|record| record.outcome == StepOutcome::Applied)
            .map(|record| (record.step, record.channel))
    }

    pub fn was_applied(&self, step: Step, channel: Option<Channel>) -> bool {
        self.applied().any(|applied| applied == (step, channel))
    }

    pub fn summary(&self, channel: Channel) -> Option<&ChannelSummary> {
        self.channels.iter().find(|summary| summary.channel == channel)
    }
}
