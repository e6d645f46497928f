//! Parallel preprocessing of independent acquisition sets
//!
//! Each job is a complete run with its own buffers; jobs never share data,
//! so they are spread over a rayon pool while every run stays sequential.

use fid_core::{PipelineConfig, PrepError, PrepResult};
use rayon::prelude::*;

use crate::pipeline::{ChannelBuffers, PreprocessPipeline};
use crate::report::PipelineReport;

/// One acquisition set with owned buffers
#[derive(Debug, Clone)]
pub struct PreprocessJob {
    /// Updated with derived scale factors and filter constants after a run
    pub config: PipelineConfig,
    /// Data buffers, suppressed first
    pub data: Vec<Vec<f32>>,
    /// Scratch buffers, parallel to `data`
    pub scratch: Vec<Vec<f32>>,
}

impl PreprocessJob {
    pub fn new(config: PipelineConfig, data: Vec<Vec<f32>>, scratch: Vec<Vec<f32>>) -> Self {
        Self {
            config,
            data,
            scratch,
        }
    }

    /// Allocate zeroed scratch buffers matching each data buffer
    pub fn with_scratch(config: PipelineConfig, data: Vec<Vec<f32>>) -> Self {
        let scratch = data.iter().map(|buffer| vec![0.0; buffer.len()]).collect();
        Self::new(config, data, scratch)
    }

    /// Run the pipeline over this job's buffers
    pub fn run(&mut self) -> PrepResult<PipelineReport> {
        if self.scratch.len() != self.data.len() {
            return Err(PrepError::ChannelMismatch {
                expected: self.data.len(),
                actual: self.scratch.len(),
            });
        }

        let mut pipeline = PreprocessPipeline::from_config(self.config.clone())?;
        let mut buffers: Vec<ChannelBuffers<'_>> = self
            .data
            .iter_mut()
            .zip(self.scratch.iter_mut())
            .map(|(data, scratch)| ChannelBuffers::new(data, scratch))
            .collect();

        let report = pipeline.run(&mut buffers)?;

        for (setup, config) in self.config.channels.iter_mut().zip(pipeline.into_configs()) {
            setup.preprocess = config;
        }
        Ok(report)
    }
}

/// Runs many preprocessing jobs in parallel
#[derive(Debug, Clone)]
pub struct BatchPreprocessor {
    max_parallel: usize,
}

impl Default for BatchPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchPreprocessor {
    pub fn new() -> Self {
        Self {
            max_parallel: rayon::current_num_threads(),
        }
    }

    /// Set max parallel jobs
    pub fn with_max_parallel(mut self, max: usize) -> Self {
        self.max_parallel = max.max(1);
        self
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Process all jobs, returning one result per job in input order
    pub fn process_all(&self, jobs: &mut [PreprocessJob]) -> Vec<PrepResult<PipelineReport>> {
        let run_all = |jobs: &mut [PreprocessJob]| -> Vec<PrepResult<PipelineReport>> {
            jobs.par_iter_mut().map(PreprocessJob::run).collect()
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_parallel)
            .build()
        {
            Ok(pool) => pool.install(|| run_all(jobs)),
            Err(e) => {
                log::warn!("BatchPreprocessor: dedicated pool unavailable ({}), using global pool", e);
                run_all(jobs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fid_core::{AcquisitionParams, ChannelSetup, PreprocessConfig};

    fn job(amplitude: f32) -> PreprocessJob {
        let config = PipelineConfig::single(ChannelSetup::new(
            AcquisitionParams::new(64, 0.1, 0.0),
            PreprocessConfig::new().with_scaling(true),
        ));
        let data = (0..64)
            .map(|i| if i % 2 == 0 { amplitude } else { 0.5 * amplitude })
            .collect();
        PreprocessJob::with_scratch(config, vec![data])
    }

    #[test]
    fn test_results_keep_input_order() {
        let mut jobs = vec![job(0.02), job(300.0), job(7.0)];

        let results = BatchPreprocessor::new().with_max_parallel(2).process_all(&mut jobs);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
        let factors: Vec<f64> = jobs
            .iter()
            .map(|job| job.config.channels[0].preprocess.scale_factor)
            .collect();
        assert!((factors[0] - 100.0).abs() < 1e-9);
        assert!((factors[1] - 0.01).abs() < 1e-12);
        assert_eq!(factors[2], 1.0);
    }

    #[test]
    fn test_failing_job_does_not_stop_others() {
        let mut broken = job(1.0);
        broken.scratch.clear();
        let mut jobs = vec![broken, job(1.0)];

        let results = BatchPreprocessor::new().process_all(&mut jobs);

        assert!(matches!(results[0], Err(PrepError::ChannelMismatch { .. })));
        assert!(results[1].is_ok());
    }
}
