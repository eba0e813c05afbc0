use crate::error::ExecutionError;
use crate::tools::VideoCodec;
use std::path::PathBuf;

/// 以秒為單位的時間區間，保證 `0 <= start < end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInterval {
    start: f64,
    end: f64,
}

impl TimeInterval {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Option<Self> {
        let valid = start.is_finite() && end.is_finite() && start >= 0.0 && end > start;
        valid.then_some(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutMode {
    Manual { start: f64, end: f64 },
    SceneDetect,
}

/// 前端送進來的一次切割請求
#[derive(Debug, Clone)]
pub struct CutRequest {
    pub video_path: PathBuf,
    pub output_dir: PathBuf,
    pub mode: CutMode,
}

/// 單一輸出片段的轉檔工作
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentJob {
    pub source_path: PathBuf,
    pub interval: TimeInterval,
    pub output_path: PathBuf,
    pub codec: VideoCodec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Failed(ExecutionError),
}

#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job: SegmentJob,
    pub status: JobStatus,
    pub output_size_bytes: Option<u64>,
}

impl JobOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Success)
    }
}

/// 一次執行的統計結果
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub planned: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
    pub failures: Vec<(PathBuf, ExecutionError)>,
}

impl PipelineSummary {
    #[must_use]
    pub fn from_outcomes(output_dir: PathBuf, outcomes: Vec<JobOutcome>) -> Self {
        let planned = outcomes.len();
        let failures: Vec<_> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.status {
                JobStatus::Success => None,
                JobStatus::Failed(reason) => Some((outcome.job.output_path, reason)),
            })
            .collect();
        let failed = failures.len();

        Self {
            planned,
            succeeded: planned - failed,
            failed,
            output_dir,
            failures,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RunReport {
    Completed(PipelineSummary),
    NothingDetected,
}
