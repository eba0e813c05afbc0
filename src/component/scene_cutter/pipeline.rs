//! 切割流程的協調者
//!
//! 狀態依序為 `Idle -> Probing -> (Detecting) -> Planning -> Executing -> Summarizing -> Idle`，
//! 所有外部呼叫都在呼叫端執行緒上同步進行，開始後無法取消。

use super::models::{CutMode, CutRequest, JobOutcome, PipelineSummary, RunReport, SegmentJob};
use super::scene_detector::{FfmpegSceneDetector, SceneDetector};
use super::segment_planner::SegmentPlanner;
use super::transcode_executor::{FfmpegTranscoder, TranscodeExecutor, Transcoder};
use crate::error::CutError;
use crate::tools::{VideoCodec, validate_file_exists};
use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Probing,
    Detecting,
    Planning,
    Executing,
    Summarizing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Detecting => "detecting",
            Self::Planning => "planning",
            Self::Executing => "executing",
            Self::Summarizing => "summarizing",
        };
        f.write_str(name)
    }
}

/// 執行進度的觀察者，預設全部不做事
pub trait ProgressObserver {
    fn stage_changed(&self, _stage: PipelineStage) {}
    fn job_started(&self, _index: usize, _total: usize, _job: &SegmentJob) {}
    fn job_finished(&self, _outcome: &JobOutcome) {}
}

pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// 給前端顯示的單一結果通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub ok: bool,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn from_result(result: &Result<RunReport, CutError>) -> Self {
        match result {
            Ok(RunReport::Completed(summary)) => Self {
                ok: summary.failed == 0,
                message: format!(
                    "切割完成！{} 個片段中成功 {} 個、失敗 {} 個，儲存於 {}",
                    summary.planned,
                    summary.succeeded,
                    summary.failed,
                    summary.output_dir.display()
                ),
            },
            Ok(RunReport::NothingDetected) => Self {
                ok: true,
                message: CutError::NoScenes.to_string(),
            },
            Err(e) => Self {
                ok: e.is_informational(),
                message: e.to_string(),
            },
        }
    }
}

pub struct Pipeline<D, T> {
    codec: VideoCodec,
    extension: String,
    detector: D,
    executor: TranscodeExecutor<T>,
    stage: PipelineStage,
}

impl Pipeline<FfmpegSceneDetector, FfmpegTranscoder> {
    /// 使用 ffmpeg 進行場景偵測與轉檔
    #[must_use]
    pub fn with_ffmpeg(codec: VideoCodec, extension: &str) -> Self {
        Self::new(
            codec,
            extension,
            FfmpegSceneDetector::default(),
            FfmpegTranscoder,
        )
    }
}

impl<D: SceneDetector, T: Transcoder> Pipeline<D, T> {
    /// `codec` 由呼叫端在程式啟動時偵測一次後傳入
    pub fn new(codec: VideoCodec, extension: &str, detector: D, transcoder: T) -> Self {
        Self {
            codec,
            extension: extension.to_string(),
            detector,
            executor: TranscodeExecutor::new(transcoder),
            stage: PipelineStage::Idle,
        }
    }

    pub const fn codec(&self) -> VideoCodec {
        self.codec
    }

    pub const fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub const fn detector(&self) -> &D {
        &self.detector
    }

    pub const fn transcoder(&self) -> &T {
        self.executor.transcoder()
    }

    pub fn run(&mut self, request: &CutRequest) -> Result<RunReport, CutError> {
        self.run_with(request, &NoopObserver)
    }

    /// 執行一次完整流程；不論結果為何，結束時都回到 `Idle`
    pub fn run_with(
        &mut self,
        request: &CutRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<RunReport, CutError> {
        let result = self.run_stages(request, observer);
        self.enter(PipelineStage::Idle, observer);
        result
    }

    fn run_stages(
        &mut self,
        request: &CutRequest,
        observer: &dyn ProgressObserver,
    ) -> Result<RunReport, CutError> {
        validate_request(request)?;

        self.enter(PipelineStage::Probing, observer);
        let codec = self.codec;
        debug!("編碼器: {codec}");

        let scenes = match request.mode {
            CutMode::SceneDetect => {
                self.enter(PipelineStage::Detecting, observer);
                let scenes = self.detector.detect(&request.video_path)?;
                if scenes.is_empty() {
                    info!("沒有偵測到任何場景: {}", request.video_path.display());
                    return Ok(RunReport::NothingDetected);
                }
                scenes
            }
            CutMode::Manual { .. } => Vec::new(),
        };

        self.enter(PipelineStage::Planning, observer);
        let planner = SegmentPlanner::new(&request.output_dir, &self.extension, codec);
        let jobs = match planner.plan(&request.mode, &request.video_path, &scenes) {
            Ok(jobs) => jobs,
            Err(CutError::NoScenes) => return Ok(RunReport::NothingDetected),
            Err(e) => return Err(e),
        };

        self.enter(PipelineStage::Executing, observer);
        let total = jobs.len();
        let outcomes: Vec<JobOutcome> = jobs
            .into_iter()
            .enumerate()
            .map(|(index, job)| {
                observer.job_started(index, total, &job);
                let outcome = self.executor.execute(job);
                observer.job_finished(&outcome);
                outcome
            })
            .collect();

        self.enter(PipelineStage::Summarizing, observer);
        let summary = PipelineSummary::from_outcomes(request.output_dir.clone(), outcomes);
        info!(
            "切割完成! {} 個片段儲存於 {} (成功: {}, 失敗: {})",
            summary.planned,
            summary.output_dir.display(),
            summary.succeeded,
            summary.failed
        );

        Ok(RunReport::Completed(summary))
    }

    fn enter(&mut self, stage: PipelineStage, observer: &dyn ProgressObserver) {
        if self.stage != stage {
            debug!("流程狀態: {} -> {}", self.stage, stage);
            self.stage = stage;
            observer.stage_changed(stage);
        }
    }
}

/// 檢查來源影片存在且有指定輸出資料夾
pub fn validate_request(request: &CutRequest) -> Result<(), CutError> {
    if request.video_path.as_os_str().is_empty() {
        return Err(CutError::MissingInput("請先選擇影片檔案".to_string()));
    }
    validate_file_exists(&request.video_path)
        .map_err(|e| CutError::MissingInput(e.to_string()))?;

    if request.output_dir.as_os_str().is_empty() {
        return Err(CutError::MissingInput("請選擇儲存結果的資料夾".to_string()));
    }

    Ok(())
}
