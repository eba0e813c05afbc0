//! 影片切割元件
//!
//! 依手動時間範圍或自動場景偵測切出片段，再交由 ffmpeg 逐一轉檔

mod ffmpeg_command;
mod main;
mod models;
mod pipeline;
mod progress;
mod scene_detector;
mod segment_planner;
mod transcode_executor;
mod verifier;

pub use ffmpeg_command::{AUDIO_BITRATE, AUDIO_CODEC, CONSTANT_QUALITY, FfmpegCommand, PRESET};
pub use main::SceneCutter;
pub use models::{
    CutMode, CutRequest, JobOutcome, JobStatus, PipelineSummary, RunReport, SegmentJob,
    TimeInterval,
};
pub use pipeline::{
    NoopObserver, Notification, Pipeline, PipelineStage, ProgressObserver, validate_request,
};
pub use progress::ConsoleProgress;
pub use scene_detector::{
    DEFAULT_SCENE_THRESHOLD, FfmpegSceneDetector, SceneDetector, SceneDetectorConfig,
    scenes_from_boundaries,
};
pub use segment_planner::{MANUAL_OUTPUT_STEM, SCENE_OUTPUT_PREFIX, SegmentPlanner};
pub use transcode_executor::{FfmpegTranscoder, ProcessReport, TranscodeExecutor, Transcoder};
pub use verifier::{
    MIN_OUTPUT_BYTES, OutputSnapshot, discard_output, output_exists, output_size_acceptable,
    process_succeeded, verify_output,
};
