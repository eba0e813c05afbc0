//! 流程整合測試 - 以假的場景偵測器與轉檔器驅動完整流程

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use scene_cutter::component::scene_cutter::{
    CutMode, CutRequest, JobOutcome, Pipeline, PipelineStage, PipelineSummary, ProcessReport,
    ProgressObserver, RunReport, SceneDetector, SegmentJob, TimeInterval, Transcoder,
};
use scene_cutter::error::{CutError, ExecutionError};
use scene_cutter::tools::VideoCodec;
use tempfile::TempDir;

/// 回傳固定場景列表的偵測器
struct FakeDetector {
    scenes: Result<Vec<(f64, f64)>, String>,
    calls: Cell<usize>,
}

impl FakeDetector {
    fn returning(scenes: &[(f64, f64)]) -> Self {
        Self {
            scenes: Ok(scenes.to_vec()),
            calls: Cell::new(0),
        }
    }

    fn failing(detail: &str) -> Self {
        Self {
            scenes: Err(detail.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl SceneDetector for FakeDetector {
    fn detect(&self, video_path: &Path) -> Result<Vec<TimeInterval>, CutError> {
        self.calls.set(self.calls.get() + 1);
        match &self.scenes {
            Ok(scenes) => Ok(scenes
                .iter()
                .map(|&(s, e)| TimeInterval::new(s, e).unwrap())
                .collect()),
            Err(detail) => Err(CutError::Open {
                path: video_path.to_path_buf(),
                detail: detail.clone(),
            }),
        }
    }
}

#[derive(Clone, Copy)]
enum Behavior {
    Write(usize),
    ExitFailure,
}

/// 依呼叫順序套用行為的轉檔器，預設寫入 4 KiB
struct FakeTranscoder {
    behaviors: Vec<Behavior>,
    jobs: RefCell<Vec<SegmentJob>>,
}

impl FakeTranscoder {
    fn healthy() -> Self {
        Self::with(Vec::new())
    }

    fn with(behaviors: Vec<Behavior>) -> Self {
        Self {
            behaviors,
            jobs: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.jobs.borrow().len()
    }
}

impl Transcoder for FakeTranscoder {
    fn transcode(&self, job: &SegmentJob) -> Result<ProcessReport, ExecutionError> {
        let index = self.jobs.borrow().len();
        self.jobs.borrow_mut().push(job.clone());

        match self.behaviors.get(index).copied().unwrap_or(Behavior::Write(4096)) {
            Behavior::Write(size) => {
                fs::write(&job.output_path, vec![0u8; size]).unwrap();
                Ok(ProcessReport {
                    exit_code: Some(0),
                    stderr: String::new(),
                })
            }
            Behavior::ExitFailure => Ok(ProcessReport {
                exit_code: Some(1),
                stderr: "Conversion failed!".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    stages: RefCell<Vec<PipelineStage>>,
    finished: RefCell<Vec<bool>>,
}

impl ProgressObserver for RecordingObserver {
    fn stage_changed(&self, stage: PipelineStage) {
        self.stages.borrow_mut().push(stage);
    }

    fn job_finished(&self, outcome: &JobOutcome) {
        self.finished.borrow_mut().push(outcome.is_success());
    }
}

struct Fixture {
    _temp_dir: TempDir,
    video_path: PathBuf,
    output_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let video_path = temp_dir.path().join("input.mp4");
        fs::write(&video_path, b"not really a video").unwrap();
        let output_dir = temp_dir.path().join("output");
        Self {
            _temp_dir: temp_dir,
            video_path,
            output_dir,
        }
    }

    fn request(&self, mode: CutMode) -> CutRequest {
        CutRequest {
            video_path: self.video_path.clone(),
            output_dir: self.output_dir.clone(),
            mode,
        }
    }

    fn output_files(&self) -> Vec<String> {
        if !self.output_dir.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn pipeline(
    detector: FakeDetector,
    transcoder: FakeTranscoder,
) -> Pipeline<FakeDetector, FakeTranscoder> {
    Pipeline::new(VideoCodec::Libx264, "mp4", detector, transcoder)
}

fn completed(report: RunReport) -> PipelineSummary {
    match report {
        RunReport::Completed(summary) => summary,
        RunReport::NothingDetected => panic!("預期完成，實際沒有偵測到場景"),
    }
}

/// 情境 A: 手動模式 5.0 - 10.0 產生單一 cropped_video
#[test]
fn test_manual_mode_produces_single_clip() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());

    let report = pipeline
        .run(&fixture.request(CutMode::Manual {
            start: 5.0,
            end: 10.0,
        }))
        .unwrap();
    let summary = completed(report);

    assert_eq!(summary.planned, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(fixture.output_files(), vec!["cropped_video.mp4".to_string()]);

    assert_eq!(pipeline.detector().calls.get(), 0, "手動模式不應執行場景偵測");
    let jobs = pipeline.transcoder().jobs.borrow();
    assert_eq!(jobs.len(), 1);
    assert!((jobs[0].interval.start() - 5.0).abs() < f64::EPSILON);
    assert!((jobs[0].interval.end() - 10.0).abs() < f64::EPSILON);
    assert_eq!(jobs[0].source_path, fixture.video_path);
}

/// 情境 B: 三個場景依序產生 scene_1..scene_3
#[test]
fn test_scene_mode_produces_one_clip_per_scene() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(
        FakeDetector::returning(&[(0.0, 4.0), (4.0, 9.0), (9.0, 12.0)]),
        FakeTranscoder::healthy(),
    );

    let summary = completed(pipeline.run(&fixture.request(CutMode::SceneDetect)).unwrap());

    assert_eq!(summary.planned, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.output_dir, fixture.output_dir);
    assert_eq!(
        fixture.output_files(),
        vec!["scene_1.mp4", "scene_2.mp4", "scene_3.mp4"]
    );

    let jobs = pipeline.transcoder().jobs.borrow();
    let bounds: Vec<(f64, f64)> = jobs
        .iter()
        .map(|j| (j.interval.start(), j.interval.end()))
        .collect();
    assert_eq!(bounds, vec![(0.0, 4.0), (4.0, 9.0), (9.0, 12.0)]);
    assert_eq!(jobs[1].output_path, fixture.output_dir.join("scene_2.mp4"));
    assert!(jobs.iter().all(|j| j.codec == VideoCodec::Libx264));
}

/// 情境 C: 沒有場景時不建立任何工作
#[test]
fn test_scene_mode_without_scenes_reports_nothing_detected() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());

    let report = pipeline.run(&fixture.request(CutMode::SceneDetect)).unwrap();

    assert!(matches!(report, RunReport::NothingDetected));
    assert_eq!(pipeline.detector().calls.get(), 1);
    assert_eq!(pipeline.transcoder().calls(), 0);
    assert!(fixture.output_files().is_empty());
}

/// 情境 D: 開始時間大於結束時間，不呼叫任何外部程序
#[test]
fn test_invalid_manual_range_aborts_before_external_calls() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());

    let result = pipeline.run(&fixture.request(CutMode::Manual {
        start: 10.0,
        end: 5.0,
    }));

    assert!(matches!(result, Err(CutError::InvalidRange { .. })));
    assert_eq!(pipeline.detector().calls.get(), 0);
    assert_eq!(pipeline.transcoder().calls(), 0);
    assert!(!fixture.output_dir.exists());
    assert_eq!(pipeline.stage(), PipelineStage::Idle);
}

#[test]
fn test_job_failures_are_isolated() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::with(vec![
        Behavior::Write(4096),
        Behavior::ExitFailure,
        Behavior::Write(100),
        Behavior::Write(2048),
    ]);
    let mut pipeline = pipeline(
        FakeDetector::returning(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0)]),
        transcoder,
    );
    let observer = RecordingObserver::default();

    let summary = completed(
        pipeline
            .run_with(&fixture.request(CutMode::SceneDetect), &observer)
            .unwrap(),
    );

    assert_eq!(pipeline.transcoder().calls(), 4, "每個片段都應該嘗試執行");
    assert_eq!(summary.planned, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(*observer.finished.borrow(), vec![true, false, false, true]);

    // 過小的輸出會被刪除
    assert_eq!(fixture.output_files(), vec!["scene_1.mp4", "scene_4.mp4"]);

    assert_eq!(summary.failures.len(), 2);
    assert_eq!(summary.failures[0].0, fixture.output_dir.join("scene_2.mp4"));
    assert!(matches!(summary.failures[0].1, ExecutionError::Transcode(_)));
    assert_eq!(summary.failures[1].0, fixture.output_dir.join("scene_3.mp4"));
    assert_eq!(summary.failures[1].1, ExecutionError::CorruptOutput);
}

#[test]
fn test_missing_video_fails_fast() {
    let fixture = Fixture::new();
    let detector = FakeDetector::returning(&[(0.0, 1.0)]);
    let mut pipeline = pipeline(detector, FakeTranscoder::healthy());

    let mut request = fixture.request(CutMode::SceneDetect);
    request.video_path = fixture.video_path.with_file_name("missing.mp4");

    let result = pipeline.run(&request);
    assert!(matches!(result, Err(CutError::MissingInput(_))));
    assert_eq!(pipeline.detector().calls.get(), 0);
    assert_eq!(pipeline.transcoder().calls(), 0);
}

#[test]
fn test_missing_output_dir_fails_fast() {
    let fixture = Fixture::new();
    let detector = FakeDetector::returning(&[(0.0, 1.0)]);
    let mut pipeline = pipeline(detector, FakeTranscoder::healthy());

    let mut request = fixture.request(CutMode::SceneDetect);
    request.output_dir = PathBuf::new();

    assert!(matches!(pipeline.run(&request), Err(CutError::MissingInput(_))));
    assert_eq!(pipeline.detector().calls.get(), 0);
}

#[test]
fn test_open_error_is_surfaced() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(
        FakeDetector::failing("unsupported container"),
        FakeTranscoder::healthy(),
    );

    let result = pipeline.run(&fixture.request(CutMode::SceneDetect));
    assert!(matches!(result, Err(CutError::Open { .. })));
    assert_eq!(pipeline.transcoder().calls(), 0);
    assert_eq!(pipeline.stage(), PipelineStage::Idle);
}

#[test]
fn test_directory_error_is_surfaced() {
    let fixture = Fixture::new();
    fs::write(&fixture.output_dir, b"a file, not a directory").unwrap();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());

    let result = pipeline.run(&fixture.request(CutMode::Manual {
        start: 0.0,
        end: 1.0,
    }));
    assert!(matches!(result, Err(CutError::Directory { .. })));
    assert_eq!(pipeline.transcoder().calls(), 0);
}

#[test]
fn test_stage_sequence() {
    let fixture = Fixture::new();
    let detector = FakeDetector::returning(&[(0.0, 2.0)]);
    let mut pipeline = pipeline(detector, FakeTranscoder::healthy());
    let observer = RecordingObserver::default();

    pipeline
        .run_with(&fixture.request(CutMode::SceneDetect), &observer)
        .unwrap();

    assert_eq!(
        *observer.stages.borrow(),
        vec![
            PipelineStage::Probing,
            PipelineStage::Detecting,
            PipelineStage::Planning,
            PipelineStage::Executing,
            PipelineStage::Summarizing,
            PipelineStage::Idle,
        ]
    );
}

#[test]
fn test_manual_mode_skips_detecting_stage() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());
    let observer = RecordingObserver::default();

    pipeline
        .run_with(
            &fixture.request(CutMode::Manual {
                start: 0.0,
                end: 3.0,
            }),
            &observer,
        )
        .unwrap();

    assert!(!observer.stages.borrow().contains(&PipelineStage::Detecting));
}

#[test]
fn test_codec_is_reused_across_runs() {
    let fixture = Fixture::new();
    let mut pipeline = Pipeline::new(
        VideoCodec::H264Nvenc,
        "mkv",
        FakeDetector::returning(&[(0.0, 1.0), (1.0, 2.0)]),
        FakeTranscoder::healthy(),
    );

    for _ in 0..2 {
        let summary = completed(pipeline.run(&fixture.request(CutMode::SceneDetect)).unwrap());
        assert_eq!(summary.succeeded, 2);
    }

    assert_eq!(pipeline.codec(), VideoCodec::H264Nvenc);
    let jobs = pipeline.transcoder().jobs.borrow();
    assert_eq!(jobs.len(), 4);
    assert!(jobs.iter().all(|j| j.codec == VideoCodec::H264Nvenc));
    assert_eq!(jobs[0].output_path.extension().unwrap(), "mkv");
}

#[test]
fn test_failed_transcode_keeps_existing_clip() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.output_dir).unwrap();
    let existing = fixture.output_dir.join("cropped_video.mp4");
    fs::write(&existing, vec![1u8; 8192]).unwrap();

    let mut pipeline = pipeline(
        FakeDetector::returning(&[]),
        FakeTranscoder::with(vec![Behavior::ExitFailure]),
    );

    let summary = completed(
        pipeline
            .run(&fixture.request(CutMode::Manual {
                start: 0.0,
                end: 1.0,
            }))
            .unwrap(),
    );

    assert_eq!(summary.failed, 1);
    assert!(existing.exists(), "先前的輸出不應被刪除");
    assert_eq!(fs::metadata(&existing).unwrap().len(), 8192);
}

#[test]
fn test_nothing_detected_skips_planning_stage() {
    let fixture = Fixture::new();
    let mut pipeline = pipeline(FakeDetector::returning(&[]), FakeTranscoder::healthy());
    let observer = RecordingObserver::default();

    let report = pipeline
        .run_with(&fixture.request(CutMode::SceneDetect), &observer)
        .unwrap();

    assert!(matches!(report, RunReport::NothingDetected));
    assert_eq!(
        *observer.stages.borrow(),
        vec![
            PipelineStage::Probing,
            PipelineStage::Detecting,
            PipelineStage::Idle,
        ]
    );
    assert!(!fixture.output_dir.exists());
}
