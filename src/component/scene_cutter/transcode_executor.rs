use super::ffmpeg_command::FfmpegCommand;
use super::models::{JobOutcome, JobStatus, SegmentJob};
use super::verifier::{OutputSnapshot, discard_output, process_succeeded, verify_output};
use crate::error::ExecutionError;
use log::{error, info, warn};

/// 外部轉檔程序結束後回報的資訊
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    /// 被訊號終止時為 `None`
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// 外部轉檔器；只有在程序無法啟動時才回傳錯誤
pub trait Transcoder {
    fn transcode(&self, job: &SegmentJob) -> Result<ProcessReport, ExecutionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegTranscoder;

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, job: &SegmentJob) -> Result<ProcessReport, ExecutionError> {
        let output = FfmpegCommand::new(job)
            .build_command()
            .output()
            .map_err(|e| ExecutionError::Transcode(format!("無法啟動 ffmpeg: {e}")))?;

        Ok(ProcessReport {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// 逐一執行片段工作：每個工作只嘗試一次，失敗不影響其他工作
pub struct TranscodeExecutor<T> {
    transcoder: T,
}

impl<T: Transcoder> TranscodeExecutor<T> {
    pub const fn new(transcoder: T) -> Self {
        Self { transcoder }
    }

    pub const fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// 執行並驗證，成功時回傳輸出檔案大小
    pub fn try_execute(&self, job: &SegmentJob) -> Result<u64, ExecutionError> {
        info!(
            "切割: {:.2}s - {:.2}s -> {}",
            job.interval.start(),
            job.interval.end(),
            job.output_path.display()
        );
        info!("使用的編碼器: {}", job.codec);

        let snapshot = OutputSnapshot::capture(&job.output_path);
        let report = self.transcoder.transcode(job)?;

        if !process_succeeded(&report) {
            // 只清除這次轉檔留下的檔案，既有的輸出保持不變
            if snapshot.changed(&job.output_path) {
                discard_output(&job.output_path);
            }
            let detail = match report.exit_code {
                Some(code) => format!("ffmpeg 結束碼 {code}: {}", last_line(&report.stderr)),
                None => format!("ffmpeg 被中斷: {}", last_line(&report.stderr)),
            };
            return Err(ExecutionError::Transcode(detail));
        }

        verify_output(&job.output_path)
    }

    pub fn execute(&self, job: SegmentJob) -> JobOutcome {
        match self.try_execute(&job) {
            Ok(size) => {
                info!("影片已儲存: {} ({size} bytes)", job.output_path.display());
                JobOutcome {
                    job,
                    status: JobStatus::Success,
                    output_size_bytes: Some(size),
                }
            }
            Err(e) => {
                match &e {
                    ExecutionError::CorruptOutput => {
                        warn!("儲存影片失敗: {}", job.output_path.display());
                    }
                    ExecutionError::Transcode(detail) => {
                        error!("切割影片失敗 {}: {detail}", job.output_path.display());
                    }
                }
                JobOutcome {
                    job,
                    status: JobStatus::Failed(e),
                    output_size_bytes: None,
                }
            }
        }
    }
}

fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("未知錯誤")
}
