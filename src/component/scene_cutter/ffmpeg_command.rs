use super::models::SegmentJob;
use std::path::Path;
use std::process::Command;

pub const PRESET: &str = "slow";
pub const CONSTANT_QUALITY: &str = "18";
pub const AUDIO_CODEC: &str = "aac";
pub const AUDIO_BITRATE: &str = "128k";

/// 單一片段的 ffmpeg 轉檔命令
pub struct FfmpegCommand<'a> {
    job: &'a SegmentJob,
}

impl<'a> FfmpegCommand<'a> {
    #[must_use]
    pub const fn new(job: &'a SegmentJob) -> Self {
        Self { job }
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.job.output_path
    }

    /// `-ss`/`-to` 放在 `-i` 之後以取得精準的切點，結束時間不包含在輸出內
    #[must_use]
    pub fn build_command(&self) -> Command {
        let job = self.job;
        let mut cmd = Command::new("ffmpeg");

        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]);
        cmd.arg(&job.source_path);
        cmd.args([
            "-ss",
            &format_seconds(job.interval.start()),
            "-to",
            &format_seconds(job.interval.end()),
            "-c:v",
            job.codec.encoder_name(),
            "-preset",
            PRESET,
            job.codec.quality_flag(),
            CONSTANT_QUALITY,
            "-c:a",
            AUDIO_CODEC,
            "-b:a",
            AUDIO_BITRATE,
        ]);
        cmd.arg(&job.output_path);

        cmd
    }
}

fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.3}")
}
