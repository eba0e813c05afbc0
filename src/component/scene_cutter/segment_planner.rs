use super::models::{CutMode, SegmentJob, TimeInterval};
use crate::error::CutError;
use crate::tools::{VideoCodec, ensure_directory_exists};
use log::debug;
use std::path::{Path, PathBuf};

/// 手動模式的固定輸出檔名
pub const MANUAL_OUTPUT_STEM: &str = "cropped_video";
pub const SCENE_OUTPUT_PREFIX: &str = "scene_";

/// 將使用者意圖轉成依序排列的轉檔工作，不會讀取影片內容
pub struct SegmentPlanner<'a> {
    output_dir: &'a Path,
    extension: &'a str,
    codec: VideoCodec,
}

impl<'a> SegmentPlanner<'a> {
    #[must_use]
    pub const fn new(output_dir: &'a Path, extension: &'a str, codec: VideoCodec) -> Self {
        Self {
            output_dir,
            extension,
            codec,
        }
    }

    /// 手動模式產生一個 `cropped_video.<ext>`；場景模式依序產生 `scene_<n>.<ext>`
    ///
    /// 先驗證輸入，通過後才建立輸出資料夾
    pub fn plan(
        &self,
        mode: &CutMode,
        video_path: &Path,
        scenes: &[TimeInterval],
    ) -> Result<Vec<SegmentJob>, CutError> {
        let jobs = match *mode {
            CutMode::Manual { start, end } => {
                let interval =
                    TimeInterval::new(start, end).ok_or(CutError::InvalidRange { start, end })?;
                vec![self.job(video_path, interval, MANUAL_OUTPUT_STEM.to_string())]
            }
            CutMode::SceneDetect => {
                if scenes.is_empty() {
                    return Err(CutError::NoScenes);
                }
                scenes
                    .iter()
                    .enumerate()
                    .map(|(i, &interval)| {
                        self.job(video_path, interval, format!("{SCENE_OUTPUT_PREFIX}{}", i + 1))
                    })
                    .collect()
            }
        };

        ensure_directory_exists(self.output_dir).map_err(|source| CutError::Directory {
            path: self.output_dir.to_path_buf(),
            source,
        })?;

        debug!("規劃了 {} 個片段", jobs.len());
        Ok(jobs)
    }

    fn job(&self, video_path: &Path, interval: TimeInterval, stem: String) -> SegmentJob {
        SegmentJob {
            source_path: video_path.to_path_buf(),
            interval,
            output_path: self.output_path(&stem),
            codec: self.codec,
        }
    }

    fn output_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.{}", self.extension))
    }
}
