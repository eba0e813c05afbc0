use super::models::TimeInterval;
use crate::error::CutError;
use crate::tools::get_video_info;
use log::{debug, info, warn};
use regex::Regex;
use std::path::Path;
use std::process::Command;

/// scdet 場景變換閾值 (0-100)，越高場景越少越長
pub const DEFAULT_SCENE_THRESHOLD: f64 = 12.0;

/// 小於此間隔的變換點視為同一個
const MIN_BOUNDARY_GAP: f64 = 0.1;

/// 場景偵測器：輸入影片路徑，輸出依時間排序且連續的場景區間
pub trait SceneDetector {
    fn detect(&self, video_path: &Path) -> Result<Vec<TimeInterval>, CutError>;
}

/// 場景偵測設定
#[derive(Debug, Clone)]
pub struct SceneDetectorConfig {
    pub threshold: f64,
    /// 縮放到的寬度（加速分析）
    pub scale_width: u32,
}

impl Default for SceneDetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCENE_THRESHOLD,
            scale_width: 320,
        }
    }
}

/// 使用 ffmpeg scdet 濾鏡偵測場景變換
#[derive(Debug, Clone, Default)]
pub struct FfmpegSceneDetector {
    config: SceneDetectorConfig,
}

impl FfmpegSceneDetector {
    #[must_use]
    pub const fn new(config: SceneDetectorConfig) -> Self {
        Self { config }
    }

    fn detect_boundaries(&self, path: &Path, duration: f64) -> Result<Vec<f64>, CutError> {
        debug!(
            "場景偵測設定: threshold={}, scale_width={}",
            self.config.threshold, self.config.scale_width
        );

        let filter = format!(
            "scale={}:-2,scdet=s=1:t={}",
            self.config.scale_width, self.config.threshold
        );

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-nostdin", "-i"])
            .arg(path)
            .args(["-an", "-sn", "-dn", "-vf", &filter, "-f", "null", "-"])
            .output()
            .map_err(|e| CutError::Open {
                path: path.to_path_buf(),
                detail: format!("無法執行 ffmpeg 場景偵測: {e}"),
            })?;

        // scdet 輸出在 stderr
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            warn!(
                "ffmpeg 場景偵測結束碼異常 ({}), 視為沒有場景變換: {}",
                output.status,
                path.display()
            );
        }

        parse_scdet_output(&stderr, duration).map_err(|e| CutError::Open {
            path: path.to_path_buf(),
            detail: format!("無法解析場景偵測輸出: {e}"),
        })
    }
}

impl SceneDetector for FfmpegSceneDetector {
    fn detect(&self, video_path: &Path) -> Result<Vec<TimeInterval>, CutError> {
        info!("開啟影片: {}", video_path.display());

        let video_info = get_video_info(video_path).map_err(|e| CutError::Open {
            path: video_path.to_path_buf(),
            detail: format!("{e:#}"),
        })?;

        info!("偵測場景中...");
        let boundaries = self.detect_boundaries(video_path, video_info.duration_seconds)?;
        let scenes = scenes_from_boundaries(&boundaries, video_info.duration_seconds);

        info!("找到 {} 個場景", scenes.len());
        Ok(scenes)
    }
}

/// 解析 ffmpeg scdet 輸出
///
/// 支援 `lavfi.scd.time: 12.345`、`lavfi.scd.time=12.345` 與 `t:12.345` 格式，
/// 回傳排序、去重且落在 `(0, duration)` 內的變換點
fn parse_scdet_output(output: &str, duration: f64) -> Result<Vec<f64>, regex::Error> {
    let scd_time_regex = Regex::new(r"lavfi\.scd\.time[=:]\s*([0-9.]+)")?;
    let time_regex = Regex::new(r"\[(?:Parsed_)?scdet[^\]]*\].*\bt:([0-9.]+)")?;

    let mut boundaries: Vec<f64> = output
        .lines()
        .filter_map(|line| {
            scd_time_regex
                .captures(line)
                .or_else(|| time_regex.captures(line))
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .filter(|&t| t > 0.0 && t < duration)
        .collect();

    boundaries.sort_by(f64::total_cmp);
    boundaries.dedup_by(|a, b| (*a - *b).abs() < MIN_BOUNDARY_GAP);

    debug!("偵測到 {} 個場景變換點", boundaries.len());
    Ok(boundaries)
}

/// 將變換點轉成涵蓋 `[0, duration]` 的連續區間；沒有變換點時回傳空序列
#[must_use]
pub fn scenes_from_boundaries(boundaries: &[f64], duration: f64) -> Vec<TimeInterval> {
    if boundaries.is_empty() {
        return Vec::new();
    }

    std::iter::once(0.0)
        .chain(boundaries.iter().copied())
        .zip(boundaries.iter().copied().chain(std::iter::once(duration)))
        .filter_map(|(start, end)| TimeInterval::new(start, end))
        .collect()
}
