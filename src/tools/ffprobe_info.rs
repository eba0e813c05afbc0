use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration_seconds: f64,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    parse_ffprobe_output(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("無法解析影片資訊: {}", path.display()))
}

fn parse_ffprobe_output(stdout: &str) -> Result<VideoInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(stdout).with_context(|| "無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    // 影片長度優先從 format 取得，其次從 stream
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| anyhow!("無法取得影片長度"))?;

    Ok(VideoInfo { duration_seconds })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffprobe_output_format_duration() {
        let json = r#"{
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 1920, "height": 1080, "duration": "29.5"}
            ],
            "format": {"duration": "30.000000"}
        }"#;
        let info = parse_ffprobe_output(json).unwrap();
        assert!((info.duration_seconds - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_ffprobe_output_stream_duration_fallback() {
        let json = r#"{"streams": [{"codec_type": "video", "duration": "12.0"}], "format": {}}"#;
        let info = parse_ffprobe_output(json).unwrap();
        assert!((info.duration_seconds - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_ffprobe_output_without_video_stream() {
        let json = r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "10.0"}}"#;
        assert!(parse_ffprobe_output(json).is_err());
    }

    #[test]
    fn test_parse_ffprobe_output_invalid_json() {
        assert!(parse_ffprobe_output("").is_err());
    }
}
