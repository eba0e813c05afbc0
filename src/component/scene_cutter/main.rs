use super::models::{CutMode, CutRequest, RunReport};
use super::pipeline::{Notification, Pipeline};
use super::progress::ConsoleProgress;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::error::CutError;
use crate::tools::VideoCodec;
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::{error, warn};
use std::path::PathBuf;

/// 互動式前端：收集輸入、呼叫流程、顯示結果
pub struct SceneCutter<'a> {
    config: &'a mut Config,
    codec: VideoCodec,
}

impl<'a> SceneCutter<'a> {
    pub const fn new(config: &'a mut Config, codec: VideoCodec) -> Self {
        Self { config, codec }
    }

    pub fn run(&mut self, use_scene_detection: bool) -> Result<()> {
        let title = if use_scene_detection {
            "=== 場景偵測自動切割 ==="
        } else {
            "=== 依時間範圍切割 ==="
        };
        println!("{}", style(title).cyan().bold());
        println!("{}", style(format!("編碼器: {}", self.codec)).dim());

        let video_path = prompt_path("請輸入影片檔案路徑", &self.config.settings.recent_videos)?;
        let output_dir =
            prompt_path("請輸入輸出資料夾路徑", &self.config.settings.recent_output_dirs)?;

        let mode = if use_scene_detection {
            CutMode::SceneDetect
        } else {
            let start: f64 = Input::new()
                .with_prompt("開始時間（秒）")
                .default(0.0)
                .interact_text()?;
            let end: f64 = Input::new()
                .with_prompt("結束時間（秒）")
                .default(0.0)
                .interact_text()?;
            CutMode::Manual { start, end }
        };

        let request = CutRequest {
            video_path: PathBuf::from(&video_path),
            output_dir: PathBuf::from(&output_dir),
            mode,
        };

        let extension = self.config.settings.normalized_extension();
        let mut pipeline = Pipeline::with_ffmpeg(self.codec, &extension);
        let progress = ConsoleProgress::new();
        let result = pipeline.run_with(&request, &progress);

        if !matches!(result, Err(CutError::MissingInput(_))) {
            self.remember_paths(&video_path, &output_dir);
        }

        print_notification(&result);
        Ok(())
    }

    fn remember_paths(&mut self, video_path: &str, output_dir: &str) {
        let settings = &mut self.config.settings;
        add_recent_path(&mut settings.recent_videos, video_path);
        add_recent_path(&mut settings.recent_output_dirs, output_dir);

        if let Err(e) = save_settings(settings) {
            warn!("無法儲存最近使用的路徑: {e:#}");
        }
    }
}

fn prompt_path(prompt: &str, recent: &[String]) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(last) = recent.first() {
        input = input.default(last.clone());
    }
    let path: String = input.interact_text()?;
    Ok(path.trim().to_string())
}

fn print_notification(result: &Result<RunReport, CutError>) {
    let notification = Notification::from_result(result);

    println!();
    match result {
        Ok(RunReport::Completed(summary)) => {
            println!("{}", style("=== 切割摘要 ===").cyan().bold());
            println!("  總計: {} 個片段", summary.planned);
            println!("  成功: {} 個", style(summary.succeeded).green());
            if summary.failed > 0 {
                println!("  失敗: {} 個", style(summary.failed).red());
                for (path, reason) in &summary.failures {
                    println!("    - {}: {reason}", path.display());
                }
            }
            let message = style(&notification.message);
            println!("{}", if notification.ok { message.green() } else { message.yellow() });
        }
        Ok(RunReport::NothingDetected) => {
            println!("{}", style(&notification.message).yellow());
        }
        Err(e) => {
            error!("切割失敗: {e}");
            println!("{} {}", style("錯誤:").red().bold(), notification.message);
        }
    }
}
