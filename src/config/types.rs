use serde::{Deserialize, Serialize};

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

pub const DEFAULT_OUTPUT_EXTENSION: &str = "mp4";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// 輸出影片副檔名（不含點），決定輸出容器
    pub output_extension: String,
    pub recent_videos: Vec<String>,
    pub recent_output_dirs: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            recent_videos: Vec::new(),
            recent_output_dirs: Vec::new(),
        }
    }
}

impl UserSettings {
    /// 去除前導點與空白；空字串時退回預設值
    #[must_use]
    pub fn normalized_extension(&self) -> String {
        let ext = self.output_extension.trim().trim_start_matches('.');
        if ext.is_empty() {
            DEFAULT_OUTPUT_EXTENSION.to_string()
        } else {
            ext.to_lowercase()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
