//! 場景切割流程的錯誤分類

use std::path::PathBuf;
use thiserror::Error;

/// 會中止整次執行的錯誤（在任何轉檔前發生）
#[derive(Debug, Error)]
pub enum CutError {
    #[error("缺少輸入: {0}")]
    MissingInput(String),

    #[error("無效的時間範圍: 開始 {start:.2}s 必須小於結束 {end:.2}s")]
    InvalidRange { start: f64, end: f64 },

    #[error("無法開啟影片 {}: {detail}", .path.display())]
    Open { path: PathBuf, detail: String },

    /// 沒有偵測到任何場景，屬於「沒事可做」而非失敗
    #[error("沒有偵測到任何場景")]
    NoScenes,

    #[error("無法建立輸出資料夾 {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CutError {
    /// 是否為資訊性結果（不以錯誤對話呈現）
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::NoScenes)
    }
}

/// 單一片段的轉檔錯誤，只影響該片段
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("轉檔失敗: {0}")]
    Transcode(String),

    #[error("輸出檔案損壞或過小")]
    CorruptOutput,
}
