//! 轉檔結果的檢查條件
//!
//! 每個條件都是獨立的函式，`verify_output` 負責組合並在失敗時清除輸出

use super::transcode_executor::ProcessReport;
use crate::error::ExecutionError;
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// 小於或等於此大小的輸出視為損壞
pub const MIN_OUTPUT_BYTES: u64 = 1024;

#[must_use]
pub const fn process_succeeded(report: &ProcessReport) -> bool {
    matches!(report.exit_code, Some(0))
}

#[must_use]
pub fn output_exists(path: &Path) -> bool {
    path.is_file()
}

#[must_use]
pub const fn output_size_acceptable(size_bytes: u64) -> bool {
    size_bytes > MIN_OUTPUT_BYTES
}

/// 檢查輸出存在且大小合理，回傳檔案大小；不通過時刪除輸出
pub fn verify_output(path: &Path) -> Result<u64, ExecutionError> {
    if !output_exists(path) {
        warn!("輸出檔案不存在: {}", path.display());
        return Err(ExecutionError::CorruptOutput);
    }

    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if !output_size_acceptable(size) {
        warn!("輸出檔案過小 ({size} bytes): {}", path.display());
        discard_output(path);
        return Err(ExecutionError::CorruptOutput);
    }

    Ok(size)
}

/// 轉檔前輸出路徑上的檔案狀態，用來判斷失敗的轉檔是否動過它
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSnapshot {
    state: Option<(u64, Option<SystemTime>)>,
}

impl OutputSnapshot {
    #[must_use]
    pub fn capture(path: &Path) -> Self {
        let state = fs::metadata(path)
            .ok()
            .filter(fs::Metadata::is_file)
            .map(|m| (m.len(), m.modified().ok()));
        Self { state }
    }

    /// 檔案是在快照之後建立或修改的
    #[must_use]
    pub fn changed(&self, path: &Path) -> bool {
        let current = Self::capture(path);
        current.state.is_some() && current != *self
    }
}

/// 刪除不完整或損壞的輸出檔案
pub fn discard_output(path: &Path) {
    if !path.exists() {
        return;
    }

    match fs::remove_file(path) {
        Ok(()) => info!("已刪除失敗的輸出檔案: {}", path.display()),
        Err(e) => warn!("無法刪除失敗的輸出檔案 {}: {e}", path.display()),
    }
}
