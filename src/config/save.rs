use crate::config::load::SETTINGS_FILE;
use crate::config::types::{MAX_RECENT_PATHS, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 將路徑加入最前面，去重並限制數量
pub fn add_recent_path(recent: &mut Vec<String>, path: &str) {
    recent.retain(|p| p != path);
    recent.insert(0, path.to_string());
    recent.truncate(MAX_RECENT_PATHS);
}
