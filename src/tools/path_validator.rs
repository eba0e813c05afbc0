use anyhow::{Result, bail};
use std::io;
use std::path::Path;

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
