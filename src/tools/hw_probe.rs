//! 硬體編碼能力偵測
//!
//! 只檢查主機上是否有 NVIDIA 工具鏈，不會讀取任何影片。
//! 結果在程式啟動時計算一次，之後以值的方式傳遞。

use log::info;
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// 有此執行檔即視為可使用 NVENC
pub const NVIDIA_PROBE_BINARY: &str = "nvidia-smi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    H264Nvenc,
    Libx264,
}

impl VideoCodec {
    #[must_use]
    pub const fn encoder_name(self) -> &'static str {
        match self {
            Self::H264Nvenc => "h264_nvenc",
            Self::Libx264 => "libx264",
        }
    }

    /// 固定品質參數的旗標，NVENC 不支援 `-crf`
    #[must_use]
    pub const fn quality_flag(self) -> &'static str {
        match self {
            Self::H264Nvenc => "-cq",
            Self::Libx264 => "-crf",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoder_name())
    }
}

/// 依目前的 `PATH` 選擇編碼器
#[must_use]
pub fn probe() -> VideoCodec {
    let path_var = env::var_os("PATH");
    probe_in(path_var.as_deref())
}

/// 依指定的搜尋路徑選擇編碼器；找不到硬體工具鏈不是錯誤
#[must_use]
pub fn probe_in(path_var: Option<&OsStr>) -> VideoCodec {
    let codec = match find_executable(NVIDIA_PROBE_BINARY, path_var) {
        Some(found) => {
            info!("偵測到 NVIDIA 工具鏈: {}", found.display());
            VideoCodec::H264Nvenc
        }
        None => VideoCodec::Libx264,
    };

    info!("使用的編碼器: {codec}");
    codec
}

fn find_executable(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .flat_map(|dir| candidate_names(name).map(move |n| dir.join(n)))
        .find(|candidate| is_executable(candidate))
}

fn candidate_names(name: &str) -> impl Iterator<Item = String> {
    let exe = if cfg!(windows) {
        Some(format!("{name}.exe"))
    } else {
        None
    };
    std::iter::once(name.to_string()).chain(exe)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
