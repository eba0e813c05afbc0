mod ffprobe_info;
pub mod hw_probe;
mod path_validator;

pub use ffprobe_info::{VideoInfo, get_video_info};
pub use hw_probe::{VideoCodec, probe, probe_in};
pub use path_validator::{ensure_directory_exists, validate_file_exists};
