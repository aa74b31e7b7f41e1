mod ffprobe_info;
mod media_source;
mod path_validator;
mod time_format;
mod video_scanner;

pub use ffprobe_info::{VideoInfo, get_video_info};
pub use media_source::MediaSource;
pub use path_validator::{validate_directory_exists, validate_video_file};
pub use time_format::{format_time, format_timestamp, parse_time};
pub use video_scanner::{VideoFileInfo, scan_video_files};
