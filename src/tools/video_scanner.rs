use crate::config::FileTypeTable;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描資料夾內的影片檔，依檔名排序
pub fn scan_video_files(
    directory: &Path,
    file_type_table: &FileTypeTable,
) -> Result<Vec<VideoFileInfo>> {
    let mut video_files: Vec<VideoFileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| file_type_table.is_video_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    video_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;

    #[test]
    fn test_scan_video_files_filters_and_sorts() {
        let table = Config::embedded_file_type_table().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        fs::write(dir.path().join("b.mkv"), b"12345").unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();
        fs::write(nested.join("a.mp4"), b"123").unwrap();

        let files = scan_video_files(dir.path(), &table).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, dir.path().join("b.mkv"));
        assert_eq!(files[0].size, 5);
        assert_eq!(files[1].path, nested.join("a.mp4"));
    }
}
