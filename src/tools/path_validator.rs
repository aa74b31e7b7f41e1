use crate::config::FileTypeTable;
use crate::error::PlayerError;
use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 確認路徑是存在的影片檔（依副檔名判斷）
pub fn validate_video_file(path: &Path, file_type_table: &FileTypeTable) -> Result<(), PlayerError> {
    if !path.is_file() || !file_type_table.is_video_file(path) {
        return Err(PlayerError::InvalidFile(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;

    #[test]
    fn test_validate_directory_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_directory_exists(dir.path()).is_ok());
        assert!(validate_directory_exists(&dir.path().join("missing")).is_err());

        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert!(validate_directory_exists(&file).is_err());
    }

    #[test]
    fn test_validate_video_file() {
        let table = Config::embedded_file_type_table().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let video = dir.path().join("clip.MP4");
        fs::write(&video, b"not really a video").unwrap();
        assert!(validate_video_file(&video, &table).is_ok());

        let text = dir.path().join("notes.txt");
        fs::write(&text, b"hello").unwrap();
        assert!(matches!(
            validate_video_file(&text, &table),
            Err(PlayerError::InvalidFile(_))
        ));

        assert!(validate_video_file(&dir.path().join("gone.mp4"), &table).is_err());
        assert!(validate_video_file(dir.path(), &table).is_err());
    }
}
