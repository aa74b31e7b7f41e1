use super::engine::TranscodingEngine;
use crate::error::EngineError;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

/// 以 ffmpeg 執行檔實作的轉碼引擎
///
/// 虛擬檔案系統是暫存目錄下的一個私有資料夾，
/// 引擎釋放時整個資料夾一併刪除
pub struct FfmpegEngine {
    ffmpeg_path: String,
    root: PathBuf,
    created: bool,
}

impl FfmpegEngine {
    #[must_use]
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        let root = std::env::temp_dir().join(format!(".preview_engine_{}", Uuid::new_v4()));
        Self::with_root(ffmpeg_path, root)
    }

    #[must_use]
    pub fn with_root(ffmpeg_path: impl Into<String>, root: PathBuf) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            root,
            created: false,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 將虛擬檔名對應到實際路徑，不允許跳出私有資料夾
    fn resolve(&self, name: &str) -> Result<PathBuf, EngineError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(EngineError::InvalidFileName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl TranscodingEngine for FfmpegEngine {
    fn load(&mut self) -> Result<(), EngineError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .map_err(|e| EngineError::Load(format!("無法執行 {}: {e}", self.ffmpeg_path)))?;

        if !output.status.success() {
            return Err(EngineError::Load(format!(
                "{} -version 回傳 {}",
                self.ffmpeg_path, output.status
            )));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| EngineError::Load(format!("無法建立引擎暫存目錄: {e}")))?;
        self.created = true;

        let version = String::from_utf8_lossy(&output.stdout);
        info!(
            "轉碼引擎已載入: {}",
            version.lines().next().unwrap_or("ffmpeg")
        );
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        let path = self.resolve(name)?;
        fs::write(&path, data)?;
        debug!("引擎寫入 {} ({} bytes)", name, data.len());
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError> {
        let path = self.resolve(name)?;
        if !path.exists() {
            return Err(EngineError::MissingOutput(name.to_string()));
        }
        Ok(fs::read(&path)?)
    }

    fn delete_file(&mut self, name: &str) -> Result<(), EngineError> {
        let path = self.resolve(name)?;
        fs::remove_file(&path)?;
        Ok(())
    }

    fn exec(&mut self, args: &[String]) -> Result<(), EngineError> {
        debug!("執行 {} {}", self.ffmpeg_path, args.join(" "));

        let output = Command::new(&self.ffmpeg_path)
            .current_dir(&self.root)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"])
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Command(stderr.trim().to_string()));
        }

        Ok(())
    }
}

impl Drop for FfmpegEngine {
    fn drop(&mut self) {
        if self.created && self.root.exists() && fs::remove_dir_all(&self.root).is_err() {
            warn!("無法清理引擎暫存目錄: {}", self.root.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FfmpegEngine::with_root("ffmpeg", dir.path().to_path_buf());

        engine.write_file("input.mp4", b"abc").unwrap();
        assert_eq!(engine.read_file("input.mp4").unwrap(), b"abc");

        engine.delete_file("input.mp4").unwrap();
        assert!(matches!(
            engine.read_file("input.mp4"),
            Err(EngineError::MissingOutput(_))
        ));
    }

    #[test]
    fn test_rejects_names_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FfmpegEngine::with_root("ffmpeg", dir.path().to_path_buf());

        for name in ["", "..", "../escape.jpg", "a/b.jpg", "a\\b.jpg"] {
            assert!(matches!(
                engine.write_file(name, b"x"),
                Err(EngineError::InvalidFileName(_))
            ));
        }
    }

    #[test]
    fn test_load_fails_without_binary() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FfmpegEngine::with_root(
            "definitely-not-an-ffmpeg-binary",
            dir.path().join("engine"),
        );

        assert!(matches!(engine.load(), Err(EngineError::Load(_))));
        assert!(!dir.path().join("engine").exists());
    }

    #[test]
    fn test_default_root_is_unique() {
        let a = FfmpegEngine::new("ffmpeg");
        let b = FfmpegEngine::new("ffmpeg");
        assert_ne!(a.root(), b.root());
        assert!(a.root().starts_with(std::env::temp_dir()));
    }
}
