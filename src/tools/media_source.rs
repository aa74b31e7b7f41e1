use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 已載入的影片來源
///
/// 綁定到播放器後不再變動；位元組內容以 `Arc` 共享而非複製
#[derive(Debug, Clone)]
pub enum MediaSource {
    Bytes { name: String, data: Arc<[u8]> },
    File(PathBuf),
}

impl MediaSource {
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// 讀入整個檔案並以位元組形式持有
    pub fn load_file(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
        Ok(Self::from_bytes(name, data))
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Bytes { name, .. } => name.clone(),
            Self::File(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().to_string()),
        }
    }

    /// 取得可交給轉碼引擎的位元組
    pub fn materialize(&self) -> io::Result<Arc<[u8]>> {
        match self {
            Self::Bytes { data, .. } => Ok(Arc::clone(data)),
            Self::File(path) => Ok(fs::read(path)?.into()),
        }
    }
}
