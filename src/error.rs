//! 播放器核心錯誤型別
//!
//! 縮圖管線與播放控制的錯誤都不是致命錯誤：
//! 最壞情況只是沒有預覽縮圖，播放本身仍可進行。

use std::path::PathBuf;
use thiserror::Error;

/// 轉碼引擎相關錯誤
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("轉碼引擎載入失敗: {0}")]
    Load(String),
    #[error("轉碼引擎尚未就緒")]
    NotReady,
    #[error("擷取時間點超出影片長度: {offset:.3}s > {duration:.3}s")]
    OffsetOutOfRange { offset: f64, duration: f64 },
    #[error("ffmpeg 執行失敗: {0}")]
    Command(String),
    #[error("輸出檔案未建立: {0}")]
    MissingOutput(String),
    #[error("無效的虛擬檔名: {0}")]
    InvalidFileName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 播放器層級錯誤
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("轉碼引擎無法使用，略過預覽縮圖: {0}")]
    EngineLoad(#[source] EngineError),
    #[error("預覽影格 {index} 擷取失敗: {source}")]
    FrameExtraction {
        index: usize,
        #[source]
        source: EngineError,
    },
    #[error("全螢幕切換失敗: {0}")]
    Fullscreen(String),
    #[error("不是可播放的影片檔案: {}", .0.display())]
    InvalidFile(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_extraction_message_contains_index() {
        let err = PlayerError::FrameExtraction {
            index: 10,
            source: EngineError::Command("exit status 1".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("10"));
        assert!(message.contains("exit status 1"));
    }

    #[test]
    fn test_offset_out_of_range_formatting() {
        let err = EngineError::OffsetOutOfRange {
            offset: 61.0,
            duration: 60.0,
        };
        assert!(err.to_string().contains("61.000s > 60.000s"));
    }
}
