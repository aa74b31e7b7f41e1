//! 轉碼引擎轉接層
//!
//! 整個程式只持有一個引擎實例：
//! - 生命週期：未初始化 → 載入中 → 就緒 / 失敗
//! - 所有操作經由同一把鎖依序執行
//! - 來源影片每次產生流程只寫入虛擬檔案系統一次

mod adapter;
mod engine;
mod ffmpeg_engine;

pub use adapter::{EngineAdapter, SOURCE_FILE_NAME, StagedSource};
pub use engine::{TranscodingEngine, frame_extraction_args};
pub use ffmpeg_engine::FfmpegEngine;
