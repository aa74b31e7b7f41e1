use crate::error::EngineError;
use crate::tools::format_timestamp;

/// 內嵌轉碼引擎的最小介面
///
/// 引擎擁有自己的虛擬檔案系統，實作不需要是執行緒安全的，
/// 由 [`EngineAdapter`](super::EngineAdapter) 負責序列化存取。
pub trait TranscodingEngine: Send {
    fn load(&mut self) -> Result<(), EngineError>;
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError>;
    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError>;
    fn delete_file(&mut self, name: &str) -> Result<(), EngineError>;
    fn exec(&mut self, args: &[String]) -> Result<(), EngineError>;
}

/// 建立單張影格擷取的參數
///
/// `-ss` 放在 `-i` 前做快速跳轉，縮放只固定寬度，高度依比例
#[must_use]
pub fn frame_extraction_args(input: &str, offset: f64, width: u32, output: &str) -> Vec<String> {
    vec![
        "-ss".to_string(),
        format_timestamp(offset),
        "-i".to_string(),
        input.to_string(),
        "-vf".to_string(),
        format!("scale={width}:-1"),
        "-vframes".to_string(),
        "1".to_string(),
        "-q:v".to_string(),
        "2".to_string(),
        output.to_string(),
    ]
}
