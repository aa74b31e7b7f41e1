use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;

const LOG_FILE: &str = "video_preview_player.log";

/// 初始化日誌
///
/// 預設等級 info，可用 `RUST_LOG` 覆寫。
/// 播放畫面佔用終端機，所以日誌寫入檔案；無法開檔時才輸出到 stderr
pub fn init() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("無法開啟日誌檔 {LOG_FILE}: {e}");
            builder.target(Target::Stderr);
        }
    }

    if let Err(e) = builder.try_init() {
        eprintln!("日誌已初始化: {e}");
    }
}
