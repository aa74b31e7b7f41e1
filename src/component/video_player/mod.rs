//! 影片播放器元件
//!
//! 將播放控制、預覽縮圖與控制列組成一個工作階段，
//! 並提供以終端機操作的播放迴圈

mod input;
mod main;
mod media_clock;
mod session;
mod terminal_fullscreen;

pub use input::{PlayerAction, map_key};
pub use main::{VideoPlayer, drive_session};
pub use media_clock::MediaClock;
pub use session::PlayerSession;
pub use terminal_fullscreen::TerminalFullscreen;
