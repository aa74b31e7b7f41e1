//! 播放控制元件
//!
//! 以 reducer 的方式維護播放狀態：使用者操作與媒體元件事件
//! 都以訊息送入同一個入口，依收到的順序套用

mod keyboard;
mod main;
mod media_element;
mod state;

pub use keyboard::{KeyInput, shortcut, touch_command};
pub use main::{Command, ControllerConfig, Message, PlaybackController};
pub use media_element::{FullscreenHost, MediaElement, MediaEvent};
pub use state::{PlaybackSpeed, PlaybackState};
