//! 控制列元件
//!
//! 負責控制列的顯示/隱藏與繪製，不持有播放狀態

mod auto_hide;
mod render;

pub use auto_hide::{AutoHideTimer, DEFAULT_HIDE_DELAY};
pub use render::{OverlayView, PreviewLabel, render_overlay};
