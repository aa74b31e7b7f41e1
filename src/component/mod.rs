//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod controls_overlay;
pub mod playback_controller;
pub mod scrub_bar;
pub mod thumbnail_generator;
pub mod transcoding_engine;
pub mod video_player;

pub use scrub_bar::{ScrubBar, ScrubPosition, TrackGeometry, locate};
pub use video_player::{PlayerSession, VideoPlayer};
