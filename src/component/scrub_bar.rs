//! 進度條：指標位置 → (時間, 縮圖索引)
//!
//! 滑過只更新預覽位置，點擊才會跳轉

use crate::component::playback_controller::{
    Command, FullscreenHost, MediaElement, PlaybackController,
};
use crate::component::thumbnail_generator::{Thumbnail, ThumbnailSet};
use crate::error::PlayerError;

/// 進度條在畫面上的位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubPosition {
    pub fraction: f64,
    pub time: f64,
    /// 沒有縮圖時為 None
    pub thumbnail_index: Option<usize>,
}

/// 將指標位置換算成時間與縮圖索引
#[must_use]
pub fn locate(
    pointer_x: f64,
    track: TrackGeometry,
    duration: Option<f64>,
    thumbnail_count: usize,
) -> ScrubPosition {
    let fraction = if track.width > 0.0 && pointer_x.is_finite() {
        ((pointer_x - track.left) / track.width).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let time = fraction * duration.unwrap_or(0.0);
    let thumbnail_index = (thumbnail_count > 0)
        .then(|| ((fraction * thumbnail_count as f64).floor() as usize).min(thumbnail_count - 1));

    ScrubPosition {
        fraction,
        time,
        thumbnail_index,
    }
}

#[derive(Debug, Clone)]
pub struct ScrubBar {
    track: TrackGeometry,
    preview: Option<ScrubPosition>,
}

impl ScrubBar {
    #[must_use]
    pub const fn new(track: TrackGeometry) -> Self {
        Self {
            track,
            preview: None,
        }
    }

    #[must_use]
    pub const fn track(&self) -> TrackGeometry {
        self.track
    }

    pub const fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    #[must_use]
    pub const fn preview(&self) -> Option<ScrubPosition> {
        self.preview
    }

    /// 指標滑過：只更新預覽
    pub fn hover(
        &mut self,
        pointer_x: f64,
        duration: Option<f64>,
        thumbnail_count: usize,
    ) -> ScrubPosition {
        let position = locate(pointer_x, self.track, duration, thumbnail_count);
        self.preview = Some(position);
        position
    }

    pub const fn leave(&mut self) {
        self.preview = None;
    }

    /// 點擊：跳轉到對應時間
    pub fn click<M: MediaElement, F: FullscreenHost>(
        &mut self,
        pointer_x: f64,
        controller: &mut PlaybackController<M, F>,
        thumbnail_count: usize,
    ) -> Result<ScrubPosition, PlayerError> {
        let position = locate(
            pointer_x,
            self.track,
            controller.state().duration,
            thumbnail_count,
        );
        controller.execute(Command::Seek(position.time))?;
        Ok(position)
    }

    /// 目前預覽位置對應的縮圖
    #[must_use]
    pub fn preview_thumbnail<'a>(&self, thumbnails: &'a ThumbnailSet) -> Option<&'a Thumbnail> {
        let position = self.preview?;
        thumbnails.get(position.thumbnail_index?)
    }
}
