use super::input::PlayerAction;
use crate::component::controls_overlay::{AutoHideTimer, OverlayView, PreviewLabel, render_overlay};
use crate::component::playback_controller::{
    Command, ControllerConfig, FullscreenHost, MediaElement, PlaybackController, PlaybackSpeed,
};
use crate::component::scrub_bar::{ScrubBar, ScrubPosition, TrackGeometry};
use crate::component::thumbnail_generator::{
    GenerationSession, MetadataGate, ResourceHandle, ThumbnailGenerator, ThumbnailSet,
};
use crate::component::transcoding_engine::TranscodingEngine;
use crate::config::UserSettings;
use crate::error::PlayerError;
use crate::tools::MediaSource;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const VIDEO_MIME: &str = "video/mp4";
const DEFAULT_BAR_WIDTH: usize = 60;

/// 一個影片來源的播放工作階段
///
/// 持有播放控制器、縮圖產生器與影片本身的資源代號；
/// 釋放時取消縮圖流程並撤銷所有代號
pub struct PlayerSession<E, M, F>
where
    E: TranscodingEngine + 'static,
    M: MediaElement,
    F: FullscreenHost,
{
    controller: PlaybackController<M, F>,
    generator: ThumbnailGenerator<E>,
    generation: GenerationSession,
    source_handle: Option<ResourceHandle>,
    scrub_bar: ScrubBar,
    auto_hide: AutoHideTimer,
    settings_cursor: PlaybackSpeed,
    notice: Option<String>,
}

impl<E, M, F> PlayerSession<E, M, F>
where
    E: TranscodingEngine + 'static,
    M: MediaElement,
    F: FullscreenHost,
{
    /// 綁定來源並開始產生預覽縮圖（每個來源只觸發一次）
    pub fn open(
        source: Arc<MediaSource>,
        element: M,
        fullscreen: F,
        generator: ThumbnailGenerator<E>,
        settings: &UserSettings,
    ) -> Result<Self, PlayerError> {
        let data = source.materialize().map_err(|e| {
            warn!("無法讀取影片來源 {}: {e}", source.name());
            PlayerError::InvalidFile(PathBuf::from(source.name()))
        })?;
        let source_handle = generator.store().create(data, VIDEO_MIME);
        info!("開啟影片 {} ({source_handle})", source.name());

        let metadata = Arc::new(MetadataGate::new());
        let controller = PlaybackController::new(
            Arc::clone(&source),
            element,
            fullscreen,
            Arc::clone(&metadata),
            ControllerConfig::from(settings),
        );
        let generation = generator.generate(source, metadata);

        Ok(Self {
            controller,
            generator,
            generation,
            source_handle: Some(source_handle),
            scrub_bar: ScrubBar::new(TrackGeometry {
                left: 0.0,
                width: DEFAULT_BAR_WIDTH as f64,
            }),
            auto_hide: AutoHideTimer::new(Duration::from_millis(settings.controls_hide_delay_ms)),
            settings_cursor: PlaybackSpeed::Normal,
            notice: None,
        })
    }

    #[must_use]
    pub const fn controller(&self) -> &PlaybackController<M, F> {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut PlaybackController<M, F> {
        &mut self.controller
    }

    #[must_use]
    pub const fn generator(&self) -> &ThumbnailGenerator<E> {
        &self.generator
    }

    #[must_use]
    pub const fn generation(&self) -> &GenerationSession {
        &self.generation
    }

    #[must_use]
    pub fn thumbnails(&self) -> Arc<ThumbnailSet> {
        self.generator.thumbnails()
    }

    /// 影片本身的資源 URL
    #[must_use]
    pub fn source_url(&self) -> Option<String> {
        self.source_handle.as_ref().map(ResourceHandle::url)
    }

    #[must_use]
    pub const fn controls_visible(&self) -> bool {
        self.auto_hide.is_visible()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub const fn scrub_bar(&self) -> &ScrubBar {
        &self.scrub_bar
    }

    pub const fn set_bar_width(&mut self, width: usize) {
        self.scrub_bar.set_track(TrackGeometry {
            left: 0.0,
            width: width as f64,
        });
    }

    /// 套用累積的媒體事件並推進自動隱藏計時
    pub fn tick(&mut self, now: Instant) -> bool {
        self.controller.pump_events();
        self.auto_hide.tick(now, self.controller.settings_open())
    }

    /// 執行指令；失敗只記錄並顯示提示，不中斷播放
    pub fn execute(&mut self, command: Command) {
        let opening_settings = command == Command::ToggleSettings && !self.controller.settings_open();

        match self.controller.execute(command) {
            Ok(()) => self.notice = None,
            Err(e) => {
                warn!("{e}");
                self.notice = Some(e.to_string());
            }
        }

        if opening_settings {
            self.settings_cursor = self.controller.state().playback_speed;
        }
    }

    pub fn hover(&mut self, pointer_x: f64) -> ScrubPosition {
        let count = self.thumbnails().len();
        self.scrub_bar
            .hover(pointer_x, self.controller.state().duration, count)
    }

    pub fn click(&mut self, pointer_x: f64) -> Result<ScrubPosition, PlayerError> {
        let count = self.thumbnails().len();
        self.scrub_bar.click(pointer_x, &mut self.controller, count)
    }

    /// 處理一個使用者動作；回傳 false 代表要離開播放器
    pub fn apply(&mut self, action: PlayerAction, now: Instant) -> bool {
        self.auto_hide.pointer_moved(now);

        match action {
            PlayerAction::Quit => return false,
            PlayerAction::Shortcut(key) => {
                if let Err(e) = self.controller.handle_key(key) {
                    warn!("{e}");
                    self.notice = Some(e.to_string());
                }
            }
            PlayerAction::ToggleSettings => self.execute(Command::ToggleSettings),
            PlayerAction::CloseSettings => self.execute(Command::CloseSettings),
            PlayerAction::ToggleAutoplay => self.execute(Command::ToggleAutoplay),
            PlayerAction::ButtonSkip(direction) => {
                let seconds = self.controller.config().button_skip_seconds;
                self.execute(Command::Skip(direction * seconds));
            }
            PlayerAction::VolumeStep(step) => {
                let volume = self.controller.state().effective_volume() + step;
                self.execute(Command::SetVolume(volume));
            }
            PlayerAction::MovePreview(columns) => self.move_preview(columns),
            PlayerAction::CommitPreview => self.commit_preview(),
            PlayerAction::LeavePreview => self.scrub_bar.leave(),
            PlayerAction::MoveSettingsCursor(step) => {
                self.settings_cursor = if step < 0 {
                    self.settings_cursor.slower()
                } else {
                    self.settings_cursor.faster()
                };
            }
            PlayerAction::ApplySettingsCursor => {
                self.execute(Command::SetPlaybackSpeed(self.settings_cursor));
            }
            PlayerAction::Tap(fraction) => {
                let width = self.scrub_bar.track().width;
                if let Err(e) = self.controller.handle_touch(fraction * width, width) {
                    warn!("{e}");
                    self.notice = Some(e.to_string());
                }
            }
            PlayerAction::Ignore => {}
        }
        true
    }

    /// 預覽游標從目前預覽位置（或播放位置）移動
    fn move_preview(&mut self, columns: isize) {
        let track = self.scrub_bar.track();
        let fraction = self
            .scrub_bar
            .preview()
            .map_or_else(|| self.controller.state().played_fraction(), |p| p.fraction);
        let x = track.left + fraction * track.width + columns as f64;
        self.hover(x);
    }

    fn commit_preview(&mut self) {
        let Some(preview) = self.scrub_bar.preview() else {
            return;
        };
        let track = self.scrub_bar.track();
        let x = track.left + preview.fraction * track.width;
        if let Err(e) = self.click(x) {
            warn!("{e}");
            self.notice = Some(e.to_string());
        }
        self.scrub_bar.leave();
    }

    fn preview_label(&self) -> Option<PreviewLabel> {
        let position = self.scrub_bar.preview()?;
        let thumbnails = self.thumbnails();
        let image = self.scrub_bar.preview_thumbnail(&thumbnails).map(|t| t.url());
        Some(PreviewLabel {
            fraction: position.fraction,
            time: position.time,
            image,
        })
    }

    /// 繪製控制列；隱藏時回傳空白
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        if !self.auto_hide.is_visible() {
            return Vec::new();
        }

        let generation = (!self.generation.is_finished()).then(|| self.generation.progress());
        render_overlay(&OverlayView {
            state: self.controller.state(),
            settings_open: self.controller.settings_open(),
            settings_cursor: self.settings_cursor,
            preview: self.preview_label(),
            generation,
            notice: self.notice.as_deref(),
            bar_width: self.scrub_bar.track().width as usize,
        })
    }
}

impl<E, M, F> Drop for PlayerSession<E, M, F>
where
    E: TranscodingEngine + 'static,
    M: MediaElement,
    F: FullscreenHost,
{
    fn drop(&mut self) {
        self.generator.shutdown();
        if let Some(handle) = self.source_handle.take() {
            self.generator.store().revoke(handle);
        }
    }
}
