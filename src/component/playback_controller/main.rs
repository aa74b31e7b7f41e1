use super::keyboard::{KeyInput, shortcut, touch_command};
use super::media_element::{FullscreenHost, MediaElement, MediaEvent};
use super::state::{PlaybackSpeed, PlaybackState};
use crate::component::thumbnail_generator::MetadataGate;
use crate::config::UserSettings;
use crate::error::PlayerError;
use crate::tools::MediaSource;
use log::{debug, info, warn};
use std::sync::Arc;

/// 使用者操作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TogglePlay,
    Seek(f64),
    Skip(f64),
    SetVolume(f64),
    ToggleMute,
    SetPlaybackSpeed(PlaybackSpeed),
    ToggleFullscreen,
    ToggleAutoplay,
    ToggleSettings,
    CloseSettings,
}

/// 狀態更新訊息：使用者操作與原生事件走同一條路徑
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Command(Command),
    Media(MediaEvent),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub autoplay_on_end: bool,
    /// 方向鍵快轉秒數
    pub keyboard_skip_seconds: f64,
    /// 按鈕與觸控快轉秒數
    pub button_skip_seconds: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            autoplay_on_end: true,
            keyboard_skip_seconds: 5.0,
            button_skip_seconds: 10.0,
        }
    }
}

impl From<&UserSettings> for ControllerConfig {
    fn from(settings: &UserSettings) -> Self {
        Self {
            autoplay_on_end: settings.autoplay_on_end,
            keyboard_skip_seconds: settings.keyboard_skip_seconds,
            button_skip_seconds: settings.button_skip_seconds,
        }
    }
}

/// 播放控制器
///
/// 包裝單一媒體元件，所有狀態變更都經過 [`dispatch`](Self::dispatch)
pub struct PlaybackController<M: MediaElement, F: FullscreenHost> {
    source: Arc<MediaSource>,
    element: M,
    fullscreen: F,
    metadata: Arc<MetadataGate>,
    state: PlaybackState,
    settings_open: bool,
    config: ControllerConfig,
}

impl<M: MediaElement, F: FullscreenHost> PlaybackController<M, F> {
    pub fn new(
        source: Arc<MediaSource>,
        element: M,
        fullscreen: F,
        metadata: Arc<MetadataGate>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            source,
            element,
            fullscreen,
            metadata,
            state: PlaybackState {
                is_autoplay_on_end: config.autoplay_on_end,
                ..PlaybackState::default()
            },
            settings_open: false,
            config,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub const fn settings_open(&self) -> bool {
        self.settings_open
    }

    #[must_use]
    pub const fn source(&self) -> &Arc<MediaSource> {
        &self.source
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub const fn element(&self) -> &M {
        &self.element
    }

    pub const fn element_mut(&mut self) -> &mut M {
        &mut self.element
    }

    pub fn dispatch(&mut self, message: Message) -> Result<(), PlayerError> {
        match message {
            Message::Command(command) => self.apply_command(command),
            Message::Media(event) => {
                self.apply_event(event);
                Ok(())
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<(), PlayerError> {
        self.dispatch(Message::Command(command))
    }

    /// 套用媒體元件與全螢幕累積的事件，回傳處理數量
    pub fn pump_events(&mut self) -> usize {
        let mut events = self.element.poll_events();
        if let Some(active) = self.fullscreen.poll_change() {
            events.push(MediaEvent::FullscreenChange(active));
        }
        let count = events.len();
        for event in events {
            self.apply_event(event);
        }
        count
    }

    /// 處理按鍵；回傳 true 代表已攔截（不再執行預設行為）
    pub fn handle_key(&mut self, key: KeyInput) -> Result<bool, PlayerError> {
        match shortcut(key, self.state.duration, self.config.keyboard_skip_seconds) {
            Some(command) => {
                self.execute(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 處理觸控點擊（`x` 為觸控位置，`width` 為畫面寬度）
    pub fn handle_touch(&mut self, x: f64, width: f64) -> Result<(), PlayerError> {
        self.execute(touch_command(x, width, self.config.button_skip_seconds))
    }

    fn apply_command(&mut self, command: Command) -> Result<(), PlayerError> {
        debug!("指令: {command:?}");
        match command {
            Command::TogglePlay => self.toggle_play(),
            Command::Seek(time) => self.seek(time),
            Command::Skip(delta) => self.seek(self.state.current_time + delta),
            Command::SetVolume(volume) => self.set_volume(volume),
            Command::ToggleMute => self.toggle_mute(),
            Command::SetPlaybackSpeed(speed) => self.set_playback_speed(speed),
            Command::ToggleFullscreen => return self.toggle_fullscreen(),
            Command::ToggleAutoplay => {
                self.state.is_autoplay_on_end = !self.state.is_autoplay_on_end;
            }
            Command::ToggleSettings => self.settings_open = !self.settings_open,
            Command::CloseSettings => self.settings_open = false,
        }
        Ok(())
    }

    fn apply_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(time) => self.state.current_time = self.clamp_time(time),
            MediaEvent::LoadedMetadata(duration) => {
                self.state.duration = (duration.is_finite() && duration >= 0.0).then_some(duration);
                self.state.current_time = self.clamp_time(self.state.current_time);
                info!("影片長度: {:?}", self.state.duration);
                self.metadata.publish(duration);
            }
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::FullscreenChange(active) => self.state.is_fullscreen = active,
        }
    }

    /// 先送出播放/暫停，再樂觀地翻轉狀態
    fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.element.pause();
        } else {
            self.element.play();
        }
        self.state.is_playing = !self.state.is_playing;
    }

    fn seek(&mut self, time: f64) {
        let time = self.clamp_time(time);
        self.element.set_current_time(time);
        self.state.current_time = time;
    }

    fn clamp_time(&self, time: f64) -> f64 {
        let time = if time.is_nan() { 0.0 } else { time };
        match self.state.duration {
            Some(duration) => time.clamp(0.0, duration),
            None if time.is_finite() => time.max(0.0),
            None => 0.0,
        }
    }

    fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        let muted = volume == 0.0;

        self.element.set_volume(volume);
        self.element.set_muted(muted);
        self.state.volume = volume;
        self.state.is_muted = muted;
    }

    /// 靜音保留原音量；取消靜音一律回到 1
    fn toggle_mute(&mut self) {
        let muted = !self.state.is_muted;
        self.element.set_muted(muted);

        if muted {
            self.element.set_volume(0.0);
        } else {
            self.element.set_volume(1.0);
            self.state.volume = 1.0;
        }
        self.state.is_muted = muted;
    }

    fn set_playback_speed(&mut self, speed: PlaybackSpeed) {
        self.element.set_playback_rate(speed.rate());
        self.state.playback_speed = speed;
        self.settings_open = false;
    }

    /// 狀態只在 FullscreenChange 事件到達時更新
    fn toggle_fullscreen(&mut self) -> Result<(), PlayerError> {
        let result = if self.state.is_fullscreen {
            self.fullscreen.exit_fullscreen()
        } else {
            self.fullscreen.request_fullscreen()
        };

        if let Err(e) = &result {
            warn!("{e}");
        }
        result
    }

    fn on_ended(&mut self) {
        self.state.is_playing = false;

        if self.state.is_autoplay_on_end {
            self.element.set_current_time(0.0);
            self.state.current_time = 0.0;
            self.element.play();
            self.state.is_playing = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeElement {
        playing: bool,
        position: f64,
        volume: f64,
        muted: bool,
        rate: f64,
        pending: Vec<MediaEvent>,
    }

    impl MediaElement for FakeElement {
        fn play(&mut self) {
            self.playing = true;
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn set_current_time(&mut self, seconds: f64) {
            self.position = seconds;
        }
        fn set_volume(&mut self, volume: f64) {
            self.volume = volume;
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn set_playback_rate(&mut self, rate: f64) {
            self.rate = rate;
        }
        fn poll_events(&mut self) -> Vec<MediaEvent> {
            std::mem::take(&mut self.pending)
        }
    }

    #[derive(Default)]
    struct FakeFullscreen {
        deny: bool,
        requests: usize,
        exits: usize,
        change: Option<bool>,
    }

    impl FullscreenHost for FakeFullscreen {
        fn request_fullscreen(&mut self) -> Result<(), PlayerError> {
            if self.deny {
                return Err(PlayerError::Fullscreen("permission denied".to_string()));
            }
            self.requests += 1;
            self.change = Some(true);
            Ok(())
        }
        fn exit_fullscreen(&mut self) -> Result<(), PlayerError> {
            self.exits += 1;
            self.change = Some(false);
            Ok(())
        }
        fn poll_change(&mut self) -> Option<bool> {
            self.change.take()
        }
    }

    fn controller(duration: Option<f64>) -> PlaybackController<FakeElement, FakeFullscreen> {
        let mut controller = PlaybackController::new(
            Arc::new(MediaSource::from_bytes("test.mp4", vec![0u8])),
            FakeElement::default(),
            FakeFullscreen::default(),
            Arc::new(MetadataGate::new()),
            ControllerConfig::default(),
        );
        if let Some(duration) = duration {
            controller
                .dispatch(Message::Media(MediaEvent::LoadedMetadata(duration)))
                .unwrap();
        }
        controller
    }

    #[test]
    fn test_toggle_play_flips_state_and_element() {
        let mut c = controller(Some(60.0));
        c.execute(Command::TogglePlay).unwrap();
        assert!(c.state().is_playing);
        assert!(c.element().playing);

        c.execute(Command::TogglePlay).unwrap();
        assert!(!c.state().is_playing);
        assert!(!c.element().playing);
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut c = controller(Some(60.0));
        for (input, expected) in [(-5.0, 0.0), (30.0, 30.0), (90.0, 60.0), (f64::NAN, 0.0)] {
            c.execute(Command::Seek(input)).unwrap();
            assert_eq!(c.state().current_time, expected);
            assert_eq!(c.element().position, expected);
        }
    }

    #[test]
    fn test_seek_before_metadata() {
        let mut c = controller(None);
        c.execute(Command::Seek(-3.0)).unwrap();
        assert_eq!(c.state().current_time, 0.0);
        c.execute(Command::Seek(12.0)).unwrap();
        assert_eq!(c.state().current_time, 12.0);
        c.execute(Command::Seek(f64::INFINITY)).unwrap();
        assert_eq!(c.state().current_time, 0.0);
    }

    #[test]
    fn test_skip_back_clamps_to_zero() {
        let mut c = controller(Some(60.0));
        c.execute(Command::Seek(5.0)).unwrap();
        c.execute(Command::Skip(-10.0)).unwrap();
        assert_eq!(c.state().current_time, 0.0);

        c.execute(Command::Seek(55.0)).unwrap();
        c.execute(Command::Skip(10.0)).unwrap();
        assert_eq!(c.state().current_time, 60.0);
    }

    #[test]
    fn test_set_volume_derives_mute() {
        let mut c = controller(Some(60.0));
        c.execute(Command::SetVolume(1.7)).unwrap();
        assert_eq!(c.state().volume, 1.0);
        assert!(!c.state().is_muted);

        c.execute(Command::SetVolume(0.0)).unwrap();
        assert!(c.state().is_muted);
        assert!(c.element().muted);

        c.execute(Command::SetVolume(0.4)).unwrap();
        assert!(!c.state().is_muted);
        assert!(!c.element().muted);
        assert_eq!(c.element().volume, 0.4);
    }

    #[test]
    fn test_mute_keeps_volume_and_unmute_restores_one() {
        let mut c = controller(Some(60.0));
        c.execute(Command::SetVolume(0.3)).unwrap();

        c.execute(Command::ToggleMute).unwrap();
        assert!(c.state().is_muted);
        assert_eq!(c.state().volume, 0.3);
        assert_eq!(c.state().effective_volume(), 0.0);
        assert_eq!(c.element().volume, 0.0);

        c.execute(Command::ToggleMute).unwrap();
        assert!(!c.state().is_muted);
        assert_eq!(c.state().volume, 1.0);
        assert_eq!(c.element().volume, 1.0);
    }

    #[test]
    fn test_speed_change_closes_settings() {
        let mut c = controller(Some(60.0));
        c.execute(Command::ToggleSettings).unwrap();
        assert!(c.settings_open());

        c.execute(Command::SetPlaybackSpeed(PlaybackSpeed::OneAndHalf))
            .unwrap();
        assert!(!c.settings_open());
        assert_eq!(c.state().playback_speed, PlaybackSpeed::OneAndHalf);
        assert_eq!(c.element().rate, 1.5);
    }

    #[test]
    fn test_fullscreen_waits_for_change_event() {
        let mut c = controller(Some(60.0));
        c.execute(Command::ToggleFullscreen).unwrap();
        assert!(!c.state().is_fullscreen);

        c.dispatch(Message::Media(MediaEvent::FullscreenChange(true)))
            .unwrap();
        assert!(c.state().is_fullscreen);

        c.execute(Command::ToggleFullscreen).unwrap();
        assert_eq!(c.fullscreen.exits, 1);
        assert_eq!(c.fullscreen.requests, 1);
    }

    #[test]
    fn test_fullscreen_change_arrives_through_pump() {
        let mut c = controller(Some(60.0));
        c.execute(Command::ToggleFullscreen).unwrap();
        assert!(!c.state().is_fullscreen);

        assert_eq!(c.pump_events(), 1);
        assert!(c.state().is_fullscreen);

        c.execute(Command::ToggleFullscreen).unwrap();
        c.pump_events();
        assert!(!c.state().is_fullscreen);
    }

    #[test]
    fn test_fullscreen_denied_leaves_state() {
        let mut c = controller(Some(60.0));
        c.fullscreen.deny = true;
        let before = c.state().clone();

        assert!(matches!(
            c.execute(Command::ToggleFullscreen),
            Err(PlayerError::Fullscreen(_))
        ));
        assert_eq!(*c.state(), before);
    }

    #[test]
    fn test_ended_with_autoplay_restarts() {
        let mut c = controller(Some(60.0));
        c.execute(Command::TogglePlay).unwrap();
        c.dispatch(Message::Media(MediaEvent::TimeUpdate(60.0)))
            .unwrap();

        c.dispatch(Message::Media(MediaEvent::Ended)).unwrap();
        assert!(c.state().is_playing);
        assert_eq!(c.state().current_time, 0.0);
        assert_eq!(c.element().position, 0.0);
        assert!(c.element().playing);
    }

    #[test]
    fn test_ended_without_autoplay_stops() {
        let mut c = controller(Some(60.0));
        c.execute(Command::ToggleAutoplay).unwrap();
        c.execute(Command::TogglePlay).unwrap();
        c.element_mut().pending.push(MediaEvent::TimeUpdate(60.0));
        c.element_mut().pending.push(MediaEvent::Ended);

        assert_eq!(c.pump_events(), 2);
        assert!(!c.state().is_playing);
        assert_eq!(c.state().current_time, 60.0);
    }

    #[test]
    fn test_time_update_respects_duration() {
        let mut c = controller(Some(30.0));
        c.dispatch(Message::Media(MediaEvent::TimeUpdate(31.5)))
            .unwrap();
        assert_eq!(c.state().current_time, 30.0);
    }

    #[test]
    fn test_metadata_publishes_duration() {
        let c = controller(Some(42.0));
        assert_eq!(c.metadata.duration(), Some(42.0));
        assert_eq!(c.state().duration, Some(42.0));

        let unknown = controller(Some(f64::NAN));
        assert_eq!(unknown.state().duration, None);
        assert!(unknown.metadata.duration().is_some_and(f64::is_nan));
    }

    #[test]
    fn test_digit_key_seeks() {
        let mut c = controller(Some(200.0));
        assert!(c.handle_key(KeyInput::Char('5')).unwrap());
        assert_eq!(c.state().current_time, 100.0);
        assert!(!c.handle_key(KeyInput::Char('z')).unwrap());
    }

    #[test]
    fn test_touch_zones_dispatch() {
        let mut c = controller(Some(60.0));
        c.execute(Command::Seek(30.0)).unwrap();
        c.handle_touch(10.0, 300.0).unwrap();
        assert_eq!(c.state().current_time, 20.0);
        c.handle_touch(150.0, 300.0).unwrap();
        assert!(c.state().is_playing);
    }
}
