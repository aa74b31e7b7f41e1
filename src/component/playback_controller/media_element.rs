use crate::error::PlayerError;

/// 媒體元件發出的原生事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    TimeUpdate(f64),
    /// 長度無法判定時為 NaN
    LoadedMetadata(f64),
    Ended,
    FullscreenChange(bool),
}

/// 實際播放影片的媒體元件
///
/// 播放位置與長度以元件回報的事件為準
pub trait MediaElement {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f64);
    /// 取出自上次呼叫後累積的事件
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

/// 全螢幕切換；結果以 [`MediaEvent::FullscreenChange`] 非同步回報
pub trait FullscreenHost {
    fn request_fullscreen(&mut self) -> Result<(), PlayerError>;
    fn exit_fullscreen(&mut self) -> Result<(), PlayerError>;
    /// 取出尚未通知的全螢幕狀態變化
    fn poll_change(&mut self) -> Option<bool> {
        None
    }
}
