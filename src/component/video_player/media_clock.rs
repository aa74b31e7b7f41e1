use crate::component::playback_controller::{MediaElement, MediaEvent};
use log::debug;
use std::time::Instant;

/// 以時鐘模擬的媒體元件
///
/// 終端機無法顯示畫面，只依實際經過時間與播放速度推進位置。
/// 由呼叫端定期 [`advance`](Self::advance) 推進。
#[derive(Debug)]
pub struct MediaClock {
    duration: Option<f64>,
    position: f64,
    playing: bool,
    rate: f64,
    volume: f64,
    muted: bool,
    last_tick: Option<Instant>,
    pending: Vec<MediaEvent>,
}

impl MediaClock {
    /// 建立時即排入 metadata 事件（長度未知時為 NaN）
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        let duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
        Self {
            duration,
            position: 0.0,
            playing: false,
            rate: 1.0,
            volume: 1.0,
            muted: false,
            last_tick: None,
            pending: vec![MediaEvent::LoadedMetadata(duration.unwrap_or(f64::NAN))],
        }
    }

    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// 推進到 `now`；只累計播放中的時間
    pub fn advance(&mut self, now: Instant) {
        if !self.playing {
            return;
        }

        if let Some(previous) = self.last_tick {
            let elapsed = now.saturating_duration_since(previous).as_secs_f64();
            self.position += elapsed * self.rate;
        }
        self.last_tick = Some(now);

        match self.duration {
            Some(duration) if self.position >= duration => {
                self.position = duration;
                self.playing = false;
                self.last_tick = None;
                self.pending.push(MediaEvent::TimeUpdate(duration));
                self.pending.push(MediaEvent::Ended);
                debug!("播放結束");
            }
            _ => self.pending.push(MediaEvent::TimeUpdate(self.position)),
        }
    }
}

impl MediaElement for MediaClock {
    fn play(&mut self) {
        if let Some(duration) = self.duration
            && self.position >= duration
        {
            self.position = 0.0;
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    fn set_current_time(&mut self, seconds: f64) {
        let seconds = seconds.max(0.0);
        self.position = self.duration.map_or(seconds, |d| seconds.min(d));
        self.pending.push(MediaEvent::TimeUpdate(self.position));
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
