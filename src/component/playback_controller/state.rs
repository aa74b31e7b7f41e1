use std::fmt;

/// 可選的播放速度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackSpeed {
    Quarter,
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    OneAndThreeQuarters,
    Double,
}

impl PlaybackSpeed {
    pub const ALL: [Self; 8] = [
        Self::Quarter,
        Self::Half,
        Self::ThreeQuarters,
        Self::Normal,
        Self::OneAndQuarter,
        Self::OneAndHalf,
        Self::OneAndThreeQuarters,
        Self::Double,
    ];

    #[must_use]
    pub const fn rate(self) -> f64 {
        match self {
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Normal => 1.0,
            Self::OneAndQuarter => 1.25,
            Self::OneAndHalf => 1.5,
            Self::OneAndThreeQuarters => 1.75,
            Self::Double => 2.0,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|speed| *speed == self)
            .unwrap_or(3)
    }

    /// 下一檔（已是最快則不變）
    #[must_use]
    pub fn faster(self) -> Self {
        Self::ALL.get(self.index() + 1).copied().unwrap_or(self)
    }

    /// 上一檔（已是最慢則不變）
    #[must_use]
    pub fn slower(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(self)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            other => write!(f, "{}x", other.rate()),
        }
    }
}

/// 播放狀態，只由播放控制器修改
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    /// 尚未取得 metadata 或長度無法判定時為 None
    pub duration: Option<f64>,
    /// 使用者選擇的音量，靜音時保留不清除
    pub volume: f64,
    pub is_muted: bool,
    pub playback_speed: PlaybackSpeed,
    pub is_fullscreen: bool,
    pub is_autoplay_on_end: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            is_muted: false,
            playback_speed: PlaybackSpeed::Normal,
            is_fullscreen: false,
            is_autoplay_on_end: true,
        }
    }
}

impl PlaybackState {
    /// 實際輸出音量：靜音時一律為 0
    #[must_use]
    pub fn effective_volume(&self) -> f64 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    /// 已播放比例，長度未知時為 0
    #[must_use]
    pub fn played_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.current_time / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_labels() {
        assert_eq!(PlaybackSpeed::Normal.to_string(), "Normal");
        assert_eq!(PlaybackSpeed::OneAndHalf.to_string(), "1.5x");
        assert_eq!(PlaybackSpeed::Quarter.to_string(), "0.25x");
        assert_eq!(PlaybackSpeed::Double.to_string(), "2x");
    }

    #[test]
    fn test_speed_steps_saturate() {
        assert_eq!(PlaybackSpeed::Normal.faster(), PlaybackSpeed::OneAndQuarter);
        assert_eq!(PlaybackSpeed::Double.faster(), PlaybackSpeed::Double);
        assert_eq!(PlaybackSpeed::Quarter.slower(), PlaybackSpeed::Quarter);
        assert_eq!(PlaybackSpeed::Half.slower(), PlaybackSpeed::Quarter);
    }

    #[test]
    fn test_effective_volume_when_muted() {
        let state = PlaybackState {
            volume: 0.6,
            is_muted: true,
            ..PlaybackState::default()
        };
        assert_eq!(state.effective_volume(), 0.0);
        assert_eq!(state.volume, 0.6);
    }

    #[test]
    fn test_played_fraction() {
        let mut state = PlaybackState::default();
        assert_eq!(state.played_fraction(), 0.0);
        state.duration = Some(200.0);
        state.current_time = 50.0;
        assert_eq!(state.played_fraction(), 0.25);
    }
}
