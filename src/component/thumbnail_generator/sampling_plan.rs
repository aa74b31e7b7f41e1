//! 預覽影格取樣計畫
//!
//! 影格數 = floor(max(0.25 × 長度, min(0.5 × 長度, 上限)))，
//! 間隔 = floor(長度 / 影格數)

/// 預設預覽影格上限
pub const MAX_PREVIEW_FRAMES: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    pub frame_count: usize,
    pub interval_seconds: f64,
}

impl SamplingPlan {
    pub const EMPTY: Self = Self {
        frame_count: 0,
        interval_seconds: 0.0,
    };

    #[must_use]
    pub fn for_duration(duration: f64) -> Self {
        Self::with_limit(duration, MAX_PREVIEW_FRAMES)
    }

    /// 長度未知（NaN、無限大）或不為正數時不取樣
    #[must_use]
    pub fn with_limit(duration: f64, limit: usize) -> Self {
        if !duration.is_finite() || duration <= 0.0 || limit == 0 {
            return Self::EMPTY;
        }

        let frame_count = (0.25 * duration)
            .max((0.5 * duration).min(limit as f64))
            .floor() as usize;

        if frame_count == 0 {
            return Self::EMPTY;
        }

        Self {
            frame_count,
            interval_seconds: (duration / frame_count as f64).floor(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// 第 i 張影格的時間點 = i × 間隔
    pub fn offsets(&self) -> impl Iterator<Item = f64> + use<> {
        let interval = self.interval_seconds;
        (0..self.frame_count).map(move |i| i as f64 * interval)
    }
}
