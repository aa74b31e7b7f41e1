use std::time::{Duration, Instant};

/// 控制列閒置多久後隱藏
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_secs(3);

/// 控制列自動隱藏計時器
///
/// 指標移動時顯示並重新計時；設定面板開啟時不隱藏
#[derive(Debug, Clone)]
pub struct AutoHideTimer {
    hide_delay: Duration,
    last_activity: Option<Instant>,
    visible: bool,
}

impl Default for AutoHideTimer {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_DELAY)
    }
}

impl AutoHideTimer {
    #[must_use]
    pub const fn new(hide_delay: Duration) -> Self {
        Self {
            hide_delay,
            last_activity: None,
            visible: true,
        }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    pub const fn pointer_moved(&mut self, now: Instant) {
        self.visible = true;
        self.last_activity = Some(now);
    }

    pub const fn pointer_left(&mut self, settings_open: bool) {
        self.last_activity = None;
        if !settings_open {
            self.visible = false;
        }
    }

    /// 推進計時，回傳目前是否顯示
    pub fn tick(&mut self, now: Instant, settings_open: bool) -> bool {
        if let Some(last) = self.last_activity
            && now.saturating_duration_since(last) >= self.hide_delay
        {
            self.last_activity = None;
            if !settings_open {
                self.visible = false;
            }
        }
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hides_after_delay() {
        let start = Instant::now();
        let mut timer = AutoHideTimer::new(Duration::from_secs(3));
        timer.pointer_moved(start);

        assert!(timer.tick(start + Duration::from_secs(2), false));
        assert!(!timer.tick(start + Duration::from_secs(3), false));
    }

    #[test]
    fn test_movement_restarts_timer() {
        let start = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.pointer_moved(start);
        timer.pointer_moved(start + Duration::from_secs(2));

        assert!(timer.tick(start + Duration::from_secs(4), false));
        assert!(!timer.tick(start + Duration::from_secs(5), false));

        timer.pointer_moved(start + Duration::from_secs(6));
        assert!(timer.is_visible());
    }

    #[test]
    fn test_settings_open_keeps_visible() {
        let start = Instant::now();
        let mut timer = AutoHideTimer::default();
        timer.pointer_moved(start);

        assert!(timer.tick(start + Duration::from_secs(10), true));

        timer.pointer_left(true);
        assert!(timer.is_visible());
    }

    #[test]
    fn test_pointer_leave_hides() {
        let mut timer = AutoHideTimer::default();
        timer.pointer_moved(Instant::now());
        timer.pointer_left(false);
        assert!(!timer.is_visible());
    }
}
