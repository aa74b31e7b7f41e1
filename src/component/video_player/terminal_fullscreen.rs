use crate::component::playback_controller::FullscreenHost;
use crate::error::PlayerError;
use console::Term;
use log::{debug, warn};

const ENTER_ALTERNATE_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALTERNATE_SCREEN: &str = "\x1b[?1049l";

/// 以終端機替代畫面模擬全螢幕
///
/// 切換成功後在下一次 [`poll_change`](FullscreenHost::poll_change) 回報
pub struct TerminalFullscreen {
    term: Term,
    active: bool,
    pending: Option<bool>,
}

impl TerminalFullscreen {
    #[must_use]
    pub fn new(term: Term) -> Self {
        Self {
            term,
            active: false,
            pending: None,
        }
    }

    fn switch(&mut self, active: bool) -> Result<(), PlayerError> {
        if !self.term.is_term() {
            return Err(PlayerError::Fullscreen("輸出不是終端機".to_string()));
        }

        let sequence = if active {
            ENTER_ALTERNATE_SCREEN
        } else {
            LEAVE_ALTERNATE_SCREEN
        };
        self.term
            .write_str(sequence)
            .map_err(|e| PlayerError::Fullscreen(e.to_string()))?;

        debug!("全螢幕: {active}");
        self.active = active;
        self.pending = Some(active);
        Ok(())
    }
}

impl FullscreenHost for TerminalFullscreen {
    fn request_fullscreen(&mut self) -> Result<(), PlayerError> {
        self.switch(true)
    }

    fn exit_fullscreen(&mut self) -> Result<(), PlayerError> {
        self.switch(false)
    }

    fn poll_change(&mut self) -> Option<bool> {
        self.pending.take()
    }
}

impl Drop for TerminalFullscreen {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = self.term.write_str(LEAVE_ALTERNATE_SCREEN)
        {
            warn!("無法離開全螢幕: {e}");
        }
    }
}
