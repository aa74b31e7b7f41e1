use crate::component::playback_controller::KeyInput;
use console::Key;

/// 終端機按鍵對應的播放器動作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    Quit,
    /// 交給播放控制器的快捷鍵
    Shortcut(KeyInput),
    ToggleSettings,
    CloseSettings,
    ToggleAutoplay,
    /// 以按鈕秒數快轉（-1 倒退、1 前進）
    ButtonSkip(f64),
    VolumeStep(f64),
    /// 在進度條上移動預覽游標（欄數）
    MovePreview(isize),
    CommitPreview,
    LeavePreview,
    MoveSettingsCursor(isize),
    ApplySettingsCursor,
    /// 點一下畫面（畫面寬度的比例位置）
    Tap(f64),
    Ignore,
}

const VOLUME_STEP: f64 = 0.1;

/// z / x / c 對應畫面左、中、右三個區域
const TAP_ZONES: [(char, f64); 3] = [('z', 1.0 / 6.0), ('x', 0.5), ('c', 5.0 / 6.0)];

#[must_use]
pub fn map_key(key: &Key, settings_open: bool) -> PlayerAction {
    match key {
        Key::Char('q') => PlayerAction::Quit,
        Key::Escape if settings_open => PlayerAction::CloseSettings,
        Key::Escape => PlayerAction::Quit,
        Key::Char('s') => PlayerAction::ToggleSettings,
        Key::Char('a') => PlayerAction::ToggleAutoplay,
        Key::Char('j') => PlayerAction::ButtonSkip(-1.0),
        Key::Char('l') => PlayerAction::ButtonSkip(1.0),
        Key::Char('+' | '=') => PlayerAction::VolumeStep(VOLUME_STEP),
        Key::Char('-') => PlayerAction::VolumeStep(-VOLUME_STEP),
        Key::Char('[') => PlayerAction::MovePreview(-1),
        Key::Char(']') => PlayerAction::MovePreview(1),
        Key::Char('{') => PlayerAction::MovePreview(-5),
        Key::Char('}') => PlayerAction::MovePreview(5),
        Key::Backspace => PlayerAction::LeavePreview,
        Key::ArrowUp if settings_open => PlayerAction::MoveSettingsCursor(-1),
        Key::ArrowDown if settings_open => PlayerAction::MoveSettingsCursor(1),
        Key::ArrowUp => PlayerAction::VolumeStep(VOLUME_STEP),
        Key::ArrowDown => PlayerAction::VolumeStep(-VOLUME_STEP),
        Key::Enter if settings_open => PlayerAction::ApplySettingsCursor,
        Key::Enter => PlayerAction::CommitPreview,
        Key::ArrowLeft => PlayerAction::Shortcut(KeyInput::ArrowLeft),
        Key::ArrowRight => PlayerAction::Shortcut(KeyInput::ArrowRight),
        Key::Char(c) => TAP_ZONES
            .iter()
            .find(|(zone, _)| zone == c)
            .map_or(PlayerAction::Shortcut(KeyInput::Char(*c)), |(_, x)| {
                PlayerAction::Tap(*x)
            }),
        _ => PlayerAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_keys_go_to_controller() {
        assert_eq!(
            map_key(&Key::Char(' '), false),
            PlayerAction::Shortcut(KeyInput::Char(' '))
        );
        assert_eq!(
            map_key(&Key::ArrowLeft, false),
            PlayerAction::Shortcut(KeyInput::ArrowLeft)
        );
        assert_eq!(
            map_key(&Key::Char('m'), true),
            PlayerAction::Shortcut(KeyInput::Char('m'))
        );
    }

    #[test]
    fn test_settings_panel_navigation() {
        assert_eq!(map_key(&Key::ArrowDown, true), PlayerAction::MoveSettingsCursor(1));
        assert_eq!(map_key(&Key::Enter, true), PlayerAction::ApplySettingsCursor);
        assert_eq!(map_key(&Key::Escape, true), PlayerAction::CloseSettings);

        assert_eq!(map_key(&Key::ArrowDown, false), PlayerAction::VolumeStep(-0.1));
        assert_eq!(map_key(&Key::Enter, false), PlayerAction::CommitPreview);
        assert_eq!(map_key(&Key::Escape, false), PlayerAction::Quit);
    }

    #[test]
    fn test_tap_zone_keys() {
        assert_eq!(map_key(&Key::Char('z'), false), PlayerAction::Tap(1.0 / 6.0));
        assert_eq!(map_key(&Key::Char('x'), false), PlayerAction::Tap(0.5));
        assert_eq!(map_key(&Key::Char('c'), true), PlayerAction::Tap(5.0 / 6.0));
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(map_key(&Key::Tab, false), PlayerAction::Ignore);
        assert_eq!(map_key(&Key::Home, false), PlayerAction::Ignore);
    }
}
