//! 鍵盤快捷鍵
//!
//! | 按鍵 | 動作 |
//! |---|---|
//! | 空白鍵 / k | 播放 / 暫停 |
//! | f | 全螢幕 |
//! | m | 靜音 |
//! | ← / → | 倒退 / 快轉 |
//! | 0 - 9 | 跳到 n/10 的位置 |

use super::main::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    ArrowLeft,
    ArrowRight,
    Other,
}

/// 查表取得按鍵對應的指令（不分大小寫）
#[must_use]
pub fn shortcut(key: KeyInput, duration: Option<f64>, skip_seconds: f64) -> Option<Command> {
    match key {
        KeyInput::ArrowLeft => Some(Command::Skip(-skip_seconds)),
        KeyInput::ArrowRight => Some(Command::Skip(skip_seconds)),
        KeyInput::Char(c) => match c.to_ascii_lowercase() {
            ' ' | 'k' => Some(Command::TogglePlay),
            'f' => Some(Command::ToggleFullscreen),
            'm' => Some(Command::ToggleMute),
            digit @ '0'..='9' => {
                let tenth = f64::from(digit.to_digit(10).unwrap_or(0));
                Some(Command::Seek(duration.unwrap_or(0.0) * tenth / 10.0))
            }
            _ => None,
        },
        KeyInput::Other => None,
    }
}

/// 觸控區域：左三分之一倒退、右三分之一快轉、中間播放/暫停
#[must_use]
pub fn touch_command(x: f64, width: f64, skip_seconds: f64) -> Command {
    let third = width / 3.0;
    if x < third {
        Command::Skip(-skip_seconds)
    } else if x > third * 2.0 {
        Command::Skip(skip_seconds)
    } else {
        Command::TogglePlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_keys() {
        assert_eq!(shortcut(KeyInput::Char(' '), None, 5.0), Some(Command::TogglePlay));
        assert_eq!(shortcut(KeyInput::Char('K'), None, 5.0), Some(Command::TogglePlay));
        assert_eq!(shortcut(KeyInput::Char('f'), None, 5.0), Some(Command::ToggleFullscreen));
        assert_eq!(shortcut(KeyInput::Char('M'), None, 5.0), Some(Command::ToggleMute));
        assert_eq!(shortcut(KeyInput::ArrowLeft, None, 5.0), Some(Command::Skip(-5.0)));
        assert_eq!(shortcut(KeyInput::ArrowRight, None, 5.0), Some(Command::Skip(5.0)));
    }

    #[test]
    fn test_digit_seeks_to_tenths() {
        assert_eq!(
            shortcut(KeyInput::Char('5'), Some(200.0), 5.0),
            Some(Command::Seek(100.0))
        );
        assert_eq!(
            shortcut(KeyInput::Char('0'), Some(200.0), 5.0),
            Some(Command::Seek(0.0))
        );
        assert_eq!(
            shortcut(KeyInput::Char('9'), Some(200.0), 5.0),
            Some(Command::Seek(180.0))
        );
        assert_eq!(shortcut(KeyInput::Char('3'), None, 5.0), Some(Command::Seek(0.0)));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(shortcut(KeyInput::Char('x'), Some(10.0), 5.0), None);
        assert_eq!(shortcut(KeyInput::Other, Some(10.0), 5.0), None);
    }

    #[test]
    fn test_touch_zones() {
        assert_eq!(touch_command(10.0, 300.0, 10.0), Command::Skip(-10.0));
        assert_eq!(touch_command(150.0, 300.0, 10.0), Command::TogglePlay);
        assert_eq!(touch_command(290.0, 300.0, 10.0), Command::Skip(10.0));
    }
}
