use crate::component::playback_controller::{PlaybackSpeed, PlaybackState};
use crate::tools::format_time;
use console::style;
use rust_i18n::t;

/// 滑過進度條時的預覽標籤
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLabel {
    pub fraction: f64,
    pub time: f64,
    /// 縮圖 URL（產生中或無縮圖時為 None）
    pub image: Option<String>,
}

/// 控制列繪製所需的狀態快照
#[derive(Debug, Clone)]
pub struct OverlayView<'a> {
    pub state: &'a PlaybackState,
    pub settings_open: bool,
    /// 設定面板中游標所在的速度
    pub settings_cursor: PlaybackSpeed,
    pub preview: Option<PreviewLabel>,
    /// 縮圖產生進度 (完成, 總數)
    pub generation: Option<(usize, usize)>,
    pub notice: Option<&'a str>,
    pub bar_width: usize,
}

/// 繪製控制列，每個元素一行
#[must_use]
pub fn render_overlay(view: &OverlayView<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(preview) = &view.preview {
        lines.push(preview_line(preview, view.bar_width));
    }
    lines.push(progress_bar(
        view.state.played_fraction(),
        view.preview.as_ref().map(|p| p.fraction),
        view.bar_width,
    ));
    lines.push(transport_line(view.state));

    if view.settings_open {
        lines.extend(settings_panel(view.state.playback_speed, view.settings_cursor));
    }

    if let Some((done, total)) = view.generation {
        lines.push(
            style(t!("player.generating", done = done, total = total))
                .dim()
                .to_string(),
        );
    }

    if let Some(notice) = view.notice {
        lines.push(style(notice).yellow().to_string());
    }

    lines
}

fn column(fraction: f64, width: usize) -> usize {
    ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width.saturating_sub(1))
}

fn preview_line(preview: &PreviewLabel, width: usize) -> String {
    let label = match &preview.image {
        Some(image) => format!("[{}] {image}", format_time(preview.time)),
        None => format!("[{}]", format_time(preview.time)),
    };
    let indent = column(preview.fraction, width).min(width.saturating_sub(label.chars().count()));
    format!("{}{}", " ".repeat(indent), style(label).cyan())
}

fn progress_bar(played: f64, hover: Option<f64>, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let head = column(played, width);
    let hover = hover.map(|f| column(f, width));

    (0..width)
        .map(|i| {
            if Some(i) == hover {
                style("┃").cyan().to_string()
            } else if i == head {
                style("●").red().bold().to_string()
            } else if i < head {
                style("━").red().to_string()
            } else {
                style("─").dim().to_string()
            }
        })
        .collect()
}

fn transport_line(state: &PlaybackState) -> String {
    let play = if state.is_playing { "❚❚" } else { "▶" };
    let volume = state.effective_volume();
    let speaker = if volume == 0.0 { "🔇" } else { "🔊" };
    let duration = state.duration.unwrap_or(0.0);
    let autoplay = if state.is_autoplay_on_end {
        style(t!("player.autoplay")).green().to_string()
    } else {
        style(t!("player.autoplay")).dim().to_string()
    };
    let fullscreen = if state.is_fullscreen { "⛶ ✕" } else { "⛶" };

    format!(
        "{}  ⏪ ⏩  {} {:>3}%  {} / {}    {}  ⚙ {}  {}",
        style(play).bold(),
        speaker,
        (volume * 100.0).round() as u32,
        format_time(state.current_time),
        format_time(duration),
        autoplay,
        state.playback_speed,
        fullscreen,
    )
}

fn settings_panel(current: PlaybackSpeed, cursor: PlaybackSpeed) -> Vec<String> {
    let mut lines = vec![style(t!("player.speed_title")).bold().to_string()];
    for speed in PlaybackSpeed::ALL {
        let marker = if speed == cursor { "›" } else { " " };
        let label = format!("{marker} {speed}");
        lines.push(if speed == current {
            style(label).cyan().bold().to_string()
        } else {
            label
        });
    }
    lines
}
