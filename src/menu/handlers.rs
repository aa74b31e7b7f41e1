use crate::component::VideoPlayer;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::pause;
use crate::tools::{scan_video_files, validate_directory_exists};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};

pub fn run_play_file(term: &Term, player: &VideoPlayer, config: &mut Config) -> Result<()> {
    let path: String = Input::new()
        .with_prompt(t!("play.file_prompt"))
        .interact_text()?;

    play_and_report(term, player, config, Path::new(path.trim()))
}

pub fn run_play_folder(term: &Term, player: &VideoPlayer, config: &mut Config) -> Result<()> {
    let input: String = Input::new()
        .with_prompt(t!("play.folder_prompt"))
        .interact_text()?;
    let dir = PathBuf::from(input.trim());

    if let Err(e) = validate_directory_exists(&dir) {
        eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
        pause(term)?;
        return Ok(());
    }

    println!("{}", style(t!("play.scanning")).dim());
    let videos = scan_video_files(&dir, &config.file_type_table)?;
    if videos.is_empty() {
        println!("{}", style(t!("play.no_videos")).yellow());
        pause(term)?;
        return Ok(());
    }

    let items: Vec<String> = videos
        .iter()
        .map(|video| {
            format!(
                "{} ({:.2} MB)",
                video.path.strip_prefix(&dir).unwrap_or(&video.path).display(),
                video.size as f64 / 1024.0 / 1024.0
            )
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("play.select_video", count = videos.len()))
        .items(&items)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(index) => play_and_report(term, player, config, &videos[index].path),
        None => Ok(()),
    }
}

pub fn run_recent(term: &Term, player: &VideoPlayer, config: &mut Config) -> Result<()> {
    if config.settings.recent_paths.is_empty() {
        println!("{}", style(t!("play.no_recent")).yellow());
        pause(term)?;
        return Ok(());
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("play.recent_prompt"))
        .items(&config.settings.recent_paths)
        .default(0)
        .interact_on_opt(term)?;

    let Some(index) = selection else {
        return Ok(());
    };
    let path = PathBuf::from(&config.settings.recent_paths[index]);
    play_and_report(term, player, config, &path)
}

/// 播放並記錄到最近清單；播放錯誤只顯示不中止選單
fn play_and_report(
    term: &Term,
    player: &VideoPlayer,
    config: &mut Config,
    path: &Path,
) -> Result<()> {
    match player.play(path, config) {
        Ok(()) => {
            add_recent_path(&mut config.settings, &path.to_string_lossy());
            if let Err(e) = save_settings(&config.settings) {
                warn!("無法儲存最近開啟清單: {e:#}");
            }
        }
        Err(e) => {
            warn!("播放失敗 {}: {e:#}", path.display());
            eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
            pause(term)?;
        }
    }
    Ok(())
}
