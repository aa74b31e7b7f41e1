use crate::component::VideoPlayer;
use crate::config::save::save_settings;
use crate::config::{Config, Language, UserSettings};
use crate::menu::handlers::{run_play_file, run_play_folder, run_recent};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;

pub fn show_main_menu(term: &Term, player: &VideoPlayer, config: &mut Config) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_play_file"),
        t!("main_menu.opt_play_folder"),
        t!("main_menu.opt_recent"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_play_file(term, player, config)?;
            Ok(true)
        }
        Some(1) => {
            run_play_folder(term, player, config)?;
            Ok(true)
        }
        Some(2) => {
            run_recent(term, player, config)?;
            Ok(true)
        }
        Some(3) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(_) | None => Ok(false),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let autoplay = if config.settings.autoplay_on_end {
            t!("settings.on")
        } else {
            t!("settings.off")
        };
        let options = vec![
            format!("{}: {}", t!("settings.opt_language"), config.settings.language),
            format!("{}: {autoplay}", t!("settings.opt_autoplay")),
            format!(
                "{}: {}px",
                t!("settings.opt_thumbnail_width"),
                config.settings.thumbnail_width
            ),
            format!(
                "{}: {}ms",
                t!("settings.opt_hide_delay"),
                config.settings.controls_hide_delay_ms
            ),
            t!("settings.back").to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_language_menu(term, config)?,
            Some(1) => {
                config.settings.autoplay_on_end = !config.settings.autoplay_on_end;
                save_settings(&config.settings)?;
            }
            Some(2) => {
                let width: u32 = Input::new()
                    .with_prompt(t!("settings.thumbnail_width_prompt"))
                    .default(config.settings.thumbnail_width)
                    .validate_with(|w: &u32| {
                        if (16..=1920).contains(w) {
                            Ok(())
                        } else {
                            Err(t!("settings.thumbnail_width_range").to_string())
                        }
                    })
                    .interact_text()?;
                update_setting(config, |s| s.thumbnail_width = width)?;
            }
            Some(3) => {
                let delay: u64 = Input::new()
                    .with_prompt(t!("settings.hide_delay_prompt"))
                    .default(config.settings.controls_hide_delay_ms)
                    .interact_text()?;
                update_setting(config, |s| s.controls_hide_delay_ms = delay)?;
            }
            Some(_) | None => break,
        }
    }

    Ok(())
}

fn update_setting(
    config: &mut Config,
    update: impl FnOnce(&mut UserSettings),
) -> Result<()> {
    let before = config.settings.clone();
    update(&mut config.settings);

    if config.settings != before {
        save_settings(&config.settings)?;
        println!("\n{}", style(t!("settings.saved")).green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];
    let items: Vec<String> = languages.iter().map(Language::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!(
            "\n{} {}",
            style(t!("settings.saved")).green(),
            selected_lang
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
