use super::input::map_key;
use super::media_clock::MediaClock;
use super::session::PlayerSession;
use super::terminal_fullscreen::TerminalFullscreen;
use crate::component::playback_controller::{FullscreenHost, MediaElement};
use crate::component::thumbnail_generator::{GeneratorConfig, HandleStore, ThumbnailGenerator};
use crate::component::transcoding_engine::{EngineAdapter, FfmpegEngine, TranscodingEngine};
use crate::config::Config;
use crate::error::PlayerError;
use crate::tools::{MediaSource, get_video_info, validate_video_file};
use anyhow::{Context, Result};
use console::{Key, Term, style};
use log::{debug, info, warn};
use rust_i18n::t;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(100);
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 120;

type TerminalSession = PlayerSession<FfmpegEngine, MediaClock, TerminalFullscreen>;

/// 終端機影片播放器
///
/// 整個程式共用同一個轉碼引擎；每次播放建立新的工作階段
pub struct VideoPlayer {
    adapter: Arc<EngineAdapter<FfmpegEngine>>,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoPlayer {
    #[must_use]
    pub fn new(config: &Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        let engine = FfmpegEngine::new(config.settings.ffmpeg_path.clone());
        Self {
            adapter: Arc::new(EngineAdapter::new(engine)),
            shutdown_signal,
        }
    }

    /// 播放單一影片，直到使用者離開或收到中斷訊號
    pub fn play(&self, path: &Path, config: &Config) -> Result<()> {
        validate_video_file(path, &config.file_type_table)?;

        let info = get_video_info(&config.settings.ffprobe_path, path).map_err(|e| {
            warn!("無法讀取影片資訊 {}: {e:#}", path.display());
            PlayerError::InvalidFile(path.to_path_buf())
        })?;
        info!(
            "播放 {} ({}x{}, {:?}s)",
            path.display(),
            info.width,
            info.height,
            info.duration_seconds
        );

        let source = MediaSource::load_file(path)
            .with_context(|| format!("無法讀取影片檔案: {}", path.display()))?;
        let title = source.name();

        let generator = ThumbnailGenerator::new(
            Arc::clone(&self.adapter),
            Arc::new(HandleStore::new()),
            GeneratorConfig::from(&config.settings),
        );

        let term = Term::stdout();
        let mut session = PlayerSession::open(
            Arc::new(source),
            MediaClock::new(info.duration_seconds),
            TerminalFullscreen::new(term.clone()),
            generator,
            &config.settings,
        )?;

        term.hide_cursor()?;
        term.clear_screen()?;
        let result = self.run_loop(&term, &mut session, &title);
        drop(session);

        term.show_cursor()?;
        term.clear_screen()?;
        result
    }

    fn run_loop(&self, term: &Term, session: &mut TerminalSession, title: &str) -> Result<()> {
        drive_session(
            session,
            &self.shutdown_signal,
            || term.read_key(),
            |session: &mut TerminalSession, now| {
                session.controller_mut().element_mut().advance(now);
                session.tick(now);
                draw(term, session, title)
            },
        )
    }
}

/// 播放迴圈
///
/// 按鍵在呼叫端執行緒讀取，迴圈結束後不會再有人讀終端機；
/// 畫面由背景執行緒每 100ms 更新一次，兩者共用同一把鎖
pub fn drive_session<E, M, F, K, R>(
    session: &mut PlayerSession<E, M, F>,
    shutdown_signal: &AtomicBool,
    mut read_key: K,
    refresh: R,
) -> Result<()>
where
    E: TranscodingEngine + 'static,
    M: MediaElement + Send,
    F: FullscreenHost + Send,
    K: FnMut() -> io::Result<Key>,
    R: Fn(&mut PlayerSession<E, M, F>, Instant) -> Result<()> + Sync,
{
    let session = Mutex::new(session);
    let stopped = AtomicBool::new(false);

    thread::scope(|scope| {
        let ticker = thread::Builder::new()
            .name("player-tick".to_string())
            .spawn_scoped(scope, || {
                while !stopped.load(Ordering::SeqCst) && !shutdown_signal.load(Ordering::SeqCst) {
                    let refreshed = {
                        let mut guard = lock(&session);
                        refresh(&mut **guard, Instant::now())
                    };
                    if let Err(e) = refreshed {
                        warn!("無法更新播放畫面: {e:#}");
                        break;
                    }
                    thread::sleep(TICK);
                }
            })
            .context("無法啟動畫面更新執行緒")?;

        let result = read_keys(&session, shutdown_signal, &mut read_key, &refresh);

        stopped.store(true, Ordering::SeqCst);
        if ticker.join().is_err() {
            warn!("畫面更新執行緒異常結束");
        }
        result
    })
}

fn read_keys<E, M, F, K, R>(
    session: &Mutex<&mut PlayerSession<E, M, F>>,
    shutdown_signal: &AtomicBool,
    read_key: &mut K,
    refresh: &R,
) -> Result<()>
where
    E: TranscodingEngine + 'static,
    M: MediaElement,
    F: FullscreenHost,
    K: FnMut() -> io::Result<Key>,
    R: Fn(&mut PlayerSession<E, M, F>, Instant) -> Result<()>,
{
    loop {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止播放");
            return Ok(());
        }

        let key = match read_key() {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                info!("播放被中斷");
                return Ok(());
            }
            Err(e) => return Err(e).context("無法讀取鍵盤輸入"),
        };

        let mut guard = lock(session);
        let action = map_key(&key, guard.controller().settings_open());
        debug!("按鍵 {key:?} → {action:?}");
        let now = Instant::now();
        if !guard.apply(action, now) {
            return Ok(());
        }
        refresh(&mut **guard, now)?;
    }
}

fn lock<'a, 'b, T>(mutex: &'a Mutex<&'b mut T>) -> MutexGuard<'a, &'b mut T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn draw(term: &Term, session: &mut TerminalSession, title: &str) -> Result<()> {
    let (_, columns) = term.size();
    let bar_width = usize::from(columns)
        .saturating_sub(2)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
    session.set_bar_width(bar_width);

    let mut lines = vec![
        style(title).bold().to_string(),
        style(t!("player.hint")).dim().to_string(),
        String::new(),
    ];
    lines.extend(session.render());

    term.move_cursor_to(0, 0)?;
    for line in lines {
        term.clear_line()?;
        term.write_line(&line)?;
    }
    term.clear_to_end_of_screen()?;
    Ok(())
}
