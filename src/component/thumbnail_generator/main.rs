use super::handle_store::HandleStore;
use super::sampling_plan::{MAX_PREVIEW_FRAMES, SamplingPlan};
use super::session::{GenerationOutcome, GenerationSession, MetadataGate};
use super::thumbnail_set::{ThumbnailSet, ThumbnailSlot};
use crate::component::transcoding_engine::{EngineAdapter, TranscodingEngine};
use crate::config::UserSettings;
use crate::error::PlayerError;
use crate::tools::MediaSource;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/// 縮圖產生設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// 縮圖寬度（像素）
    pub thumbnail_width: u32,
    /// 影格數上限
    pub max_thumbnails: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 120,
            max_thumbnails: MAX_PREVIEW_FRAMES,
        }
    }
}

impl From<&UserSettings> for GeneratorConfig {
    fn from(settings: &UserSettings) -> Self {
        Self {
            thumbnail_width: settings.thumbnail_width,
            max_thumbnails: settings.max_thumbnails,
        }
    }
}

/// 預覽縮圖產生器
///
/// 每個播放器一個實例，同時最多只有一個產生流程。
/// 流程在背景執行緒跑，不會阻塞播放；引擎存取由轉接器序列化。
pub struct ThumbnailGenerator<E: TranscodingEngine + 'static> {
    adapter: Arc<EngineAdapter<E>>,
    store: Arc<HandleStore>,
    slot: Arc<ThumbnailSlot>,
    active: Mutex<Option<GenerationSession>>,
    next_session_id: AtomicU64,
    config: GeneratorConfig,
}

impl<E: TranscodingEngine + 'static> ThumbnailGenerator<E> {
    pub fn new(
        adapter: Arc<EngineAdapter<E>>,
        store: Arc<HandleStore>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            adapter,
            slot: Arc::new(ThumbnailSlot::new(Arc::clone(&store))),
            store,
            active: Mutex::new(None),
            next_session_id: AtomicU64::new(0),
            config,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<HandleStore> {
        &self.store
    }

    /// 目前已提交的縮圖組
    #[must_use]
    pub fn thumbnails(&self) -> Arc<ThumbnailSet> {
        self.slot.current()
    }

    #[must_use]
    pub fn active_session(&self) -> Option<GenerationSession> {
        self.active().clone()
    }

    /// 開始產生縮圖
    ///
    /// 已有進行中且未取消的流程時直接回傳該流程，不會重新開始
    pub fn generate(
        &self,
        source: Arc<MediaSource>,
        metadata: Arc<MetadataGate>,
    ) -> GenerationSession {
        let mut active = self.active();

        if let Some(session) = active.as_ref()
            && !session.is_finished()
            && !session.is_cancelled()
        {
            debug!("縮圖產生流程 #{} 進行中，沿用", session.id());
            return session.clone();
        }

        // 已取消但尚未結束的流程：新流程要等它收尾後才能使用引擎
        let previous = active.take().filter(|s| !s.is_finished());
        let id = self.next_session_id.fetch_add(1, Ordering::SeqCst) + 1;
        let session = GenerationSession::new(id);
        *active = Some(session.clone());
        drop(active);

        let run = GenerationRun {
            adapter: Arc::clone(&self.adapter),
            store: Arc::clone(&self.store),
            slot: Arc::clone(&self.slot),
            config: self.config,
            source,
            metadata,
            session: session.clone(),
            previous,
        };

        let spawned = thread::Builder::new()
            .name(format!("thumbnail-generator-{id}"))
            .spawn(move || run.execute());

        if let Err(e) = spawned {
            error!("無法啟動縮圖產生執行緒: {e}");
            session.finish(GenerationOutcome::Failed(e.to_string()));
        }

        session
    }

    /// 取消進行中的流程（例如來源已更換）
    pub fn cancel(&self) {
        if let Some(session) = self.active().as_ref()
            && !session.is_finished()
        {
            info!("取消縮圖產生流程 #{}", session.id());
            session.cancel();
        }
    }

    /// 播放器關閉：取消流程並撤銷所有縮圖
    pub fn shutdown(&self) {
        self.cancel();
        self.slot.clear();
    }

    fn active(&self) -> MutexGuard<'_, Option<GenerationSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: TranscodingEngine + 'static> Drop for ThumbnailGenerator<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 單次產生流程（在背景執行緒中執行）
struct GenerationRun<E: TranscodingEngine> {
    adapter: Arc<EngineAdapter<E>>,
    store: Arc<HandleStore>,
    slot: Arc<ThumbnailSlot>,
    config: GeneratorConfig,
    source: Arc<MediaSource>,
    metadata: Arc<MetadataGate>,
    session: GenerationSession,
    previous: Option<GenerationSession>,
}

impl<E: TranscodingEngine> GenerationRun<E> {
    fn execute(self) {
        let outcome = self.run();

        match &outcome {
            GenerationOutcome::Completed {
                frames,
                placeholders,
            } => info!(
                "預覽縮圖已建立 #{}: {} 張（替代圖 {} 張）",
                self.session.id(),
                frames,
                placeholders
            ),
            GenerationOutcome::Skipped => info!("影片長度不足，略過預覽縮圖"),
            GenerationOutcome::Cancelled => info!("縮圖產生流程 #{} 已取消", self.session.id()),
            GenerationOutcome::Failed(message) => {
                error!("縮圖產生失敗 #{}: {message}", self.session.id());
                self.slot.clear();
            }
        }

        self.session.finish(outcome);
    }

    fn run(&self) -> GenerationOutcome {
        if let Some(previous) = &self.previous {
            debug!("等待流程 #{} 結束", previous.id());
            previous.wait();
        }
        if self.session.is_cancelled() {
            return GenerationOutcome::Cancelled;
        }

        if let Err(e) = self.adapter.ensure_ready() {
            return GenerationOutcome::Failed(PlayerError::EngineLoad(e).to_string());
        }
        if self.session.is_cancelled() {
            return GenerationOutcome::Cancelled;
        }

        let Some(duration) = self.metadata.wait(self.session.cancellation_token()) else {
            return GenerationOutcome::Cancelled;
        };

        let plan = SamplingPlan::with_limit(duration, self.config.max_thumbnails);
        info!(
            "產生 {} 張預覽影格: {} (間隔 {}s)",
            plan.frame_count,
            self.source.name(),
            plan.interval_seconds
        );

        if plan.is_empty() {
            self.commit(ThumbnailSet::new(Arc::clone(&self.store)));
            return GenerationOutcome::Skipped;
        }
        self.session.set_planned(plan.frame_count);

        // 來源檔寫入引擎前最後一次確認
        if self.session.is_cancelled() {
            return GenerationOutcome::Cancelled;
        }

        let data = match self.source.materialize() {
            Ok(data) => data,
            Err(e) => return GenerationOutcome::Failed(format!("無法讀取來源影片: {e}")),
        };

        let staged = match self.adapter.stage_source(&data, duration) {
            Ok(staged) => staged,
            Err(e) => return GenerationOutcome::Failed(e.to_string()),
        };

        // 中途取消時 set 直接丟棄，已產生的代號隨之撤銷
        let mut set = ThumbnailSet::new(Arc::clone(&self.store));
        for (index, offset) in plan.offsets().enumerate() {
            if self.session.is_cancelled() {
                break;
            }

            match staged.extract_frame(index, offset, self.config.thumbnail_width) {
                Ok(image) => {
                    debug!("影格 {index} @ {offset}s: {} bytes", image.len());
                    set.push_frame(offset, image);
                }
                Err(source) => {
                    warn!("{}", PlayerError::FrameExtraction { index, source });
                    set.push_placeholder(offset);
                }
            }
            self.session.advance();
        }

        if let Err(e) = staged.release() {
            warn!("無法刪除引擎中的來源檔: {e}");
        }

        if self.session.is_cancelled() {
            return GenerationOutcome::Cancelled;
        }

        let outcome = GenerationOutcome::Completed {
            frames: set.len(),
            placeholders: set.placeholder_count(),
        };
        self.commit(set);
        outcome
    }

    /// 先換上新組，再釋放舊組
    fn commit(&self, set: ThumbnailSet) {
        let previous = self.slot.replace(set);
        drop(previous);
    }
}
