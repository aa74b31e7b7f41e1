use super::engine::{TranscodingEngine, frame_extraction_args};
use crate::error::EngineError;
use log::{debug, info, warn};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// 來源影片在虛擬檔案系統中的檔名
pub const SOURCE_FILE_NAME: &str = "input.mp4";

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

/// 轉碼引擎轉接器
///
/// 第一次 [`ensure_ready`](Self::ensure_ready) 負責載入引擎，
/// 載入期間的其他呼叫者等待同一次載入結果；載入失敗會一直保持失敗。
pub struct EngineAdapter<E: TranscodingEngine> {
    state: Mutex<LoadState>,
    state_changed: Condvar,
    engine: Mutex<E>,
    /// 同一時間只有一份來源影片在引擎中
    staging: Mutex<()>,
}

impl<E: TranscodingEngine> EngineAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            state: Mutex::new(LoadState::Uninitialized),
            state_changed: Condvar::new(),
            engine: Mutex::new(engine),
            staging: Mutex::new(()),
        }
    }

    pub fn ensure_ready(&self) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        loop {
            match state.clone() {
                LoadState::Ready => return Ok(()),
                LoadState::Failed(message) => return Err(EngineError::Load(message)),
                LoadState::Loading => {
                    state = self
                        .state_changed
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                LoadState::Uninitialized => {
                    *state = LoadState::Loading;
                    drop(state);
                    return self.load_engine();
                }
            }
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *lock(&self.state) == LoadState::Ready
    }

    fn load_engine(&self) -> Result<(), EngineError> {
        debug!("載入轉碼引擎");
        let result = self.engine().load().map_err(|e| match e {
            EngineError::Load(message) => EngineError::Load(message),
            other => EngineError::Load(other.to_string()),
        });

        let mut state = lock(&self.state);
        *state = match &result {
            Ok(()) => LoadState::Ready,
            Err(e) => {
                warn!("轉碼引擎載入失敗: {e}");
                LoadState::Failed(e.to_string())
            }
        };
        self.state_changed.notify_all();
        result
    }

    fn engine(&self) -> MutexGuard<'_, E> {
        lock(&self.engine)
    }

    /// 將來源影片寫入引擎，回傳的守衛釋放時會刪除來源檔
    ///
    /// 其他流程的來源檔仍在引擎中時，會等到它釋放
    pub fn stage_source(
        &self,
        data: &[u8],
        duration: f64,
    ) -> Result<StagedSource<'_, E>, EngineError> {
        if !self.is_ready() {
            return Err(EngineError::NotReady);
        }

        let exclusive = lock(&self.staging);

        self.engine().write_file(SOURCE_FILE_NAME, data)?;
        info!("來源影片已寫入引擎 ({} bytes)", data.len());

        Ok(StagedSource {
            adapter: self,
            duration,
            released: false,
            _exclusive: exclusive,
        })
    }
}

/// 已寫入引擎的來源影片
pub struct StagedSource<'a, E: TranscodingEngine> {
    adapter: &'a EngineAdapter<E>,
    duration: f64,
    released: bool,
    _exclusive: MutexGuard<'a, ()>,
}

impl<E: TranscodingEngine> StagedSource<'_, E> {
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// 擷取 `offset` 秒處的影格並回傳圖片內容
    ///
    /// 本影格的輸出檔在回傳前一定會被刪除；不做任何重試
    pub fn extract_frame(
        &self,
        index: usize,
        offset: f64,
        width: u32,
    ) -> Result<Vec<u8>, EngineError> {
        if !self.adapter.is_ready() {
            return Err(EngineError::NotReady);
        }
        if !offset.is_finite() || offset < 0.0 || offset > self.duration {
            return Err(EngineError::OffsetOutOfRange {
                offset,
                duration: self.duration,
            });
        }

        let output = format!("frame{index}.jpg");
        let args = frame_extraction_args(SOURCE_FILE_NAME, offset, width, &output);

        let mut engine = self.adapter.engine();
        let result = engine
            .exec(&args)
            .and_then(|()| engine.read_file(&output));

        // 失敗時輸出檔可能根本不存在
        if let Err(e) = engine.delete_file(&output) {
            debug!("刪除影格輸出 {output} 失敗: {e}");
        }

        result
    }

    /// 刪除引擎中的來源檔
    pub fn release(mut self) -> Result<(), EngineError> {
        self.released = true;
        self.adapter.engine().delete_file(SOURCE_FILE_NAME)
    }
}

impl<E: TranscodingEngine> Drop for StagedSource<'_, E> {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.adapter.engine().delete_file(SOURCE_FILE_NAME)
        {
            warn!("無法刪除引擎中的來源檔: {e}");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
