use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 等待中止訊號時的輪詢間隔
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 協作式取消旗標，只在影格之間檢查
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 影片長度是否已知
///
/// 播放控制器收到 metadata 事件後發布長度，產生流程在此等待
#[derive(Debug, Default)]
pub struct MetadataGate {
    duration: Mutex<Option<f64>>,
    published: Condvar,
}

impl MetadataGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 發布影片長度；無法判定的長度以 NaN 表示
    pub fn publish(&self, duration: f64) {
        *lock(&self.duration) = Some(duration);
        self.published.notify_all();
    }

    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        *lock(&self.duration)
    }

    /// 等到長度發布為止；取消時回傳 None
    pub fn wait(&self, cancel: &CancellationToken) -> Option<f64> {
        let mut duration = lock(&self.duration);
        loop {
            if let Some(value) = *duration {
                return Some(value);
            }
            if cancel.is_cancelled() {
                return None;
            }
            duration = self
                .published
                .wait_timeout(duration, CANCEL_POLL_INTERVAL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// 一次產生流程的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed { frames: usize, placeholders: usize },
    /// 影片太短或長度未知，沒有需要擷取的影格
    Skipped,
    Cancelled,
    Failed(String),
}

#[derive(Debug, Default)]
struct SessionState {
    outcome: Option<GenerationOutcome>,
    frames_done: usize,
    frames_planned: usize,
}

#[derive(Debug)]
struct SessionInner {
    id: u64,
    cancel: CancellationToken,
    state: Mutex<SessionState>,
    finished: Condvar,
}

/// 進行中的縮圖產生流程
///
/// 可複製的共享代號：重複呼叫 generate 會拿到同一個 session
#[derive(Debug, Clone)]
pub struct GenerationSession {
    inner: Arc<SessionInner>,
}

impl GenerationSession {
    pub(super) fn new(id: u64) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id,
                cancel: CancellationToken::new(),
                state: Mutex::new(SessionState::default()),
                finished: Condvar::new(),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn cancel(&self) {
        self.inner.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state().outcome.is_some()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GenerationOutcome> {
        self.state().outcome.clone()
    }

    /// (已完成影格數, 計畫影格數)
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let state = self.state();
        (state.frames_done, state.frames_planned)
    }

    /// 阻塞直到流程結束
    pub fn wait(&self) -> GenerationOutcome {
        let mut state = self.state();
        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }
            state = self
                .inner
                .finished
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Option<GenerationOutcome> {
        let state = self.state();
        let (state, _) = self
            .inner
            .finished
            .wait_timeout_while(state, timeout, |s| s.outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.outcome.clone()
    }

    pub(super) fn set_planned(&self, frames: usize) {
        self.state().frames_planned = frames;
    }

    pub(super) fn advance(&self) {
        self.state().frames_done += 1;
    }

    pub(super) fn finish(&self, outcome: GenerationOutcome) {
        self.state().outcome = Some(outcome);
        self.inner.finished.notify_all();
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.inner.state)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_gate_wait_returns_published_duration() {
        let gate = Arc::new(MetadataGate::new());
        let publisher = Arc::clone(&gate);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            publisher.publish(42.0);
        });

        assert_eq!(gate.wait(&CancellationToken::new()), Some(42.0));
        handle.join().unwrap();
    }

    #[test]
    fn test_gate_wait_stops_on_cancel() {
        let gate = MetadataGate::new();
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        assert_eq!(gate.wait(&token), None);
        handle.join().unwrap();
    }

    #[test]
    fn test_session_wait_and_progress() {
        let session = GenerationSession::new(7);
        let worker = session.clone();
        assert!(worker.same_session(&session));

        let handle = thread::spawn(move || {
            worker.set_planned(2);
            worker.advance();
            worker.advance();
            worker.finish(GenerationOutcome::Completed {
                frames: 2,
                placeholders: 0,
            });
        });

        assert_eq!(
            session.wait(),
            GenerationOutcome::Completed {
                frames: 2,
                placeholders: 0
            }
        );
        handle.join().unwrap();
        assert_eq!(session.progress(), (2, 2));
        assert!(session.is_finished());
        assert_eq!(session.id(), 7);
    }

    #[test]
    fn test_wait_timeout_on_running_session() {
        let session = GenerationSession::new(1);
        assert_eq!(session.wait_timeout(Duration::from_millis(10)), None);
        session.cancel();
        assert!(session.is_cancelled());
        assert!(!session.is_finished());
    }
}
