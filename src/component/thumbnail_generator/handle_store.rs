use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 可撤銷的資源代號（影片與縮圖共用）
///
/// 不可複製：每個代號只能交還給 [`HandleStore::revoke`] 一次
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    id: u64,
    mime: &'static str,
}

impl ResourceHandle {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("blob:preview/{}", self.id)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:preview/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleEvent {
    Created(u64),
    Revoked(u64),
}

type Observer = Box<dyn Fn(HandleEvent) + Send + Sync>;

/// 圖片資源表：create 產生代號，revoke 釋放
#[derive(Default)]
pub struct HandleStore {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, Arc<[u8]>>>,
    observer: Mutex<Option<Observer>>,
}

impl HandleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, data: impl Into<Arc<[u8]>>, mime: &'static str) -> ResourceHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.entries).insert(id, data.into());
        self.notify(HandleEvent::Created(id));
        ResourceHandle { id, mime }
    }

    pub fn revoke(&self, handle: ResourceHandle) {
        let removed = lock(&self.entries).remove(&handle.id);
        if removed.is_none() {
            warn!("資源代號不存在或已撤銷: {handle}");
            return;
        }
        debug!("撤銷資源代號 {handle}");
        self.notify(HandleEvent::Revoked(handle.id));
    }

    #[must_use]
    pub fn resolve(&self, id: u64) -> Option<Arc<[u8]>> {
        lock(&self.entries).get(&id).cloned()
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        lock(&self.entries).len()
    }

    /// 設定資源建立/撤銷的觀察者
    pub fn set_observer(&self, observer: impl Fn(HandleEvent) + Send + Sync + 'static) {
        *lock(&self.observer) = Some(Box::new(observer));
    }

    fn notify(&self, event: HandleEvent) {
        if let Some(observer) = lock(&self.observer).as_ref() {
            observer(event);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resolve_revoke() {
        let store = HandleStore::new();
        let handle = store.create(vec![1u8, 2, 3], "image/jpeg");

        assert_eq!(handle.mime(), "image/jpeg");
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.resolve(handle.id()).as_deref(), Some(&[1u8, 2, 3][..]));

        let id = handle.id();
        store.revoke(handle);
        assert_eq!(store.live_count(), 0);
        assert!(store.resolve(id).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = HandleStore::new();
        let a = store.create(vec![0u8], "image/jpeg");
        let b = store.create(vec![0u8], "image/jpeg");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.url(), b.url());
        store.revoke(a);
        store.revoke(b);
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let store = HandleStore::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.set_observer(move |event| sink.lock().unwrap().push(event));

        let handle = store.create(vec![9u8], "image/jpeg");
        let id = handle.id();
        store.revoke(handle);

        assert_eq!(
            *events.lock().unwrap(),
            vec![HandleEvent::Created(id), HandleEvent::Revoked(id)]
        );
    }
}
