use super::handle_store::{HandleStore, ResourceHandle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 擷取失敗時顯示的替代圖
pub const PLACEHOLDER_URL: &str = "/placeholder-preview.jpg";

const JPEG_MIME: &str = "image/jpeg";

/// 單張預覽縮圖
#[derive(Debug)]
pub enum Thumbnail {
    Frame { offset: f64, handle: ResourceHandle },
    Placeholder { offset: f64 },
}

impl Thumbnail {
    #[must_use]
    pub const fn offset(&self) -> f64 {
        match self {
            Self::Frame { offset, .. } | Self::Placeholder { offset } => *offset,
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Frame { handle, .. } => handle.url(),
            Self::Placeholder { .. } => PLACEHOLDER_URL.to_string(),
        }
    }
}

/// 一組依時間排序的預覽縮圖
///
/// 擁有所有圖片代號，釋放時全部撤銷
pub struct ThumbnailSet {
    entries: Vec<Thumbnail>,
    store: Arc<HandleStore>,
}

impl ThumbnailSet {
    #[must_use]
    pub const fn new(store: Arc<HandleStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    pub fn push_frame(&mut self, offset: f64, image: Vec<u8>) {
        let handle = self.store.create(image, JPEG_MIME);
        self.entries.push(Thumbnail::Frame { offset, handle });
    }

    pub fn push_placeholder(&mut self, offset: f64) {
        self.entries.push(Thumbnail::Placeholder { offset });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Thumbnail> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thumbnail> {
        self.entries.iter()
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.entries.iter().filter(|t| t.is_placeholder()).count()
    }
}

impl Drop for ThumbnailSet {
    fn drop(&mut self) {
        for entry in self.entries.drain(..) {
            if let Thumbnail::Frame { handle, .. } = entry {
                self.store.revoke(handle);
            }
        }
    }
}

/// 目前顯示中的縮圖組
///
/// 換上新組後才釋放舊組；讀取端持有的舊組在最後一個參照消失時才撤銷
pub struct ThumbnailSlot {
    current: Mutex<Arc<ThumbnailSet>>,
    store: Arc<HandleStore>,
}

impl ThumbnailSlot {
    #[must_use]
    pub fn new(store: Arc<HandleStore>) -> Self {
        Self {
            current: Mutex::new(Arc::new(ThumbnailSet::new(Arc::clone(&store)))),
            store,
        }
    }

    #[must_use]
    pub fn current(&self) -> Arc<ThumbnailSet> {
        Arc::clone(&self.lock())
    }

    /// 換上新的縮圖組並回傳舊組（鎖已釋放）
    pub fn replace(&self, set: ThumbnailSet) -> Arc<ThumbnailSet> {
        std::mem::replace(&mut *self.lock(), Arc::new(set))
    }

    pub fn clear(&self) {
        let previous = self.replace(ThumbnailSet::new(Arc::clone(&self.store)));
        drop(previous);
    }

    fn lock(&self) -> MutexGuard<'_, Arc<ThumbnailSet>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
