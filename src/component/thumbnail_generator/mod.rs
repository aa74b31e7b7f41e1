//! 預覽縮圖產生元件
//!
//! 流程：
//! A. 等待影片長度（metadata）
//! B. 計算取樣計畫
//! C. 來源影片寫入引擎一次
//! D. 依序擷取每張影格，失敗的影格以替代圖補上
//! E. 換上新縮圖組後撤銷舊組

mod handle_store;
mod main;
mod sampling_plan;
mod session;
mod thumbnail_set;

pub use handle_store::{HandleEvent, HandleStore, ResourceHandle};
pub use main::{GeneratorConfig, ThumbnailGenerator};
pub use sampling_plan::{MAX_PREVIEW_FRAMES, SamplingPlan};
pub use session::{CancellationToken, GenerationOutcome, GenerationSession, MetadataGate};
pub use thumbnail_set::{PLACEHOLDER_URL, Thumbnail, ThumbnailSet, ThumbnailSlot};
