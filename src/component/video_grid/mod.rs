//! 影片網格圖生成元件
//!
//! 四階段流程：
//! A. 開啟影片並讀取幀率與總幀數（ffprobe）
//! B. 每 30 秒擷取一張畫面（ffmpeg），讀取失敗即停止
//! C. 在右下角加上時間戳記
//! D. 排成固定欄數的網格圖並寫出

mod frame_sampler;
mod grid_composer;
mod main;
mod timestamp_annotator;

pub use frame_sampler::{SampleOutcome, capture_frames, max_sample_count, sample_timestamps};
pub use grid_composer::{ComposedGrid, GridLayout, compose_grid, save_grid, shrink_frame};
pub use main::{GridSummary, VideoGridGenerator};
pub use timestamp_annotator::{TextMetrics, TimestampAnnotator, format_timestamp};
