pub mod video_grid;

pub use video_grid::{GridSummary, VideoGridGenerator};
