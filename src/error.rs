use std::path::PathBuf;
use thiserror::Error;

/// 網格圖生成流程中的致命錯誤
///
/// 畫面讀取失敗不在此列：`seek_and_read` 回傳 `None` 代表串流結束，
/// 由取樣器自行停止並發出警告。
#[derive(Error, Debug)]
pub enum GridError {
    #[error("參數驗證失敗: {0}")]
    InputValidation(String),

    #[error("無法開啟影片 {}: {reason}", .path.display())]
    VideoOpen { path: PathBuf, reason: String },

    #[error("影片資訊無效: {0}")]
    Metadata(String),

    #[error("無法載入字型: {0}")]
    Font(String),

    #[error("沒有擷取到任何畫面，未建立網格圖")]
    EmptyInput,

    #[error("網格圖尺寸過大，無法配置畫布: {width}x{height}")]
    CanvasTooLarge { width: u64, height: u64 },

    #[error("無法寫入網格圖 {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
