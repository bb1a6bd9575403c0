use std::path::{Path, PathBuf};

/// 固定的取樣間隔（秒）
pub const SAMPLE_INTERVAL_SECONDS: u64 = 30;

/// 網格圖單邊像素上限，超過時整體縮小
pub const MAX_GRID_DIMENSION: u32 = 65000;

pub const DEFAULT_FONT_SIZE: u32 = 20;

/// 字型大小上限；外框需逐一偏移繪製，過大的字型會讓標註失控
pub const MAX_FONT_SIZE: u32 = 1000;
pub const DEFAULT_GRID_COLUMNS: u32 = 5;

/// 加上時間戳記後每張畫面長寬各除以此倍率
pub const DEFAULT_SHRINK_DIVISOR: u32 = 2;

/// 輸出檔允許的副檔名（不分大小寫）
pub const SUPPORTED_OUTPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 已驗證的執行設定
///
/// 原本散落各處的常數（取樣間隔、尺寸上限）都集中在這裡，
/// 由流程的各階段以參數方式取用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub font_size: u32,
    pub grid_columns: u32,
    pub interval_seconds: u64,
    pub max_dimension: u32,
    pub shrink_divisor: u32,
    pub font_path: Option<PathBuf>,
}

impl GridConfig {
    /// 以預設值建立設定，不做任何驗證
    #[must_use]
    pub fn with_defaults(input_path: &Path, output_path: &Path) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            font_size: DEFAULT_FONT_SIZE,
            grid_columns: DEFAULT_GRID_COLUMNS,
            interval_seconds: SAMPLE_INTERVAL_SECONDS,
            max_dimension: MAX_GRID_DIMENSION,
            shrink_divisor: DEFAULT_SHRINK_DIVISOR,
            font_path: None,
        }
    }
}
