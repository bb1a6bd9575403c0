use crate::config::{DEFAULT_FONT_SIZE, DEFAULT_GRID_COLUMNS, DEFAULT_SHRINK_DIVISOR};
use clap::Parser;
use std::path::PathBuf;

/// 命令列參數
///
/// 數值參數以 `i64` 接收，非正數由 `GridConfig` 驗證後以結束碼 1 回報，
/// 不交給 clap 的結束碼 2。
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "每 30 秒擷取一張影片畫面，加上時間戳記後合成為網格圖"
)]
pub struct Cli {
    /// 輸入影片路徑（例如 video.mp4）
    #[arg(short = 'i', long = "input", value_name = "VIDEO")]
    pub input: PathBuf,

    /// 輸出網格圖路徑（.jpg、.jpeg 或 .png）
    #[arg(short = 'o', long = "output", value_name = "IMAGE")]
    pub output: PathBuf,

    /// 時間戳記字型大小
    #[arg(
        short = 's',
        long = "size",
        default_value_t = i64::from(DEFAULT_FONT_SIZE),
        allow_negative_numbers = true
    )]
    pub size: i64,

    /// 網格欄數
    #[arg(
        short = 'w',
        long = "width",
        default_value_t = i64::from(DEFAULT_GRID_COLUMNS),
        allow_negative_numbers = true
    )]
    pub width: i64,

    /// 每張畫面加上時間戳記後的縮小倍率（1 表示不縮小）
    #[arg(
        long,
        default_value_t = i64::from(DEFAULT_SHRINK_DIVISOR),
        allow_negative_numbers = true
    )]
    pub shrink: i64,

    /// 優先使用的 TrueType 字型檔
    #[arg(long, value_name = "TTF", env = "VIDEO_GRID_FONT")]
    pub font: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["video_grid_maker", "-i", "a.mp4", "-o", "grid.jpg"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("a.mp4"));
        assert_eq!(cli.output, PathBuf::from("grid.jpg"));
        assert_eq!(cli.size, i64::from(DEFAULT_FONT_SIZE));
        assert_eq!(cli.width, i64::from(DEFAULT_GRID_COLUMNS));
        assert_eq!(cli.shrink, i64::from(DEFAULT_SHRINK_DIVISOR));
        assert_eq!((cli.size, cli.width, cli.shrink), (20, 5, 2));
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::try_parse_from([
            "video_grid_maker",
            "--input",
            "a.mp4",
            "--output",
            "grid.png",
            "--size",
            "-3",
            "-w",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.size, -3);
        assert_eq!(cli.width, 0);
    }

    #[test]
    fn test_missing_output_is_rejected() {
        assert!(Cli::try_parse_from(["video_grid_maker", "-i", "a.mp4"]).is_err());
    }
}
