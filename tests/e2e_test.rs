//! E2E Integration Tests
//!
//! 以 ffmpeg 產生測試影片，完整執行網格圖生成流程。
//! 找不到 ffmpeg/ffprobe 時跳過需要它們的測試。

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use video_grid_maker::cli::Cli;
use video_grid_maker::component::VideoGridGenerator;
use video_grid_maker::config::GridConfig;
use video_grid_maker::error::GridError;

fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success())
    })
}

fn generate_test_video(path: &Path, seconds: u32) -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size=160x90:rate=5:duration={seconds}"))
        .args(["-pix_fmt", "yuv420p", "-y"])
        .arg(path)
        .status()
        .is_ok_and(|status| status.success())
}

/// 測試完整流程：95 秒影片 => 0、30、60、90 秒四張畫面
#[test]
fn test_video_grid_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg/ffprobe");
        return;
    }

    let dir = TempDir::new().unwrap();
    let video_path = dir.path().join("video_95s.mp4");
    assert!(generate_test_video(&video_path, 95), "無法產生測試影片");

    let output_path = dir.path().join("grid.png");
    let config = GridConfig::with_defaults(&video_path, &output_path);
    let summary = VideoGridGenerator::new(config).run().unwrap();

    println!("網格圖摘要: {summary:?}");
    assert_eq!(summary.attempted, 4);
    assert_eq!(summary.captured, 4);
    assert_eq!(summary.stopped_at, None);
    assert_eq!((summary.columns, summary.rows), (5, 1));
    // 160x90 縮小一半後每格 80x45
    assert_eq!((summary.width, summary.height), (400, 45));

    let loaded = image::open(&output_path).unwrap().to_rgb8();
    assert_eq!(loaded.dimensions(), (400, 45));
    // 第 5 格沒有畫面
    assert_eq!(loaded.get_pixel(360, 20).0, [255, 255, 255]);
}

/// 測試短於取樣間隔的影片：只擷取 0 秒一張
#[test]
fn test_short_video_single_frame_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg/ffprobe");
        return;
    }

    let dir = TempDir::new().unwrap();
    let video_path = dir.path().join("video_10s.mp4");
    assert!(generate_test_video(&video_path, 10), "無法產生測試影片");

    let output_path = dir.path().join("grid.jpg");
    let mut config = GridConfig::with_defaults(&video_path, &output_path);
    config.grid_columns = 1;
    config.shrink_divisor = 1;
    let summary = VideoGridGenerator::new(config).run().unwrap();

    assert_eq!(summary.captured, 1);
    assert_eq!((summary.columns, summary.rows), (1, 1));
    assert_eq!((summary.width, summary.height), (160, 90));
    assert!(output_path.exists());
}

/// 測試無法解碼的檔案：回報錯誤且不建立輸出檔
#[test]
fn test_unreadable_video_e2e() {
    let dir = TempDir::new().unwrap();
    let video_path = dir.path().join("broken.mp4");
    fs::write(&video_path, b"this is not a video container").unwrap();

    let output_path = dir.path().join("grid.png");
    let config = GridConfig::with_defaults(&video_path, &output_path);
    let error = VideoGridGenerator::new(config).run().unwrap_err();

    assert!(matches!(
        error.downcast_ref::<GridError>(),
        Some(GridError::VideoOpen { .. })
    ));
    assert!(!output_path.exists());
}

/// 測試參數驗證在開啟影片之前完成
#[test]
fn test_argument_validation_e2e() {
    let dir = TempDir::new().unwrap();
    let video_path = dir.path().join("video.mp4");
    fs::write(&video_path, b"placeholder").unwrap();

    let cli = Cli {
        input: video_path.clone(),
        output: dir.path().join("grid.gif"),
        size: 20,
        width: 5,
        shrink: 2,
        font: None,
    };
    assert!(matches!(
        GridConfig::try_from(cli),
        Err(GridError::InputValidation(_))
    ));

    let cli = Cli {
        input: dir.path().join("missing.mp4"),
        output: dir.path().join("grid.png"),
        size: 20,
        width: 5,
        shrink: 2,
        font: None,
    };
    assert!(matches!(
        GridConfig::try_from(cli),
        Err(GridError::InputValidation(_))
    ));
}
