use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// ffprobe 回報的第一條視訊串流資訊
///
/// 幀率與總幀數可能缺漏或為 0，是否可用由 `VideoHandle::metadata` 判斷。
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub duration_seconds: Option<f64>,
    pub frame_rate: Option<f64>,
    pub frame_count: Option<u64>,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
    nb_frames: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_output(&stdout).with_context(|| format!("無法解析影片資訊: {}", path.display()))
}

fn parse_ffprobe_output(json: &str) -> Result<VideoInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).with_context(|| "無法解析 ffprobe 輸出")?;

    // 找到視訊串流
    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    let width = video_stream
        .width
        .ok_or_else(|| anyhow!("無法取得影片寬度"))?;
    let height = video_stream
        .height
        .ok_or_else(|| anyhow!("無法取得影片高度"))?;

    // 影片長度優先從 format，其次從 stream
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    let frame_rate = guess_frame_rate(
        video_stream.r_frame_rate.as_deref().and_then(parse_frame_rate),
        video_stream.avg_frame_rate.as_deref().and_then(parse_frame_rate),
    );

    let frame_count = video_stream
        .nb_frames
        .as_ref()
        .and_then(|n| n.parse::<u64>().ok());

    Ok(VideoInfo {
        width,
        height,
        duration_seconds,
        frame_rate,
        frame_count,
    })
}

/// 依 ffmpeg 的規則在 `r_frame_rate` 與 `avg_frame_rate` 之間選擇
///
/// 可變幀率的檔案常回報極高的 `r_frame_rate`（例如 1000/1 的時間基準），
/// 當它超過 210 而平均幀率低於 70 時改用平均幀率。
fn guess_frame_rate(real: Option<f64>, average: Option<f64>) -> Option<f64> {
    let real = real.filter(|r| *r > 0.0);
    let average = average.filter(|a| *a > 0.0);
    match (real, average) {
        (Some(r), Some(a)) if r > 210.0 && a < 70.0 => Some(a),
        (Some(r), _) => Some(r),
        (None, a) => a,
    }
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
