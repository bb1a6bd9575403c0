use crate::tools::{Frame, FrameSource};
use log::warn;

/// 取樣結果
#[derive(Debug)]
pub struct SampleOutcome {
    /// 依時間點排序的畫面
    pub frames: Vec<Frame>,
    /// 實際呼叫 `seek_and_read` 的次數
    pub attempted: usize,
    /// 讀取失敗而提前停止的時間點
    pub stopped_at: Option<u64>,
}

/// 最多取樣幾次：`floor(duration / interval) + 1`
#[must_use]
pub fn max_sample_count(duration_seconds: f64, interval_seconds: u64) -> u64 {
    if interval_seconds == 0 || !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }
    (duration_seconds / interval_seconds as f64).floor() as u64 + 1
}

/// 取樣時間點 `0, interval, 2*interval, ...`，只保留小於影片長度者
pub fn sample_timestamps(
    duration_seconds: f64,
    interval_seconds: u64,
) -> impl Iterator<Item = u64> {
    (0..max_sample_count(duration_seconds, interval_seconds))
        .map(move |i| i * interval_seconds)
        .take_while(move |&t| (t as f64) < duration_seconds)
}

/// 依序在每個時間點讀取一張畫面
///
/// 任一時間點讀取失敗即停止，之後的時間點不再嘗試；已取得的畫面照常回傳。
pub fn capture_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    duration_seconds: f64,
    interval_seconds: u64,
    mut on_capture: impl FnMut(&Frame),
) -> SampleOutcome {
    let mut frames = Vec::new();
    let mut attempted = 0;
    let mut stopped_at = None;

    for timestamp in sample_timestamps(duration_seconds, interval_seconds) {
        attempted += 1;
        match source.seek_and_read(timestamp) {
            Some(frame) => {
                on_capture(&frame);
                frames.push(frame);
            }
            None => {
                warn!("無法讀取 {timestamp} 秒處的畫面，停止擷取");
                stopped_at = Some(timestamp);
                break;
            }
        }
    }

    SampleOutcome {
        frames,
        attempted,
        stopped_at,
    }
}
