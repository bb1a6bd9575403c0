use crate::error::GridError;
use crate::tools::ffprobe_info::{VideoInfo, get_video_info};
use image::RgbImage;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 擷取到的畫面與其取樣時間點（秒）
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    pub timestamp: u64,
}

/// 可依時間點讀取畫面的來源
///
/// 回傳 `None` 代表該位置已無可解碼的畫面，呼叫端應視為串流結束。
pub trait FrameSource {
    fn seek_and_read(&mut self, timestamp_seconds: u64) -> Option<Frame>;
}

/// 影片的幀率與總幀數，兩者皆為正數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    pub frame_rate: f64,
    pub frame_count: u64,
}

impl VideoMetadata {
    /// 從 ffprobe 資訊建立；容器未提供總幀數時以 `round(長度 × 幀率)` 推算
    pub fn from_info(info: &VideoInfo) -> Result<Self, GridError> {
        let frame_rate = info
            .frame_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| GridError::Metadata(format!("幀率無效: {:?}", info.frame_rate)))?;

        let frame_count = info
            .frame_count
            .or_else(|| {
                info.duration_seconds
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .map(|d| (d * frame_rate).round() as u64)
            })
            .filter(|count| *count > 0)
            .ok_or_else(|| GridError::Metadata("總幀數無效或無法取得".to_string()))?;

        Ok(Self {
            frame_rate,
            frame_count,
        })
    }

    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.frame_rate
    }
}

/// 開啟中的影片解碼工作階段
///
/// 以 ffprobe 驗證可解碼，每次 `seek_and_read` 交給 ffmpeg 解出單張 RGB 畫面。
/// `close` 會消耗 handle；提早返回時由 `Drop` 負責釋放，確保只釋放一次。
#[derive(Debug)]
pub struct VideoHandle {
    path: PathBuf,
    info: VideoInfo,
    released: bool,
}

impl VideoHandle {
    pub fn open(path: &Path) -> Result<Self, GridError> {
        if !path.is_file() {
            return Err(GridError::VideoOpen {
                path: path.to_path_buf(),
                reason: "檔案不存在".to_string(),
            });
        }

        let info = get_video_info(path).map_err(|e| GridError::VideoOpen {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

        debug!(
            "已開啟影片 {}: {}x{}",
            path.display(),
            info.width,
            info.height
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
            released: false,
        })
    }

    pub fn metadata(&self) -> Result<VideoMetadata, GridError> {
        VideoMetadata::from_info(&self.info)
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            debug!("已釋放影片: {}", self.path.display());
        }
    }

    fn decode_frame(&self, timestamp_seconds: u64) -> Result<RgbImage, String> {
        let output = build_decode_command(&self.path, timestamp_seconds)
            .output()
            .map_err(|e| format!("無法執行 ffmpeg: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("ffmpeg 解碼失敗: {}", stderr.trim()));
        }

        let (width, height) = self.dimensions();
        let expected = width as usize * height as usize * 3;
        if output.stdout.len() != expected {
            return Err(format!(
                "畫面資料長度不符: 預期 {expected} bytes，收到 {}",
                output.stdout.len()
            ));
        }

        RgbImage::from_raw(width, height, output.stdout)
            .ok_or_else(|| "無法建立 RGB 畫面".to_string())
    }
}

/// 建立解碼單一畫面的 ffmpeg 指令，輸出 rgb24 原始資料到 stdout
///
/// `-ss` 在 `-i` 前：快速跳轉，再精準解碼到目標時間點。
/// `-noautorotate` 與 `-map 0:v:0` 讓輸出的寬高與串流和 ffprobe 量測的一致。
#[must_use]
pub fn build_decode_command(path: &Path, timestamp_seconds: u64) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-noautorotate"])
        .args(["-ss", &timestamp_seconds.to_string()])
        .arg("-i")
        .arg(path)
        .args([
            "-map", "0:v:0",
            "-frames:v", "1",
            "-an", "-sn", "-dn",
            "-f", "rawvideo",
            "-pix_fmt", "rgb24",
            "pipe:1",
        ]);
    cmd
}

impl FrameSource for VideoHandle {
    fn seek_and_read(&mut self, timestamp_seconds: u64) -> Option<Frame> {
        match self.decode_frame(timestamp_seconds) {
            Ok(image) => Some(Frame {
                image,
                timestamp: timestamp_seconds,
            }),
            Err(reason) => {
                debug!("{timestamp_seconds} 秒處無法解碼畫面: {reason}");
                None
            }
        }
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        self.release();
    }
}
