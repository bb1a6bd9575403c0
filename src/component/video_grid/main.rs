use super::frame_sampler::{SampleOutcome, capture_frames, sample_timestamps};
use super::grid_composer::{compose_grid, save_grid, shrink_frame};
use super::timestamp_annotator::{TimestampAnnotator, format_timestamp};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::tools::{
    FontResolution, TextFont, VideoHandle, preferred_font_candidates, resolve_font,
};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::path::PathBuf;

/// 網格圖生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSummary {
    pub output_path: PathBuf,
    pub captured: usize,
    pub attempted: usize,
    pub stopped_at: Option<u64>,
    pub columns: u32,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
    pub scale_divisor: Option<u32>,
    pub used_fallback_font: bool,
}

/// 影片開啟期間完成的工作：取樣畫面與載入字型
struct CaptureStage {
    outcome: SampleOutcome,
    font: TextFont,
    used_fallback_font: bool,
}

/// 印出階段標記後立即送出，讓耗時的階段在執行中就顯示出來
fn begin_stage(out: &mut impl Write, marker: &str, label: &str) -> io::Result<()> {
    write!(out, "  {} {label}...", style(marker).dim())?;
    out.flush()
}

/// 影片網格圖生成器
///
/// 單一直線流程：開啟 → 讀取資訊 → 取樣 → 釋放 → 標註 → 合成 → 寫出。
/// 任何階段失敗都會先釋放影片再回傳錯誤，網格圖只在完整合成後才寫出。
pub struct VideoGridGenerator {
    config: GridConfig,
}

impl VideoGridGenerator {
    #[must_use]
    pub const fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<GridSummary> {
        println!("{}", style("=== 影片網格圖生成 ===").cyan().bold());

        let mut handle = VideoHandle::open(&self.config.input_path)?;
        let capture_result = self.capture_stage(&mut handle);
        handle.close();
        let CaptureStage {
            outcome,
            font,
            used_fallback_font,
        } = capture_result?;

        println!(
            "  {} 擷取 {} 張畫面（嘗試 {} 次）",
            style("B").dim(),
            outcome.frames.len(),
            outcome.attempted
        );
        info!("共擷取 {} 張畫面", outcome.frames.len());

        if outcome.frames.is_empty() {
            return Err(GridError::EmptyInput.into());
        }

        // Stage C: 標註時間戳記
        let _ = begin_stage(&mut io::stdout(), "C", "加上時間戳記");
        let annotator = TimestampAnnotator::new(font, self.config.font_size);
        debug!("文字排版: {:?}", annotator.metrics());
        let mut frames = outcome.frames;
        let captured = frames.len();
        for frame in &mut frames {
            annotator.annotate(frame);
            shrink_frame(frame, self.config.shrink_divisor);
        }
        println!(" 完成");

        // Stage D: 合成並寫出
        let _ = begin_stage(&mut io::stdout(), "D", "合成網格圖");
        let grid = compose_grid(frames, self.config.grid_columns, self.config.max_dimension)?;
        save_grid(&grid.image, &self.config.output_path)?;
        println!(" 完成");

        let summary = GridSummary {
            output_path: self.config.output_path.clone(),
            captured,
            attempted: outcome.attempted,
            stopped_at: outcome.stopped_at,
            columns: grid.layout.columns,
            rows: grid.layout.rows,
            width: grid.image.width(),
            height: grid.image.height(),
            scale_divisor: grid.scale_divisor,
            used_fallback_font,
        };

        self.print_summary(&summary);

        Ok(summary)
    }

    fn capture_stage(&self, handle: &mut VideoHandle) -> Result<CaptureStage> {
        // Stage A: 影片資訊
        let metadata = handle.metadata()?;
        let duration = metadata.duration_seconds();
        let (width, height) = handle.dimensions();
        println!(
            "  {} 影片資訊: {width}x{height}, {:.2} fps, {} 幀, {:.1}s",
            style("A").dim(),
            metadata.frame_rate,
            metadata.frame_count,
            duration
        );

        let (font, used_fallback_font) = self.load_font()?;

        // Stage B: 取樣
        let interval = self.config.interval_seconds;
        let expected = sample_timestamps(duration, interval).count();
        let progress_bar = ProgressBar::new(expected as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("無效的進度條樣式")?
                .progress_chars("#>-"),
        );

        let outcome = capture_frames(handle, duration, interval, |frame| {
            let label = format_timestamp(frame.timestamp);
            debug!("已擷取 {label}（{} 秒）", frame.timestamp);
            progress_bar.set_message(label);
            progress_bar.inc(1);
        });
        progress_bar.finish_and_clear();

        if let Some(timestamp) = outcome.stopped_at {
            println!(
                "  {} 無法讀取 {} 的畫面，已停止擷取",
                style("!").yellow(),
                format_timestamp(timestamp)
            );
        }

        Ok(CaptureStage {
            outcome,
            font,
            used_fallback_font,
        })
    }

    fn load_font(&self) -> Result<(TextFont, bool), GridError> {
        let candidates = preferred_font_candidates(self.config.font_path.as_deref());
        match resolve_font(self.config.font_size, &candidates) {
            FontResolution::Preferred { font, source } => {
                debug!("使用字型: {}", source.display());
                Ok((font, false))
            }
            FontResolution::Fallback { font, reason } => {
                warn!("找不到 TrueType 字型，改用內建字型: {reason}");
                println!(
                    "  {} 找不到 TrueType 字型，改用內建字型",
                    style("!").yellow()
                );
                Ok((font, true))
            }
            FontResolution::Unavailable { reason } => Err(GridError::Font(reason)),
        }
    }

    fn print_summary(&self, summary: &GridSummary) {
        println!();
        println!("{}", style("=== 網格圖生成摘要 ===").cyan().bold());
        println!("  輸出: {}", summary.output_path.display());
        println!("  畫面: {} 張", style(summary.captured).green());
        println!(
            "  網格: {} 欄 x {} 列 ({}x{})",
            summary.columns, summary.rows, summary.width, summary.height
        );

        if let Some(divisor) = summary.scale_divisor {
            println!("  縮小: {}", style(format!("1/{divisor}")).yellow());
        }

        info!(
            "網格圖已儲存: {}，{} 欄 x {} 列",
            self.config.output_path.display(),
            summary.columns,
            summary.rows
        );
    }
}
