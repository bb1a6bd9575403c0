use crate::error::GridError;
use crate::tools::Frame;
use image::imageops::{self, FilterType};
use image::{ImageError, ImageFormat, Rgb, RgbImage};
use log::{debug, warn};
use std::fs;
use std::io::Cursor;
use std::path::Path;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// 網格排版：欄列數與每格尺寸
///
/// 每格尺寸取第一張畫面的尺寸，欄數固定為要求的欄數，
/// 最後一列未填滿的格子保留背景色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridLayout {
    #[must_use]
    pub fn new(frame_count: usize, columns: u32, cell_width: u32, cell_height: u32) -> Self {
        let columns = columns.max(1);
        let rows = u32::try_from(frame_count.div_ceil(columns as usize)).unwrap_or(u32::MAX);
        Self {
            columns,
            rows,
            cell_width,
            cell_height,
        }
    }

    #[must_use]
    pub const fn canvas_width(&self) -> u64 {
        self.cell_width as u64 * self.columns as u64
    }

    #[must_use]
    pub const fn canvas_height(&self) -> u64 {
        self.cell_height as u64 * self.rows as u64
    }

    /// 第 `index` 張畫面所在的 (欄, 列)
    #[must_use]
    pub const fn cell_position(&self, index: usize) -> (u64, u64) {
        let columns = self.columns as u64;
        let index = index as u64;
        (index % columns, index / columns)
    }

    /// 第 `index` 張畫面左上角的像素座標
    #[must_use]
    pub const fn cell_origin(&self, index: usize) -> (u64, u64) {
        let (col, row) = self.cell_position(index);
        (col * self.cell_width as u64, row * self.cell_height as u64)
    }

    #[must_use]
    pub const fn exceeds(&self, max_dimension: u32) -> bool {
        self.canvas_width() > max_dimension as u64 || self.canvas_height() > max_dimension as u64
    }

    /// 超過上限時，讓畫布回到上限內所需的整數縮小倍率
    ///
    /// 只依未縮放的畫布尺寸計算一次，縮小後不再重新檢查。
    #[must_use]
    pub fn scale_divisor(&self, max_dimension: u32) -> Option<u32> {
        if !self.exceeds(max_dimension) {
            return None;
        }
        let max = u64::from(max_dimension.max(1));
        let by_width = self.canvas_width().div_ceil(max);
        let by_height = self.canvas_height().div_ceil(max);
        Some(u32::try_from(by_width.max(by_height)).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn scaled_down(&self, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        Self {
            cell_width: (self.cell_width / divisor).max(1),
            cell_height: (self.cell_height / divisor).max(1),
            ..*self
        }
    }
}

/// 合成後的網格圖與實際使用的排版
#[derive(Debug)]
pub struct ComposedGrid {
    pub image: RgbImage,
    pub layout: GridLayout,
    /// 因超過尺寸上限而套用的縮小倍率
    pub scale_divisor: Option<u32>,
}

/// 將畫面依列優先順序排入網格
pub fn compose_grid(
    mut frames: Vec<Frame>,
    columns: u32,
    max_dimension: u32,
) -> Result<ComposedGrid, GridError> {
    let Some(first) = frames.first() else {
        return Err(GridError::EmptyInput);
    };

    let mut layout = GridLayout::new(
        frames.len(),
        columns,
        first.image.width(),
        first.image.height(),
    );

    let scale_divisor = layout.scale_divisor(max_dimension);
    if let Some(divisor) = scale_divisor {
        warn!(
            "網格尺寸 {}x{} 超過上限 {max_dimension} 像素，所有畫面縮小為 1/{divisor}",
            layout.canvas_width(),
            layout.canvas_height()
        );
        layout = layout.scaled_down(divisor);
        for frame in &mut frames {
            frame.image = imageops::resize(
                &frame.image,
                layout.cell_width,
                layout.cell_height,
                FilterType::Lanczos3,
            );
        }
        if layout.exceeds(max_dimension) {
            warn!(
                "縮小後網格仍為 {}x{}，超過上限 {max_dimension} 像素",
                layout.canvas_width(),
                layout.canvas_height()
            );
        }
    }

    let too_large = || GridError::CanvasTooLarge {
        width: layout.canvas_width(),
        height: layout.canvas_height(),
    };
    let width = u32::try_from(layout.canvas_width()).map_err(|_| too_large())?;
    let height = u32::try_from(layout.canvas_height()).map_err(|_| too_large())?;

    debug!(
        "建立 {width}x{height} 畫布: {} 欄 x {} 列",
        layout.columns, layout.rows
    );

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);
    for (index, frame) in frames.iter().enumerate() {
        let (x, y) = layout.cell_origin(index);
        imageops::replace(&mut canvas, &frame.image, x as i64, y as i64);
    }

    Ok(ComposedGrid {
        image: canvas,
        layout,
        scale_divisor,
    })
}

/// 將畫面長寬各除以 `divisor`（至少 1 像素）
pub fn shrink_frame(frame: &mut Frame, divisor: u32) {
    if divisor <= 1 {
        return;
    }
    let width = (frame.image.width() / divisor).max(1);
    let height = (frame.image.height() / divisor).max(1);
    frame.image = imageops::resize(&frame.image, width, height, FilterType::Lanczos3);
}

/// 依副檔名決定格式寫出網格圖
///
/// 先在記憶體中完成編碼再一次寫入，編碼失敗時不會留下輸出檔。
pub fn save_grid(image: &RgbImage, path: &Path) -> Result<(), GridError> {
    let write_error = |source| GridError::Write {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(write_error)?;

    let mut encoded = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut encoded), format)
        .map_err(write_error)?;
    debug!("網格圖編碼完成: {} bytes", encoded.len());

    fs::write(path, encoded).map_err(|e| write_error(ImageError::IoError(e)))
}
