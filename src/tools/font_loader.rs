use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result, anyhow, bail};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 量測文字尺寸用的代表字串
pub const SAMPLE_TIMESTAMP: &str = "00:00:00";

/// 內建點陣字型每個字元的邊長（像素）
const GLYPH_SIZE: u32 = 8;

/// 未指定字型時依序嘗試的 TrueType 字型
const PREFERRED_FONT_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// 可繪製時間戳記的字型
pub enum TextFont {
    TrueType { font: FontVec, scale: PxScale },
    /// 內建 8x8 點陣字型，每個點放大為 `pixel_size` 見方
    Bitmap { pixel_size: u32 },
}

impl TextFont {
    /// 文字的寬與高（像素）
    #[must_use]
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            Self::TrueType { font, scale } => text_size(*scale, font, text),
            Self::Bitmap { pixel_size } => {
                let cell = GLYPH_SIZE.saturating_mul(*pixel_size);
                let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                (count.saturating_mul(cell), cell)
            }
        }
    }

    /// 以 `(x, y)` 為左上角繪製文字，超出畫面的部分直接裁掉
    pub fn draw_text(&self, image: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            Self::TrueType { font, scale } => draw_text_mut(image, color, x, y, *scale, font, text),
            Self::Bitmap { pixel_size } => {
                draw_bitmap_text(image, color, x, y, *pixel_size, text);
            }
        }
    }

    #[must_use]
    pub const fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap { .. })
    }
}

impl fmt::Debug for TextFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("scale", &scale.y)
                .finish_non_exhaustive(),
            Self::Bitmap { pixel_size } => f
                .debug_struct("Bitmap")
                .field("pixel_size", pixel_size)
                .finish(),
        }
    }
}

/// 字型解析結果
///
/// 呼叫端依三種狀態分別處理：偏好字型直接使用、備用字型需發出警告、
/// 兩者都無法使用則為致命錯誤。
#[derive(Debug)]
pub enum FontResolution {
    Preferred { font: TextFont, source: PathBuf },
    Fallback { font: TextFont, reason: String },
    Unavailable { reason: String },
}

/// 依優先順序列出要嘗試的 TrueType 字型路徑
#[must_use]
pub fn preferred_font_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(PREFERRED_FONT_CANDIDATES.iter().map(PathBuf::from))
        .collect()
}

/// 依序嘗試候選 TrueType 字型，全部失敗時改用內建點陣字型
#[must_use]
pub fn resolve_font(font_size: u32, candidates: &[PathBuf]) -> FontResolution {
    let mut failures = Vec::new();

    for path in candidates {
        match load_truetype(path, font_size) {
            Ok(font) => {
                return FontResolution::Preferred {
                    font,
                    source: path.clone(),
                };
            }
            Err(e) => failures.push(format!("{e:#}")),
        }
    }

    let reason = if failures.is_empty() {
        "沒有可嘗試的 TrueType 字型".to_string()
    } else {
        failures.join("; ")
    };

    match load_bitmap(font_size) {
        Ok(font) => FontResolution::Fallback { font, reason },
        Err(e) => FontResolution::Unavailable {
            reason: format!("{reason}; 內建字型: {e:#}"),
        },
    }
}

fn load_truetype(path: &Path, font_size: u32) -> Result<TextFont> {
    let data = fs::read(path).with_context(|| format!("無法讀取字型檔 {}", path.display()))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|e| anyhow!("無效的字型檔 {}: {e}", path.display()))?;

    Ok(TextFont::TrueType {
        font,
        scale: PxScale::from(font_size as f32),
    })
}

fn load_bitmap(font_size: u32) -> Result<TextFont> {
    if let Some(missing) = SAMPLE_TIMESTAMP.chars().find(|c| BASIC_FONTS.get(*c).is_none()) {
        bail!("內建字型缺少字元 {missing:?}");
    }

    Ok(TextFont::Bitmap {
        pixel_size: (font_size / GLYPH_SIZE).max(1),
    })
}

fn draw_bitmap_text(
    image: &mut RgbImage,
    color: Rgb<u8>,
    x: i32,
    y: i32,
    pixel_size: u32,
    text: &str,
) {
    let block = i64::from(pixel_size);
    let advance = i64::from(GLYPH_SIZE) * block;

    for (index, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = i64::from(x) + index as i64 * advance;

        // 每個 byte 是一列，最低位元是最左邊的點
        for (row, bits) in glyph.into_iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = origin_x + i64::from(col) * block;
                let py = i64::from(y) + row as i64 * block;
                fill_block(image, color, px, py, block);
            }
        }
    }
}

/// 填滿 `(x, y)` 起的 `size` 見方區塊，只走訪畫面內的像素
fn fill_block(image: &mut RgbImage, color: Rgb<u8>, x: i64, y: i64, size: i64) {
    let (width, height) = image.dimensions();
    let clip = |start: i64, limit: u32| {
        let low = start.clamp(0, i64::from(limit));
        let high = start.saturating_add(size).clamp(low, i64::from(limit));
        (low as u32)..(high as u32)
    };

    for by in clip(y, height) {
        for bx in clip(x, width) {
            image.put_pixel(bx, by, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bitmap_huge_size_saturates() {
        let font = load_bitmap(u32::MAX).unwrap();
        let (width, height) = font.text_size(SAMPLE_TIMESTAMP);
        assert_eq!(width, u32::MAX);
        assert_eq!(height, 8 * (u32::MAX / 8));

        // 區塊遠大於畫面時只會裁切，不會溢位
        let mut image = RgbImage::new(16, 16);
        font.draw_text(&mut image, Rgb([255, 255, 255]), -5, -5, SAMPLE_TIMESTAMP);
        font.draw_text(&mut image, Rgb([255, 255, 255]), i32::MAX, i32::MAX, SAMPLE_TIMESTAMP);
        assert_eq!(image.dimensions(), (16, 16));
    }

    #[test]
    fn test_bitmap_text_size() {
        let font = load_bitmap(20).unwrap();
        // 20 / 8 = 2 倍放大
        assert_eq!(font.text_size(SAMPLE_TIMESTAMP), (8 * 16, 16));

        let small = load_bitmap(5).unwrap();
        assert_eq!(small.text_size("12"), (16, 8));
    }

    #[test]
    fn test_missing_candidates_fall_back() {
        let candidates = vec![PathBuf::from("/nonexistent/font.ttf")];
        let resolution = resolve_font(20, &candidates);
        match resolution {
            FontResolution::Fallback { font, reason } => {
                assert!(font.is_bitmap());
                assert!(reason.contains("/nonexistent/font.ttf"));
            }
            other => panic!("預期改用內建字型，實際為 {other:?}"),
        }
    }

    #[test]
    fn test_invalid_font_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();

        let resolution = resolve_font(20, &[path]);
        assert!(matches!(resolution, FontResolution::Fallback { .. }));
    }

    #[test]
    fn test_no_candidates_falls_back() {
        assert!(matches!(
            resolve_font(12, &[]),
            FontResolution::Fallback { .. }
        ));
    }

    #[test]
    fn test_explicit_font_is_tried_first() {
        let candidates = preferred_font_candidates(Some(Path::new("/fonts/custom.ttf")));
        assert_eq!(candidates[0], PathBuf::from("/fonts/custom.ttf"));
        assert_eq!(candidates.len(), PREFERRED_FONT_CANDIDATES.len() + 1);

        let defaults = preferred_font_candidates(None);
        assert_eq!(defaults.len(), PREFERRED_FONT_CANDIDATES.len());
    }

    #[test]
    fn test_bitmap_drawing_clips_at_edges() {
        let font = load_bitmap(8).unwrap();
        let mut image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));

        // 大部分文字落在畫面外，不應 panic
        font.draw_text(&mut image, Rgb([255, 255, 255]), -30, 4, SAMPLE_TIMESTAMP);
        font.draw_text(&mut image, Rgb([255, 255, 255]), 6, -6, SAMPLE_TIMESTAMP);
    }

    #[test]
    fn test_bitmap_drawing_paints_pixels() {
        let font = load_bitmap(8).unwrap();
        let mut image = RgbImage::from_pixel(16, 8, Rgb([0, 0, 0]));
        font.draw_text(&mut image, Rgb([255, 255, 255]), 0, 0, "00");

        let painted = image.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(painted > 0);
    }
}
