use crate::tools::{Frame, SAMPLE_TIMESTAMP, TextFont};
use image::Rgb;

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const FILL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// 將秒數格式化為 `HH:MM:SS`
#[must_use]
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// 時間戳記的排版尺寸
///
/// 以代表字串量測一次後套用到每張畫面，假設同字型大小下各數字等寬。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub text_width: u32,
    pub text_height: u32,
    pub margin: u32,
    pub stroke_width: u32,
}

impl TextMetrics {
    #[must_use]
    pub fn measure(font: &TextFont, font_size: u32) -> Self {
        let (text_width, text_height) = font.text_size(SAMPLE_TIMESTAMP);
        Self {
            text_width,
            text_height,
            margin: (font_size / 2).max(10),
            stroke_width: (font_size / 10).max(1),
        }
    }

    /// 右下角文字的左上角座標；畫面太小時可能為負值
    #[must_use]
    pub fn anchor(&self, image_width: u32, image_height: u32) -> (i32, i32) {
        let x = i64::from(image_width) - i64::from(self.text_width) - i64::from(self.margin);
        let y = i64::from(image_height) - i64::from(self.text_height) - i64::from(self.margin);
        (clamp_to_i32(x), clamp_to_i32(y))
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// 在畫面右下角加上白字黑框的時間戳記
#[derive(Debug)]
pub struct TimestampAnnotator {
    font: TextFont,
    metrics: TextMetrics,
}

impl TimestampAnnotator {
    #[must_use]
    pub fn new(font: TextFont, font_size: u32) -> Self {
        let metrics = TextMetrics::measure(&font, font_size);
        Self { font, metrics }
    }

    #[must_use]
    pub const fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    /// 先在 ±stroke 範圍內每個偏移畫黑字形成外框，再於原位置畫白字
    pub fn annotate(&self, frame: &mut Frame) {
        let label = format_timestamp(frame.timestamp);
        let (x, y) = self
            .metrics
            .anchor(frame.image.width(), frame.image.height());
        let stroke = self.metrics.stroke_width as i32;

        for offset_x in -stroke..=stroke {
            for offset_y in -stroke..=stroke {
                self.font.draw_text(
                    &mut frame.image,
                    OUTLINE_COLOR,
                    x.saturating_add(offset_x),
                    y.saturating_add(offset_y),
                    &label,
                );
            }
        }

        self.font
            .draw_text(&mut frame.image, FILL_COLOR, x, y, &label);
    }
}
