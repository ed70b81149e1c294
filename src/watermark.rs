//! # 可见水印模块
//!
//! 文字与 Logo 水印是纯视觉装饰，与隐写无关，但二者写入同一份像素数据。
//! 调用方必须在嵌入隐藏信息之前完成全部水印叠加，
//! 否则水印覆盖的区域会无声地摧毁其中已嵌入的比特。

use ab_glyph::{Font, PxScale};
use clap::ValueEnum;
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};

/// 水印在载体上的放置位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

/// 水印叠加选项。
#[derive(Debug, Clone, Copy)]
pub struct WatermarkOptions {
    pub position: Position,
    /// 不透明度，0.0（不可见）到 1.0（完全覆盖）。
    pub opacity: f32,
    /// 水印与图像边缘之间的留白（像素）。
    pub margin: u32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: Position::BottomRight,
            opacity: 0.5,
            margin: 16,
        }
    }
}

/// 根据位置选项计算水印图层左上角在底图上的坐标。
fn anchor(base: &RgbaImage, mark_w: u32, mark_h: u32, opts: &WatermarkOptions) -> (i64, i64) {
    let margin = i64::from(opts.margin);
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    let (mw, mh) = (i64::from(mark_w), i64::from(mark_h));

    match opts.position {
        Position::TopLeft => (margin, margin),
        Position::TopRight => (bw - mw - margin, margin),
        Position::BottomLeft => (margin, bh - mh - margin),
        Position::BottomRight => (bw - mw - margin, bh - mh - margin),
        Position::Center => ((bw - mw) / 2, (bh - mh) / 2),
    }
}

/// 将一层水印以给定不透明度混合到底图上，越界部分直接裁掉。
fn blend_layer(base: &mut RgbaImage, layer: &RgbaImage, origin: (i64, i64), opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);

    for (lx, ly, pixel) in layer.enumerate_pixels() {
        let alpha = f32::from(pixel[3]) / 255.0 * opacity;
        if alpha <= 0.0 {
            continue;
        }

        let x = origin.0 + i64::from(lx);
        let y = origin.1 + i64::from(ly);
        if x < 0 || y < 0 || x >= i64::from(base.width()) || y >= i64::from(base.height()) {
            continue;
        }

        let dst = base.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            dst[channel] = (f32::from(pixel[channel]) * alpha
                + f32::from(dst[channel]) * (1.0 - alpha))
                .round() as u8;
        }
    }
}

/// 在载体上叠加文字水印。
///
/// 文字先渲染到透明图层再按不透明度整体混合，字号随图像高度缩放。
pub fn add_text_watermark(
    image: &mut RgbaImage,
    text: &str,
    font: &impl Font,
    opts: &WatermarkOptions,
) {
    let scale = PxScale::from((image.height() as f32 / 20.0).max(12.0));
    let (text_w, text_h) = text_size(scale, font, text);

    let mut layer = RgbaImage::new(text_w.max(1), text_h.max(1));
    draw_text_mut(&mut layer, Rgba([255, 255, 255, 255]), 0, 0, scale, font, text);

    let origin = anchor(image, layer.width(), layer.height(), opts);
    blend_layer(image, &layer, origin, opts.opacity);
}

/// 在载体上叠加 Logo 水印。
///
/// Logo 会被等比缩小到不超过载体宽度的四分之一。
pub fn add_logo_watermark(image: &mut RgbaImage, logo: &RgbaImage, opts: &WatermarkOptions) {
    let max_w = (image.width() / 4).max(1);
    let scaled = if logo.width() > max_w {
        let ratio = max_w as f32 / logo.width() as f32;
        let height = ((logo.height() as f32 * ratio).round() as u32).max(1);
        imageops::resize(logo, max_w, height, imageops::FilterType::Lanczos3)
    } else {
        logo.clone()
    };

    let origin = anchor(image, scaled.width(), scaled.height(), opts);
    blend_layer(image, &scaled, origin, opts.opacity);
}
