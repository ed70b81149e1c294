//! # 载体图像 I/O 模块
//!
//! 负责载体文件的读入与写出。格式通过内容嗅探识别，不信任文件扩展名；
//! 仅接受 PNG 与 JPEG，输出始终与输入保持同一格式。
//!
//! 像素数据在整个嵌入/提取过程中完整驻留内存，
//! 文件句柄在读写完成后随作用域立即释放。

use crate::constants::JPEG_OUTPUT_QUALITY;
use crate::error::StegoError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// 受支持的载体格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierFormat {
    Png,
    Jpeg,
}

impl CarrierFormat {
    /// JPEG 属于有损格式，即便以最高质量保存，重压缩仍可能破坏隐藏比特。
    /// 调用方在向 JPEG 载体嵌入时应当向用户作出提示。
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// 输出文件的惯用扩展名。
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// 一张已载入内存的载体图像及其原始格式。
pub struct Carrier {
    pub image: RgbaImage,
    pub format: CarrierFormat,
}

impl Carrier {
    /// 从文件载入载体，格式由文件内容嗅探得出。
    ///
    /// # Errors
    ///
    /// 文件缺失、无法解码，或内容不是 PNG/JPEG 时返回
    /// [`StegoError::InvalidCarrier`]。
    pub fn load(path: &Path) -> Result<Self, StegoError> {
        let bytes = std::fs::read(path)
            .map_err(|e| StegoError::InvalidCarrier(format!("{}: {e}", path.display())))?;

        let format = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => CarrierFormat::Png,
            Ok(ImageFormat::Jpeg) => CarrierFormat::Jpeg,
            Ok(other) => {
                return Err(StegoError::InvalidCarrier(format!(
                    "unsupported image format {other:?}, only PNG and JPEG are allowed"
                )));
            }
            Err(e) => return Err(StegoError::InvalidCarrier(e.to_string())),
        };

        let image = image::load_from_memory_with_format(&bytes, format.image_format())
            .map_err(|e| StegoError::InvalidCarrier(e.to_string()))?
            .to_rgba8();

        Ok(Self { image, format })
    }

    /// 以与输入相同的格式写出载体。
    /// JPEG 以最高质量保存，尽量减少有损压缩对隐藏比特的破坏。
    ///
    /// # Errors
    ///
    /// 目标文件无法创建或编码失败时返回错误。
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        let writer = BufWriter::new(File::create(path)?);

        match self.format {
            CarrierFormat::Png => PngEncoder::new(writer).write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            ),
            CarrierFormat::Jpeg => {
                // JPEG 不支持透明通道，先退回 RGB。
                let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
                JpegEncoder::new_with_quality(writer, JPEG_OUTPUT_QUALITY).encode_image(&rgb)
            }
        }
    }
}
