//! # stegamark 库
//!
//! 本库包含在 PNG/JPEG 图像中隐藏加密信息的 LSB 隐写工具的核心逻辑，
//! 以及可见文字/Logo 水印的叠加功能。

// 声明库包含的所有模块。

pub mod bitstream;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod steganography;
pub mod watermark;
