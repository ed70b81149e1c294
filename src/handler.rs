//! # 命令处理逻辑模块
//!
//! 包含处理 `embed` 和 `extract` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、加密、可见水印与核心隐写编解码，并向用户报告结果。
//!
//! 顺序约束：可见水印必须在容量校验与隐写嵌入之前全部完成，
//! 因为水印与隐藏比特写入同一份像素数据，后叠加的水印会摧毁其覆盖
//! 区域内的隐藏比特。输出文件只在整条流水线成功后才写出，
//! 磁盘上绝不会出现只嵌入了一半的载体。

use crate::bitstream;
use crate::carrier::Carrier;
use crate::cli::{EmbedArgs, ExtractArgs};
use crate::crypto;
use crate::steganography;
use crate::watermark::{self, WatermarkOptions};
use ab_glyph::FontVec;
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// 为 embed 命令生成缺省输出路径：输入文件旁的 `stego_<文件名>`。
/// 扩展名跟随嗅探出的真实格式，而非输入文件的扩展名。
fn default_dest(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("stego_{stem}.{extension}"))
}

/// 覆盖保护：目标文件已存在且未指定 `--force` 时拒绝写出。
fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 按参数叠加文字与 Logo 水印（两者可同时出现）。
fn apply_watermarks(image: &mut RgbaImage, args: &EmbedArgs) -> Result<()> {
    let opts = WatermarkOptions {
        position: args.watermark_position,
        opacity: args.watermark_opacity,
        ..WatermarkOptions::default()
    };

    if let Some(text) = &args.watermark_text {
        let font_path = args
            .font
            .as_ref()
            .context("--watermark-text requires --font")?;
        let font_bytes = fs::read(font_path).with_context(|| {
            format!(
                "Unable to read font file: {}",
                font_path.to_string_lossy().red().bold()
            )
        })?;
        let font = FontVec::try_from_vec(font_bytes).map_err(|_| {
            anyhow::anyhow!(
                "Invalid font file: {}",
                font_path.to_string_lossy().red().bold()
            )
        })?;
        watermark::add_text_watermark(image, text, &font, &opts);
    }

    if let Some(logo_path) = &args.watermark_logo {
        let logo = image::open(logo_path)
            .with_context(|| {
                format!(
                    "Unable to read logo image: {}",
                    logo_path.to_string_lossy().red().bold()
                )
            })?
            .to_rgba8();
        watermark::add_logo_watermark(image, &logo, &opts);
    }

    Ok(())
}

/// 处理 'Embed' 命令的执行逻辑。
///
/// 流水线：载入并嗅探载体 → 叠加可见水印 → 加密信息 → 成帧 →
/// 容量校验 → 逐像素嵌入 → 以原格式写出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、信息、口令与水印选项的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体文件缺失、无法解码，或不是 PNG/JPEG。
/// * 水印字体或 Logo 文件无法读取。
/// * 载体容量不足以容纳成帧后的密文。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let mut carrier = Carrier::load(&args.image).with_context(|| {
        format!(
            "Unable to load carrier image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if carrier.format.is_lossy() {
        eprintln!(
            "{} JPEG is a lossy format; recompression may corrupt the hidden message even at maximum quality. Prefer a PNG carrier.",
            "warning:".yellow().bold()
        );
    }

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_dest(&args.image, carrier.format.extension()));
    ensure_writable(&dest, args.force)?;

    // 水印先行：嵌入之后再叠加水印会破坏其覆盖区域内的隐藏比特。
    apply_watermarks(&mut carrier.image, &args)?;

    let ciphertext = crypto::encrypt(args.message.as_bytes(), &args.key);
    let bits = bitstream::encode(&ciphertext).context("Failed to frame the encrypted message")?;

    steganography::check_capacity(
        carrier.image.width(),
        carrier.image.height(),
        bits.len() as u64,
    )
    .with_context(|| {
        format!(
            "Not enough space in the image to hide the message. \nRequired: {} bits, Available: {} bits",
            bits.len().to_string().red().bold(),
            steganography::capacity_bits(carrier.image.width(), carrier.image.height())
                .to_string()
                .green()
                .bold()
        )
    })?;

    steganography::embed(&mut carrier.image, &bits)
        .context("Failed to embed the framed message into the carrier")?;

    carrier.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 负责载入载体、按扫描顺序提取成帧载荷、用口令解密，
/// 并将恢复的信息打印到标准输出或写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入路径与口令的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体文件缺失、无法解码，或不是 PNG/JPEG。
/// * 载体中的数据不足以凑齐声明的长度（图像损坏或从未嵌入过信息）。
/// * 解密失败（口令错误，或图像从未嵌入过信息）。
/// * 无法写入到目标文本文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let carrier = Carrier::load(&args.image).with_context(|| {
        format!(
            "Unable to load carrier image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let ciphertext = steganography::extract(&carrier.image).with_context(|| {
        format!(
            "Failed to extract a hidden message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let plaintext = crypto::decrypt(&ciphertext, &args.key).with_context(|| {
        format!(
            "Failed to decrypt the extracted message from '{}'. \nThe key may be wrong, or the image never contained a hidden message.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    match &args.dest {
        Some(dest) => {
            ensure_writable(dest, args.force)?;
            fs::write(dest, &plaintext).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    dest.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The message has been successfully recovered and saved: {}",
                dest.to_string_lossy().green().bold()
            );
        }
        None => {
            println!(
                "Recovered message: {}",
                String::from_utf8_lossy(&plaintext).green().bold()
            );
        }
    }

    Ok(())
}
