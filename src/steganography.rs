//! # 隐写核心模块
//!
//! 容量校验、像素嵌入与像素提取。
//!
//! 扫描顺序：行优先，y 在外层递增、x 在行内递增，起点 (0, 0)。
//! 嵌入与提取必须共享同一扫描顺序——任何偏差都不会报错，
//! 只会无声地破坏恢复出的数据。
//!
//! 每个像素只改写蓝色通道的最低有效位（颜色值至多偏移 1/255），
//! 红绿通道与未消费的像素保持原样。

use crate::bitstream;
use crate::constants::{BITS_PER_PIXEL, LENGTH_PREFIX_BITS};
use crate::error::StegoError;
use image::RgbaImage;

/// 计算载体在本方案下的容量（比特）。
/// 容量是由尺寸推导的值：宽 × 高 × 每像素比特数。
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * BITS_PER_PIXEL as u64
}

/// 容量校验。
///
/// 必须在任何像素被改写之前调用；嵌入是全有或全无的，
/// 绝不因中途容量不足而只写一半。
///
/// # Errors
///
/// 比特流长度超过载体容量时返回 [`StegoError::CapacityExceeded`]。
pub fn check_capacity(width: u32, height: u32, bitstream_len: u64) -> Result<(), StegoError> {
    let available = capacity_bits(width, height);
    if bitstream_len > available {
        return Err(StegoError::CapacityExceeded {
            required: bitstream_len,
            available,
        });
    }
    Ok(())
}

/// 将成帧比特流写入载体的像素缓冲。
///
/// 按扫描顺序遍历像素，把蓝色通道最低位替换为流中的下一比特；
/// 比特流耗尽后立即停止，其余像素不被触碰。
///
/// # Errors
///
/// 写入前会再次校验容量，不足时返回 [`StegoError::CapacityExceeded`]，
/// 此时图像未被改动。
pub fn embed(image: &mut RgbaImage, bits: &[u8]) -> Result<(), StegoError> {
    check_capacity(image.width(), image.height(), bits.len() as u64)?;

    let mut cursor = bits.iter();
    'rows: for y in 0..image.height() {
        for x in 0..image.width() {
            let Some(&bit) = cursor.next() else {
                break 'rows;
            };
            let pixel = image.get_pixel_mut(x, y);
            pixel[2] = (pixel[2] & 0xFE) | bit;
        }
    }

    Ok(())
}

/// 从载体中恢复隐藏的载荷。
///
/// 两阶段：先按扫描顺序累积 32 位并解码出声明字节数 N，
/// 再继续收集 N × 8 位，随后立刻停止扫描，不读取图像的剩余部分。
///
/// 本函数无法判断载体是否真的嵌入过数据：任何图像都会解出
/// 某个 N 和某串字节。"从未嵌入"只能由上层（例如解密校验）识别。
///
/// # Errors
///
/// 像素在凑齐 `32 + N × 8` 位之前耗尽时返回 [`StegoError::TruncatedStream`]。
pub fn extract(image: &RgbaImage) -> Result<Vec<u8>, StegoError> {
    let mut bits: Vec<u8> = Vec::with_capacity(LENGTH_PREFIX_BITS);
    let mut needed: Option<u64> = None;

    'rows: for y in 0..image.height() {
        for x in 0..image.width() {
            bits.push(image.get_pixel(x, y)[2] & 1);

            if needed.is_none() && bits.len() == LENGTH_PREFIX_BITS {
                let declared = bitstream::read_length(&bits)?;
                needed = Some(LENGTH_PREFIX_BITS as u64 + u64::from(declared) * 8);
            }
            if needed == Some(bits.len() as u64) {
                break 'rows;
            }
        }
    }

    bitstream::decode(&bits)
}
