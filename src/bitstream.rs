//! # 比特流成帧模块
//!
//! 将不透明的字节载荷转换为自定界的有序比特序列，以及逆过程。
//! 帧格式：32 位大端长度前缀（载荷字节数）+ 逐字节展开的载荷比特，
//! 每个字节均为最高位在前。总比特数恒为 `32 + 8 × 载荷长度`。
//!
//! 成帧是对称的：对任意长度 `0 ≤ L < 2^32` 的字节序列，
//! `decode(encode(payload)) == payload`。

use crate::constants::LENGTH_PREFIX_BITS;
use crate::error::StegoError;

/// 将字节载荷编码为成帧比特流。
///
/// 输出向量的每个元素为 0 或 1，对应像素层每像素一比特的消费方式。
///
/// # Errors
///
/// 载荷长度无法放入 32 位长度前缀时返回 [`StegoError::PayloadTooLarge`]。
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    let declared = u32::try_from(payload.len()).map_err(|_| StegoError::PayloadTooLarge)?;

    let mut bits = Vec::with_capacity(LENGTH_PREFIX_BITS + payload.len() * 8);
    for shift in (0..LENGTH_PREFIX_BITS).rev() {
        bits.push(((declared >> shift) & 1) as u8);
    }
    for &byte in payload {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }

    Ok(bits)
}

/// 将成帧比特流解码回字节载荷。
///
/// 先读出 32 位长度前缀得到声明字节数 N，再取后续 N × 8 位
/// 按最高位在前重组为字节。
///
/// # Errors
///
/// 可用比特数少于 `32 + N × 8` 时返回 [`StegoError::TruncatedStream`]。
pub fn decode(bits: &[u8]) -> Result<Vec<u8>, StegoError> {
    let declared = read_length(bits)?;
    let expected = LENGTH_PREFIX_BITS as u64 + u64::from(declared) * 8;
    if (bits.len() as u64) < expected {
        return Err(StegoError::TruncatedStream {
            expected,
            available: bits.len() as u64,
        });
    }

    let payload = bits[LENGTH_PREFIX_BITS..expected as usize]
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit))
        .collect();

    Ok(payload)
}

/// 读取比特流开头的 32 位长度前缀（大端、最高位在前）。
///
/// # Errors
///
/// 比特数不足 32 时返回 [`StegoError::TruncatedStream`]。
pub fn read_length(bits: &[u8]) -> Result<u32, StegoError> {
    if bits.len() < LENGTH_PREFIX_BITS {
        return Err(StegoError::TruncatedStream {
            expected: LENGTH_PREFIX_BITS as u64,
            available: bits.len() as u64,
        });
    }

    Ok(bits[..LENGTH_PREFIX_BITS]
        .iter()
        .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit)))
}
