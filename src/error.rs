//! # 错误类型模块
//!
//! [`StegoError`] 覆盖从载体读取、比特流成帧、像素嵌入/提取
//! 到载荷解密的全部编解码失败情形。
//! 所有失败都不可重试，当前操作立即中止，不在本层内恢复。

use core::fmt;

/// 隐写编解码过程中可能发生的错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载体文件缺失、无法解析，或不是受支持的图像格式（仅限 PNG/JPEG）。
    InvalidCarrier(String),
    /// 载荷长度超出 32 位长度前缀所能表达的范围。
    PayloadTooLarge,
    /// 成帧后的比特流超过载体容量。必须在任何像素被改写之前抛出，
    /// 嵌入是全有或全无的。
    CapacityExceeded { required: u64, available: u64 },
    /// 解码时可用比特数少于声明长度所需（载体损坏，或从未嵌入过数据）。
    TruncatedStream { expected: u64, available: u64 },
    /// 解密失败（口令错误或密文损坏）。
    DecryptionFailure,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCarrier(reason) => write!(f, "invalid carrier image: {reason}"),
            Self::PayloadTooLarge => {
                write!(f, "payload length does not fit the 32-bit length prefix")
            }
            Self::CapacityExceeded {
                required,
                available,
            } => write!(
                f,
                "message needs {required} bits but the carrier only holds {available}"
            ),
            Self::TruncatedStream {
                expected,
                available,
            } => write!(
                f,
                "carrier ran out of data: expected {expected} bits, found {available}"
            ),
            Self::DecryptionFailure => {
                write!(f, "decryption failed (wrong key or corrupted data)")
            }
        }
    }
}

impl std::error::Error for StegoError {}
