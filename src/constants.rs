/// 长度前缀所占的比特数。
/// 载荷长度以 32 位无符号整数写入比特流开头，大端序、最高位在前。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个像素可承载的比特数。
/// 本方案只改写蓝色通道的最低有效位，因此每个像素恰好承载 1 bit，
/// 载体容量即为 宽 × 高。
pub const BITS_PER_PIXEL: usize = 1;

/// JPEG 输出质量 (0 - 100)。
/// JPEG 是有损格式，以最高质量保存只能尽量减少（无法消除）
/// 重压缩对隐藏比特的破坏。
pub const JPEG_OUTPUT_QUALITY: u8 = 100;
