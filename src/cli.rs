//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::watermark::Position;
use clap::Parser;
use std::path::PathBuf;

/// 一款在 PNG/JPEG 图像中隐藏加密信息的 LSB 隐写命令行工具，支持可见文字/Logo 水印。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款在 PNG/JPEG 图像中隐藏加密信息的 LSB 隐写命令行工具，支持可见文字/Logo 水印。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：embed (嵌入) 和 extract (提取)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将加密后的信息嵌入 PNG 或 JPEG 载体图像。
    Embed(EmbedArgs),

    /// 从载体图像中提取并解密隐藏的信息。
    Extract(ExtractArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// 载体图像文件路径 (PNG 或 JPEG，按文件内容识别)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的信息文本。
    #[arg(short, long)]
    pub message: String,

    /// 加密口令。
    #[arg(short, long)]
    pub key: String,

    /// 保存结果图像的输出路径；缺省时在输入文件旁生成 `stego_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 可见文字水印的内容（需同时提供 --font）。
    #[arg(long, requires = "font")]
    pub watermark_text: Option<String>,

    /// 文字水印使用的 TTF/OTF 字体文件路径。
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// 可见 Logo 水印的图像文件路径。
    #[arg(long)]
    pub watermark_logo: Option<PathBuf>,

    /// 水印位置。
    #[arg(long, value_enum, default_value = "bottom-right")]
    pub watermark_position: Position,

    /// 水印不透明度 (0.0 - 1.0)。
    #[arg(long, default_value_t = 0.5)]
    pub watermark_opacity: f32,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 已嵌入信息的载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 解密口令。
    #[arg(short, long)]
    pub key: String,

    /// 可选输出路径；缺省时将恢复的信息打印到标准输出。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}
