use anyhow::Ok;
use image::{ImageBuffer, ImageFormat, Rgba};
use rand::RngCore;
use std::fs;
use std::path::Path;
use stegamark::{
    cli::{EmbedArgs, ExtractArgs},
    handler::{handle_embed, handle_extract},
    watermark::Position,
};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于构造不带水印的 embed 参数
fn embed_args(image: &Path, message: &str, key: &str, dest: Option<&Path>, force: bool) -> EmbedArgs {
    EmbedArgs {
        image: image.to_path_buf(),
        message: message.to_string(),
        key: key.to_string(),
        dest: dest.map(Path::to_path_buf),
        watermark_text: None,
        font: None,
        watermark_logo: None,
        watermark_position: Position::BottomRight,
        watermark_opacity: 0.5,
        force,
    }
}

/// 一个辅助函数，用于构造 extract 参数
fn extract_args(image: &Path, key: &str, dest: Option<&Path>) -> ExtractArgs {
    ExtractArgs {
        image: image.to_path_buf(),
        key: key.to_string(),
        dest: dest.map(Path::to_path_buf),
        force: false,
    }
}

/// 验证从嵌入到提取的完整流程（含加密）
#[test]
fn test_handle_embed_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let stego_image_path = dir.path().join("stego.png");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_message = "This is a secret message! 这是一条秘密信息！";

    // 2. 测试 handle_embed
    handle_embed(embed_args(
        &original_image_path,
        original_message,
        "hunter2",
        Some(&stego_image_path),
        false,
    ))?;
    assert!(stego_image_path.exists(), "Stego image should be created.");

    // 3. 测试 handle_extract
    handle_extract(extract_args(
        &stego_image_path,
        "hunter2",
        Some(&recovered_text_path),
    ))?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_message = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_message, recovered_message,
        "Recovered message must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_embed_with_default_dest() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    create_test_image(&original_image_path, 100, 100);

    // 2. 测试 handle_embed，不提供 dest 路径
    handle_embed(embed_args(
        &original_image_path,
        "default path test",
        "key",
        None, // 关键：测试 None 的情况
        false,
    ))?;

    // 验证默认的隐写图像文件是否已创建
    let expected_stego_path = dir.path().join("stego_original.png");
    assert!(
        expected_stego_path.exists(),
        "Default stego image should be created at: {:?}",
        expected_stego_path
    );

    // 3. 从默认路径提取并验证
    let recovered_path = dir.path().join("recovered.txt");
    handle_extract(extract_args(&expected_stego_path, "key", Some(&recovered_path)))?;
    assert_eq!(fs::read_to_string(&recovered_path)?, "default path test");

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 构建参数，不使用 --force，执行并断言操作会失败
    let result = handle_embed(embed_args(
        &image_path,
        "short",
        "key",
        Some(&dest_path),
        false,
    ));
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖，执行并断言操作会成功
    let result = handle_embed(embed_args(
        &image_path,
        "short",
        "key",
        Some(&dest_path),
        true,
    ));
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证容量不足时的错误处理
#[test]
fn test_handle_embed_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境：10x10 载体只有 100 位容量，放不下任何密文
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let dest_path = dir.path().join("dest.png");
    create_test_image(&image_path, 10, 10);

    // 2. 执行并断言错误
    let result = handle_embed(embed_args(
        &image_path,
        &"a".repeat(5000),
        "key",
        Some(&dest_path),
        false,
    ));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(
        !dest_path.exists(),
        "No partial carrier may be written on failure."
    );

    Ok(())
}

/// 验证口令错误时提取以明确的错误收场，而不是输出乱码
#[test]
fn test_extract_with_wrong_key_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("original.png");
    let stego_path = dir.path().join("stego.png");
    create_test_image(&image_path, 100, 100);

    handle_embed(embed_args(
        &image_path,
        "top secret",
        "correct horse",
        Some(&stego_path),
        false,
    ))?;

    let result = handle_extract(extract_args(&stego_path, "battery staple", None));
    assert!(result.is_err(), "A wrong key must surface as an error.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Failed to decrypt"));
    }

    Ok(())
}

/// 验证从未嵌入过数据的图像不会被当作成功提取
#[test]
fn test_extract_from_pristine_image_surfaces_an_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("pristine.png");
    create_test_image(&image_path, 100, 100);

    // 未嵌入的像素噪声要么凑不齐声明的长度（截断），
    // 要么解出一段无法通过解密校验的乱码——都必须以错误收场
    let result = handle_extract(extract_args(&image_path, "any key", None));
    assert!(
        result.is_err(),
        "Extraction from a never-embedded image must not silently succeed."
    );

    Ok(())
}

/// 验证 JPEG 载体按内容识别并以 JPEG 格式写出
#[test]
fn test_jpeg_carrier_round_trips_format() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("carrier.jpg");

    // JPEG 编码器不接受透明通道，这里直接构造 RGB 像素
    let mut raw_pixels = vec![0u8; 64 * 64 * 3];
    rand::rng().fill_bytes(&mut raw_pixels);
    image::RgbImage::from_raw(64, 64, raw_pixels)
        .expect("buffer matches dimensions")
        .save(&image_path)?;

    handle_embed(embed_args(&image_path, "jpeg message", "key", None, false))?;

    let stego_path = dir.path().join("stego_carrier.jpg");
    assert!(stego_path.exists(), "Default JPEG output should be created.");
    let format = image::guess_format(&fs::read(&stego_path)?)?;
    assert_eq!(format, ImageFormat::Jpeg, "Output must keep the input format.");

    Ok(())
}

/// 验证非图像文件被作为无效载体拒绝
#[test]
fn test_non_image_carrier_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let bogus_path = dir.path().join("not_an_image.png");
    fs::write(&bogus_path, "definitely not pixel data")?;

    let result = handle_embed(embed_args(&bogus_path, "msg", "key", None, false));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to load carrier image"));
    }

    Ok(())
}

/// 验证 Logo 水印与隐写嵌入同时工作：先水印后嵌入，信息完好往返
#[test]
fn test_embed_with_logo_watermark_preserves_message() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("original.png");
    let logo_path = dir.path().join("logo.png");
    let stego_path = dir.path().join("stego.png");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_image(&image_path, 120, 120);
    create_test_image(&logo_path, 24, 24);

    let mut args = embed_args(
        &image_path,
        "hidden beneath the watermark",
        "key",
        Some(&stego_path),
        false,
    );
    args.watermark_logo = Some(logo_path);
    handle_embed(args)?;

    handle_extract(extract_args(&stego_path, "key", Some(&recovered_path)))?;
    assert_eq!(
        fs::read_to_string(&recovered_path)?,
        "hidden beneath the watermark"
    );

    Ok(())
}
