//! # 加密协作模块
//!
//! 载荷加密的边界协作者。对隐写编解码器而言，密文只是一段不透明的
//! 字节变换结果，本模块不被核心编解码逻辑检视或依赖。
//!
//! 加密密钥用 Argon2id 从口令与随机盐派生，再以 AES-256-GCM-SIV 封装；
//! 随机盐与随机数置于密文之前，使提取端仅凭口令即可自足解密。
//! AEAD 认证标签让错误口令得以被确定地检出，而不是解出一段貌似合理的乱码。

use crate::error::StegoError;
use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use argon2::Argon2;
use rand::RngCore;
use zeroize::Zeroizing;

/// Argon2 盐长度（字节）。
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV 随机数长度（字节）。
pub const NONCE_LEN: usize = 12;
/// AEAD 追加在密文末尾的认证标签长度（字节）。
pub const TAG_LEN: usize = 16;
/// 合法密文的最小总长：盐 + 随机数 + 认证标签。
pub const MIN_CIPHERTEXT_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// 从口令与盐派生 256 位加密密钥。
fn derive_key(key: &str, salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut derived = Zeroizing::new([0u8; 32]);
    Argon2::default()
        .hash_password_into(key.as_bytes(), salt, &mut *derived)
        .expect("Argon2 key derivation should not fail");
    derived
}

/// 加密明文。输出布局：`盐 ‖ 随机数 ‖ 密文+标签`。
pub fn encrypt(plaintext: &[u8], key: &str) -> Vec<u8> {
    let mut rng = rand::rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived = derive_key(key, &salt);
    let cipher = Aes256GcmSiv::new_from_slice(&*derived).expect("valid key length");
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .expect("AES-GCM-SIV encrypt should not fail");

    let mut ciphertext = Vec::with_capacity(MIN_CIPHERTEXT_LEN + plaintext.len());
    ciphertext.extend_from_slice(&salt);
    ciphertext.extend_from_slice(&nonce_bytes);
    ciphertext.extend_from_slice(&sealed);
    ciphertext
}

/// 解密由 [`encrypt`] 产生的密文。
///
/// # Errors
///
/// 口令错误、密文损坏或长度不足以容纳头部与标签时返回
/// [`StegoError::DecryptionFailure`]。
pub fn decrypt(ciphertext: &[u8], key: &str) -> Result<Vec<u8>, StegoError> {
    if ciphertext.len() < MIN_CIPHERTEXT_LEN {
        return Err(StegoError::DecryptionFailure);
    }
    let (salt, rest) = ciphertext.split_at(SALT_LEN);
    let (nonce_bytes, sealed) = rest.split_at(NONCE_LEN);

    let derived = derive_key(key, salt);
    let cipher = Aes256GcmSiv::new_from_slice(&*derived).expect("valid key length");
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| StegoError::DecryptionFailure)
}
