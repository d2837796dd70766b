//! AEAD 加解密模块
//!
//! 基于 AES-256-GCM 实现 AEAD（Authenticated Encryption
//! with Associated Data）。
//!
//! 功能说明：
//! - 提供“加密 + 完整性校验”一体化能力
//! - 解密失败即表示：密钥错误、AAD 不匹配 或 数据被篡改
//! - 每次加密使用全新随机 nonce，严禁复用
//!
//! 安全约束：
//! - 不允许在未校验通过的情况下输出任何明文
//! - 文本与文件使用不同的 AAD，防止跨上下文混用密文

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use rand::{RngCore, rngs::OsRng};

use crate::error::{CapsuleError, CapsuleResult};
use crate::format::payload::EncryptedPayload;
use crate::key::CapsuleKey;

/// AES-GCM 使用的 nonce 长度（96 bit，标准推荐值）
pub const NONCE_LEN: usize = 12;

/// GCM 认证标签长度（128 bit）
pub const TAG_LEN: usize = 16;

/// 文本内容绑定的 AAD
pub const TEXT_AAD: &[u8] = b"soulsafe-capsule";

/// 文件内容绑定的 AAD
pub const FILE_AAD: &[u8] = b"soulsafe-file";

/// 密文所属的上下文，决定加解密时绑定的 AAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentContext {
    Text,
    File,
}

impl ContentContext {
    pub fn aad(self) -> &'static [u8] {
        match self {
            Self::Text => TEXT_AAD,
            Self::File => FILE_AAD,
        }
    }
}

/// 生成随机 nonce（96 bit）
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// 使用 AES-256-GCM 加密数据
///
/// #### 参数
/// - `key`：胶囊密钥
/// - `context`：决定绑定的 AAD
/// - `plaintext`：待加密的数据
///
/// #### 安全说明
/// - 每次调用都会生成全新的随机 nonce
pub fn seal(
    key: &CapsuleKey,
    context: ContentContext,
    plaintext: &[u8],
) -> CapsuleResult<EncryptedPayload> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let iv = generate_nonce();

    let mut sealed = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: context.aad(),
            },
        )
        .map_err(|_| CapsuleError::Encryption)?;

    // sealed = [cipher_body | tag]
    if sealed.len() < TAG_LEN {
        return Err(CapsuleError::Encryption);
    }
    let tag_bytes = sealed.split_off(sealed.len() - TAG_LEN);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);

    Ok(EncryptedPayload {
        ciphertext: sealed,
        iv,
        tag,
    })
}

/// 使用 AES-256-GCM 解密数据
///
/// # 错误
/// - 密钥错误、AAD 不匹配或数据被篡改，统一返回 `CapsuleError::Decryption`
pub fn open(
    key: &CapsuleKey,
    context: ContentContext,
    payload: &EncryptedPayload,
) -> CapsuleResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut sealed = Vec::with_capacity(payload.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&payload.ciphertext);
    sealed.extend_from_slice(&payload.tag);

    cipher
        .decrypt(
            Nonce::from_slice(&payload.iv),
            Payload {
                msg: &sealed,
                aad: context.aad(),
            },
        )
        .map_err(|_| CapsuleError::Decryption)
}
