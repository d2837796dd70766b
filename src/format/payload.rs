//! 加密结果（EncryptedPayload）
//!
//! 内存中 iv / tag 为定长数组，仅在序列化边界转换为 hex。
//! 序列化字段名与胶囊记录保持一致：`encrypted` / `iv` / `tag`。

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::crypto::aead::{NONCE_LEN, TAG_LEN};
use crate::error::{CapsuleError, CapsuleResult};

/// 一次 AES-256-GCM 加密的完整输出
///
/// 文本、元数据与文件共用此结构，区别仅在于加密时绑定的 AAD。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(rename = "encrypted", alias = "ciphertext", with = "hex_bytes")]
    pub ciphertext: Vec<u8>,

    #[serde(with = "hex_array")]
    pub iv: [u8; NONCE_LEN],

    #[serde(alias = "authTag", with = "hex_array")]
    pub tag: [u8; TAG_LEN],
}

impl EncryptedPayload {
    /// 从三段 hex 字符串还原
    ///
    /// 任一字段格式或长度不合法都视为解密失败。
    /// 与序列化边界一致，hex 必须精确，不做去空白处理。
    pub fn from_hex(ciphertext: &str, iv: &str, tag: &str) -> CapsuleResult<Self> {
        let ciphertext = hex::decode(ciphertext).map_err(|_| CapsuleError::Decryption)?;

        let mut iv_bytes = [0u8; NONCE_LEN];
        hex::decode_to_slice(iv, &mut iv_bytes).map_err(|_| CapsuleError::Decryption)?;

        let mut tag_bytes = [0u8; TAG_LEN];
        hex::decode_to_slice(tag, &mut tag_bytes).map_err(|_| CapsuleError::Decryption)?;

        Ok(Self {
            ciphertext,
            iv: iv_bytes,
            tag: tag_bytes,
        })
    }

    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }

    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }

    pub fn tag_hex(&self) -> String {
        hex::encode(self.tag)
    }
}

mod hex_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(&encoded).map_err(de::Error::custom)
    }
}

mod hex_array {
    use super::*;

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let mut bytes = [0u8; N];
        hex::decode_to_slice(&encoded, &mut bytes).map_err(de::Error::custom)?;
        Ok(bytes)
    }
}
