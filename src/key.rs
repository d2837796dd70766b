//! 胶囊密钥（CapsuleKey）
//!
//! 每个胶囊在创建时生成一把独立的 256-bit 随机密钥，
//! 以 hex 字符串形式与记录一同持久化。
//!
//! 约束：
//! - 密钥创建后不可变
//! - 离开作用域自动清零
//! - Debug 输出不包含密钥内容

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CapsuleError, CapsuleResult};

/// 密钥长度（256 bit）
pub const KEY_LEN: usize = 32;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CapsuleKey {
    bytes: [u8; KEY_LEN],
}

impl CapsuleKey {
    /// 使用操作系统 CSPRNG 生成新密钥
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// 解析持久化的 hex 密钥（恰好 64 个 hex 字符，不做去空白处理）
    pub fn from_hex(encoded: &str) -> CapsuleResult<Self> {
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(encoded, &mut bytes).map_err(|_| CapsuleError::InvalidKey)?;
        Ok(Self { bytes })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// 常量时间比较
impl PartialEq for CapsuleKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for CapsuleKey {}

impl fmt::Debug for CapsuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapsuleKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl Serialize for CapsuleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CapsuleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(|_| de::Error::custom("invalid capsule key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_preserves_key() {
        let key = CapsuleKey::generate();
        let parsed = CapsuleKey::from_hex(&key.to_hex()).expect("parse hex key");
        assert_eq!(parsed, key);
    }

    #[test]
    fn rejects_short_or_non_hex_keys() {
        assert!(matches!(CapsuleKey::from_hex("abcd"), Err(CapsuleError::InvalidKey)));
        assert!(matches!(
            CapsuleKey::from_hex(&"zz".repeat(KEY_LEN)),
            Err(CapsuleError::InvalidKey)
        ));
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        let key = CapsuleKey::generate();
        let padded = format!(" {}\n", key.to_hex());
        assert!(matches!(CapsuleKey::from_hex(&padded), Err(CapsuleError::InvalidKey)));
    }

    #[test]
    fn equality_compares_key_bytes() {
        let a = CapsuleKey::from_bytes([7u8; KEY_LEN]);
        let mut other = [7u8; KEY_LEN];
        assert_eq!(a, CapsuleKey::from_bytes(other));

        other[KEY_LEN - 1] = 8;
        assert_ne!(a, CapsuleKey::from_bytes(other));
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = CapsuleKey::from_bytes([0xab; KEY_LEN]);
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("abab"));
        assert!(rendered.contains("REDACTED"));
    }
}
