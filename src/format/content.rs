//! 胶囊文本内容的存储形态
//!
//! 记录中的文本以 `{ text, iv?, tag? }` 形式保存：
//! - `iv` 与 `tag` 均缺失：明文内容
//! - `iv` 与 `tag` 均存在：`text` 为 hex 密文
//! - 只存在其一或 hex 不合法：`Malformed`，读取时按解密失败处理
//!
//! 解析本身不会失败，损坏的内容保留原样，
//! 由读取方在解锁检查之后再报告错误。

use serde::{Deserialize, Serialize};

use crate::format::payload::EncryptedPayload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawContent", into = "RawContent")]
pub enum StoredContent {
    Plain(String),
    Encrypted(EncryptedPayload),
    /// 无法还原为密文的存储内容，原样保留以便回写
    Malformed {
        text: String,
        iv: Option<String>,
        tag: Option<String>,
    },
}

impl StoredContent {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

#[derive(Serialize, Deserialize)]
struct RawContent {
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

impl From<RawContent> for StoredContent {
    fn from(raw: RawContent) -> Self {
        match (raw.iv, raw.tag) {
            (None, None) => Self::Plain(raw.text),
            (Some(iv), Some(tag)) => match EncryptedPayload::from_hex(&raw.text, &iv, &tag) {
                Ok(payload) => Self::Encrypted(payload),
                Err(_) => Self::Malformed {
                    text: raw.text,
                    iv: Some(iv),
                    tag: Some(tag),
                },
            },
            (iv, tag) => Self::Malformed {
                text: raw.text,
                iv,
                tag,
            },
        }
    }
}

impl From<StoredContent> for RawContent {
    fn from(content: StoredContent) -> Self {
        match content {
            StoredContent::Plain(text) => Self {
                text,
                iv: None,
                tag: None,
            },
            StoredContent::Encrypted(payload) => Self {
                text: payload.ciphertext_hex(),
                iv: Some(payload.iv_hex()),
                tag: Some(payload.tag_hex()),
            },
            StoredContent::Malformed { text, iv, tag } => Self { text, iv, tag },
        }
    }
}
