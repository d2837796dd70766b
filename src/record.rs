//! 胶囊记录的创建与读取
//!
//! 连接加密服务与持久化层：
//! - 创建：生成随机密钥，加密文本，密钥以 hex 存入 `privacy.encryptionKey`
//! - 读取：先检查解锁状态，再解密
//! - 返回客户端前必须移除密钥字段

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CapsuleError, CapsuleResult};
use crate::format::content::StoredContent;
use crate::key::CapsuleKey;
use crate::service::EnvelopeService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockState {
    pub is_unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<CapsuleKey>,
}

/// 持久化形态的胶囊记录（包含密钥）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleRecord {
    pub id: String,
    pub owner_id: String,
    pub content: StoredContent,
    #[serde(default)]
    pub unlock: UnlockState,
    #[serde(default)]
    pub privacy: PrivacySettings,
}

impl CapsuleRecord {
    /// 创建新胶囊：随机密钥 + 文本加密，初始为锁定状态
    pub fn seal(
        service: &EnvelopeService,
        id: impl Into<String>,
        owner_id: impl Into<String>,
        plaintext: &str,
    ) -> CapsuleResult<Self> {
        let key = service.generate_key();
        let payload = service.encrypt_text(plaintext, &key)?;

        let record = Self {
            id: id.into(),
            owner_id: owner_id.into(),
            content: StoredContent::Encrypted(payload),
            unlock: UnlockState::default(),
            privacy: PrivacySettings {
                encryption_key: Some(key),
            },
        };
        debug!(capsule = %record.id, "sealed capsule");
        Ok(record)
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlock.is_unlocked
    }

    /// 标记为已解锁；重复调用保留首次解锁时间
    pub fn unlock(&mut self, now: DateTime<Utc>) {
        if !self.unlock.is_unlocked {
            self.unlock.is_unlocked = true;
            self.unlock.unlocked_at = Some(now);
        }
    }

    /// 读取胶囊文本
    ///
    /// 未解锁时返回 `Locked`，不会触碰密钥或内容。
    /// 加密内容缺少密钥视为 `InvalidKey`，内容损坏视为 `Decryption`。
    pub fn open(&self, service: &EnvelopeService) -> CapsuleResult<String> {
        if !self.unlock.is_unlocked {
            return Err(CapsuleError::Locked);
        }

        match &self.content {
            StoredContent::Plain(text) => Ok(text.clone()),
            StoredContent::Malformed { .. } => {
                warn!(capsule = %self.id, "stored capsule content is malformed");
                Err(CapsuleError::Decryption)
            }
            StoredContent::Encrypted(payload) => {
                let key = self
                    .privacy
                    .encryption_key
                    .as_ref()
                    .ok_or(CapsuleError::InvalidKey)?;
                service.decrypt_text(payload, key)
            }
        }
    }

    /// 返回给客户端的 JSON，已移除 `privacy.encryptionKey`
    pub fn to_client_json(&self) -> CapsuleResult<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(privacy) = value.get_mut("privacy").and_then(|p| p.as_object_mut()) {
            privacy.remove("encryptionKey");
        }
        Ok(value)
    }
}
