//! 胶囊信封加密服务
//!
//! 对外提供胶囊文本、附件与元数据的对称认证加密，
//! 以及密钥生成、确定性派生和完整性校验。
//!
//! 服务本身除不可变配置外无状态，可在多线程间共享。
//! 解锁状态检查不在本层，由读取记录的调用方负责。

use std::fs;
use std::path::{Path, PathBuf};

use rand::{RngCore, rngs::OsRng};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::EncryptionConfig;
use crate::crypto::aead::{self, ContentContext, NONCE_LEN};
use crate::crypto::{digest, kdf};
use crate::error::{CapsuleError, CapsuleResult};
use crate::format::payload::EncryptedPayload;
use crate::fs::atomic::write_atomic;
use crate::key::CapsuleKey;

/// `generate_secure_random` 的默认字节数
pub const DEFAULT_RANDOM_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct EnvelopeService {
    config: EncryptionConfig,
}

impl EnvelopeService {
    pub fn new(config: EncryptionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    /// 为新胶囊生成随机密钥（默认流程）
    pub fn generate_key(&self) -> CapsuleKey {
        CapsuleKey::generate()
    }

    pub fn generate_iv(&self) -> [u8; NONCE_LEN] {
        aead::generate_nonce()
    }

    /// 加密胶囊文本，AAD 为 `soulsafe-capsule`
    pub fn encrypt_text(&self, plaintext: &str, key: &CapsuleKey) -> CapsuleResult<EncryptedPayload> {
        let payload = aead::seal(key, ContentContext::Text, plaintext.as_bytes())?;
        debug!(len = plaintext.len(), "encrypted capsule text");
        Ok(payload)
    }

    /// 解密胶囊文本
    ///
    /// 认证失败或结果不是合法 UTF-8 时返回 `CapsuleError::Decryption`。
    pub fn decrypt_text(&self, payload: &EncryptedPayload, key: &CapsuleKey) -> CapsuleResult<String> {
        let plaintext = aead::open(key, ContentContext::Text, payload).inspect_err(|_| {
            warn!("capsule text failed authentication");
        })?;

        String::from_utf8(plaintext).map_err(|_| CapsuleError::Decryption)
    }

    /// 加密附件，AAD 为 `soulsafe-file`
    pub fn encrypt_file(&self, data: &[u8], key: &CapsuleKey) -> CapsuleResult<EncryptedPayload> {
        let payload = aead::seal(key, ContentContext::File, data)?;
        debug!(len = data.len(), "encrypted capsule file");
        Ok(payload)
    }

    pub fn decrypt_file(&self, payload: &EncryptedPayload, key: &CapsuleKey) -> CapsuleResult<Vec<u8>> {
        aead::open(key, ContentContext::File, payload).inspect_err(|_| {
            warn!("capsule file failed authentication");
        })
    }

    pub fn encrypt_file_from_disk(&self, path: &Path, key: &CapsuleKey) -> CapsuleResult<EncryptedPayload> {
        let data = fs::read(path)?;
        self.encrypt_file(&data, key)
    }

    /// 解密附件并原子写入 `output`
    ///
    /// 解密失败时不会在 `output` 留下任何内容。
    pub fn decrypt_file_to_disk(
        &self,
        payload: &EncryptedPayload,
        key: &CapsuleKey,
        output: &Path,
    ) -> CapsuleResult<PathBuf> {
        let data = self.decrypt_file(payload, key)?;
        write_atomic(output, &data)?;
        debug!(path = %output.display(), "wrote decrypted capsule file");
        Ok(output.to_path_buf())
    }

    /// 从主密钥派生确定性的胶囊密钥
    ///
    /// PBKDF2-HMAC-SHA512，salt 为 `"{user_id}-{capsule_id}"`。
    pub fn generate_capsule_key(&self, user_id: &str, capsule_id: &str) -> CapsuleKey {
        kdf::derive_capsule_key(
            self.config.master_key.as_bytes(),
            user_id,
            capsule_id,
            self.config.kdf_iterations,
        )
    }

    pub fn hash_sensitive_data(&self, data: &str) -> String {
        digest::sha256_hex(data.as_bytes())
    }

    /// 生成 `len` 字节随机数并以 hex 返回
    pub fn generate_secure_random(&self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn verify_file_integrity(&self, data: &[u8], expected_hash: &str) -> bool {
        let ok = digest::verify_sha256(data, expected_hash);
        if !ok {
            warn!(len = data.len(), "file integrity check failed");
        }
        ok
    }

    pub fn encrypt_metadata<T: Serialize + ?Sized>(
        &self,
        metadata: &T,
        key: &CapsuleKey,
    ) -> CapsuleResult<EncryptedPayload> {
        let json = serde_json::to_string(metadata)?;
        self.encrypt_text(&json, key)
    }

    pub fn decrypt_metadata<T: DeserializeOwned>(
        &self,
        payload: &EncryptedPayload,
        key: &CapsuleKey,
    ) -> CapsuleResult<T> {
        let json = self.decrypt_text(payload, key)?;
        Ok(serde_json::from_str(&json)?)
    }
}
