//! 加密服务配置
//!
//! 主密钥必须显式注入：
//! - 代码中构造：`EncryptionConfig::new`
//! - 启动时读取环境变量：`EncryptionConfig::from_env`
//!
//! 未配置 `ENCRYPTION_MASTER_KEY` 时启动直接失败，不存在默认值。

use std::env;
use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::kdf::DEFAULT_ITERATIONS;
use crate::error::{CapsuleError, CapsuleResult};

pub const MASTER_KEY_ENV: &str = "ENCRYPTION_MASTER_KEY";
pub const KDF_ITERATIONS_ENV: &str = "CAPSULE_KDF_ITERATIONS";

/// 确定性派生使用的主密钥
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(Vec<u8>);

impl MasterKey {
    pub fn new(secret: impl Into<Vec<u8>>) -> CapsuleResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CapsuleError::MissingMasterKey);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

#[derive(Debug, Clone)]
pub struct EncryptionConfig {
    pub master_key: MasterKey,
    pub kdf_iterations: u32,
}

impl EncryptionConfig {
    pub fn new(master_key: MasterKey) -> Self {
        Self {
            master_key,
            kdf_iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_kdf_iterations(mut self, iterations: u32) -> CapsuleResult<Self> {
        if iterations == 0 {
            return Err(CapsuleError::Config(
                "kdf iterations must be greater than zero".into(),
            ));
        }
        self.kdf_iterations = iterations;
        Ok(self)
    }

    /// 从进程环境读取配置
    pub fn from_env() -> CapsuleResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> CapsuleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(MASTER_KEY_ENV).ok_or(CapsuleError::MissingMasterKey)?;
        let config = Self::new(MasterKey::new(secret)?);

        match lookup(KDF_ITERATIONS_ENV) {
            Some(raw) => {
                let iterations = raw.trim().parse::<u32>().map_err(|e| {
                    CapsuleError::Config(format!("{KDF_ITERATIONS_ENV} is not a valid u32: {e}"))
                })?;
                config.with_kdf_iterations(iterations)
            }
            None => Ok(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_master_key_fails() {
        let result = EncryptionConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(CapsuleError::MissingMasterKey)));
    }

    #[test]
    fn empty_master_key_fails() {
        let result = EncryptionConfig::from_lookup(lookup_from(&[(MASTER_KEY_ENV, "")]));
        assert!(matches!(result, Err(CapsuleError::MissingMasterKey)));
    }

    #[test]
    fn defaults_to_standard_iterations() {
        let config = EncryptionConfig::from_lookup(lookup_from(&[(MASTER_KEY_ENV, "s3cret")]))
            .expect("load config");
        assert_eq!(config.kdf_iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.master_key.as_bytes(), b"s3cret");
    }

    #[test]
    fn iteration_override_is_validated() {
        let config = EncryptionConfig::from_lookup(lookup_from(&[
            (MASTER_KEY_ENV, "s3cret"),
            (KDF_ITERATIONS_ENV, "2048"),
        ]))
        .expect("load config");
        assert_eq!(config.kdf_iterations, 2048);

        for bad in ["0", "lots"] {
            let result = EncryptionConfig::from_lookup(lookup_from(&[
                (MASTER_KEY_ENV, "s3cret"),
                (KDF_ITERATIONS_ENV, bad),
            ]));
            assert!(matches!(result, Err(CapsuleError::Config(_))));
        }
    }

    #[test]
    fn master_key_debug_is_redacted() {
        let key = MasterKey::new("s3cret").expect("master key");
        assert!(!format!("{key:?}").contains("s3cret"));
    }
}
