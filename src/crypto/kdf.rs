//! 确定性胶囊密钥派生（KDF）
//!
//! 基于 PBKDF2-HMAC-SHA512，从主密钥与 `"{user_id}-{capsule_id}"`
//! 派生 32 字节密钥。相同输入始终得到相同密钥，无需持久化。
//!
//! 注意：
//! - 默认流程仍使用随机密钥（见 `CapsuleKey::generate`）
//! - 主密钥必须显式配置，不存在任何内置回退值

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroize;

use crate::key::{CapsuleKey, KEY_LEN};

/// 默认迭代次数
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// 拼接派生使用的 salt
pub fn capsule_salt(user_id: &str, capsule_id: &str) -> String {
    format!("{user_id}-{capsule_id}")
}

/// 根据主密钥派生胶囊密钥
pub fn derive_capsule_key(
    master_key: &[u8],
    user_id: &str,
    capsule_id: &str,
    iterations: u32,
) -> CapsuleKey {
    let salt = capsule_salt(user_id, capsule_id);

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha512>(master_key, salt.as_bytes(), iterations, &mut bytes);

    let key = CapsuleKey::from_bytes(bytes);
    bytes.zeroize();
    key
}
