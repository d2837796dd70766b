//! SHA-256 指纹与文件完整性校验

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// 计算 SHA-256 并返回 hex 字符串
///
/// 仅用于指纹 / 完整性校验，不可用于口令存储。
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// 校验数据的 SHA-256 是否与期望值一致
///
/// 期望值必须恰好是 64 位 hex（不去除空白），否则直接返回 false。
/// 比较使用常量时间，避免计时侧信道。
pub fn verify_sha256(data: &[u8], expected_hex: &str) -> bool {
    let mut expected = [0u8; 32];
    if hex::decode_to_slice(expected_hex, &mut expected).is_err() {
        return false;
    }

    let actual = Sha256::digest(data);
    actual.as_slice().ct_eq(&expected[..]).into()
}
