#![allow(dead_code)]

use capsule_engine::{EncryptionConfig, EnvelopeService, MasterKey};

/// 测试用低迭代次数，避免 PBKDF2 拖慢测试
pub const TEST_ITERATIONS: u32 = 1_000;

pub fn service_with_master(master: &str) -> EnvelopeService {
    let config = EncryptionConfig::new(MasterKey::new(master).expect("master key"))
        .with_kdf_iterations(TEST_ITERATIONS)
        .expect("iterations");
    EnvelopeService::new(config)
}

pub fn service() -> EnvelopeService {
    service_with_master("test-master-secret")
}
