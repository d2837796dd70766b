use thiserror::Error;

pub type CapsuleResult<T> = Result<T, CapsuleError>;

#[derive(Debug, Error)]
pub enum CapsuleError {
    #[error("encryption failed")]
    Encryption,

    /// 认证失败、密钥错误、AAD 不匹配、hex 格式错误均归入此类，
    /// 对调用方不可区分。
    #[error("decryption failed")]
    Decryption,

    #[error("metadata serialization failed")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid capsule key")]
    InvalidKey,

    #[error("ENCRYPTION_MASTER_KEY is not set")]
    MissingMasterKey,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("capsule is still locked")]
    Locked,

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl CapsuleError {
    /// 面向终端用户的提示语
    ///
    /// 密码学相关的失败统一返回 "content error"，不暴露具体原因。
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Encryption | Self::Decryption | Self::InvalidKey | Self::Serialization(_) => {
                "content error"
            }
            Self::Locked => "capsule is still locked",
            Self::MissingMasterKey | Self::Config(_) | Self::Io(_) => "internal error",
        }
    }
}
