pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod fs;
pub mod key;
pub mod record;
pub mod service;

pub use config::{EncryptionConfig, MasterKey};
pub use crypto::aead::ContentContext;
pub use error::{CapsuleError, CapsuleResult};
pub use format::content::StoredContent;
pub use format::payload::EncryptedPayload;
pub use key::CapsuleKey;
pub use record::CapsuleRecord;
pub use service::EnvelopeService;
