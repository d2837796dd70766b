pub mod aead;
pub mod digest;
pub mod kdf;
