//! 附件加解密与完整性校验

mod common;

use std::fs;

use capsule_engine::CapsuleError;
use tempfile::tempdir;

#[test]
fn binary_and_empty_buffers_roundtrip() {
    let service = common::service();
    let key = service.generate_key();

    let binary: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    for data in [Vec::new(), vec![0u8], binary] {
        let payload = service.encrypt_file(&data, &key).expect("encrypt file");
        let decrypted = service.decrypt_file(&payload, &key).expect("decrypt file");
        assert_eq!(decrypted, data);
    }
}

#[test]
fn disk_roundtrip_writes_plaintext_to_output() {
    let service = common::service();
    let key = service.generate_key();

    let temp = tempdir().expect("create temp dir");
    let input = temp.path().join("photo.jpg");
    let output = temp.path().join("restored/photo.jpg");
    fs::write(&input, b"\xff\xd8\xff\xe0 not really a jpeg").expect("write input");

    let payload = service.encrypt_file_from_disk(&input, &key).expect("encrypt from disk");
    let written = service
        .decrypt_file_to_disk(&payload, &key, &output)
        .expect("decrypt to disk");

    assert_eq!(written, output);
    assert_eq!(
        fs::read(&output).expect("read output"),
        fs::read(&input).expect("read input")
    );
}

#[test]
fn failed_decrypt_leaves_no_output() {
    let service = common::service();
    let key = service.generate_key();

    let temp = tempdir().expect("create temp dir");
    let output = temp.path().join("restored.bin");

    let payload = service.encrypt_file(b"attachment", &key).expect("encrypt file");
    let result = service.decrypt_file_to_disk(&payload, &service.generate_key(), &output);

    assert!(matches!(result, Err(CapsuleError::Decryption)));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(temp.path()).expect("list dir").count(), 0);
}

#[test]
fn missing_input_surfaces_io_error() {
    let service = common::service();
    let temp = tempdir().expect("create temp dir");

    let result = service.encrypt_file_from_disk(&temp.path().join("missing"), &service.generate_key());
    assert!(matches!(result, Err(CapsuleError::Io(_))));
}

#[test]
fn integrity_check_detects_single_byte_change() {
    let service = common::service();
    let mut data = b"capsule attachment bytes".to_vec();

    let hash = service.hash_sensitive_data(std::str::from_utf8(&data).expect("utf8"));
    assert!(service.verify_file_integrity(&data, &hash));

    data[3] ^= 0x01;
    assert!(!service.verify_file_integrity(&data, &hash));
}

#[test]
fn hash_is_lowercase_hex_sha256() {
    let service = common::service();
    let hash = service.hash_sensitive_data("");
    assert_eq!(
        hash,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn secure_random_has_requested_length() {
    let service = common::service();

    let a = service.generate_secure_random(16);
    let b = service.generate_secure_random(16);

    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
    assert_eq!(service.generate_secure_random(0), "");
}
