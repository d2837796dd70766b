//! capsule 命令行入口
//!
//! 面向开发与运维的调试工具，所有逻辑委托给 `EnvelopeService`。
//!
//! 启动时必须设置 `ENCRYPTION_MASTER_KEY`，否则直接退出。
//! 日志级别由 `RUST_LOG` 控制。
//!
//! 用法示例：
//!   capsule keygen
//!   capsule encrypt-text --key <hex> "Happy 30th birthday, future me!"
//!   capsule decrypt-text --key <hex> < payload.json
//!   capsule derive-key --user <id> --capsule <id>

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use capsule_engine::{CapsuleKey, EncryptedPayload, EncryptionConfig, EnvelopeService};

#[derive(Parser)]
#[command(name = "capsule", version, about = "Capsule envelope encryption tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 生成随机胶囊密钥
    Keygen,

    /// 从主密钥派生确定性胶囊密钥
    DeriveKey {
        #[arg(long)]
        user: String,
        #[arg(long)]
        capsule: String,
    },

    /// 加密文本（未给出时从 stdin 读取），输出 JSON
    EncryptText {
        #[arg(long)]
        key: String,
        text: Option<String>,
    },

    /// 从 stdin 读取 JSON 并解密文本
    DecryptText {
        #[arg(long)]
        key: String,
    },

    /// 加密附件，输出 JSON 到 output
    EncryptFile {
        #[arg(long)]
        key: String,
        input: PathBuf,
        output: PathBuf,
    },

    /// 解密 JSON 附件到 output
    DecryptFile {
        #[arg(long)]
        key: String,
        input: PathBuf,
        output: PathBuf,
    },

    /// 计算 SHA-256
    Hash { text: String },

    /// 校验文件 SHA-256
    Verify { file: PathBuf, hash: String },

    /// 生成随机 hex 字符串
    Random {
        #[arg(long, default_value_t = capsule_engine::service::DEFAULT_RANDOM_LEN)]
        len: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = EncryptionConfig::from_env().context("failed to load encryption config")?;
    let service = EnvelopeService::new(config);

    match cli.command {
        Command::Keygen => {
            println!("{}", service.generate_key().to_hex());
        }
        Command::DeriveKey { user, capsule } => {
            println!("{}", service.generate_capsule_key(&user, &capsule).to_hex());
        }
        Command::EncryptText { key, text } => {
            let key = parse_key(&key)?;
            let text = match text {
                Some(t) => t,
                None => read_stdin()?,
            };
            let payload = service.encrypt_text(&text, &key)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::DecryptText { key } => {
            let key = parse_key(&key)?;
            let payload: EncryptedPayload =
                serde_json::from_str(&read_stdin()?).context("invalid payload JSON")?;
            print!("{}", service.decrypt_text(&payload, &key)?);
        }
        Command::EncryptFile { key, input, output } => {
            let key = parse_key(&key)?;
            let payload = service
                .encrypt_file_from_disk(&input, &key)
                .with_context(|| format!("failed to encrypt {}", input.display()))?;
            fs::write(&output, serde_json::to_vec(&payload)?)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        Command::DecryptFile { key, input, output } => {
            let key = parse_key(&key)?;
            let raw = fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
            let payload: EncryptedPayload = serde_json::from_slice(&raw).context("invalid payload JSON")?;
            service.decrypt_file_to_disk(&payload, &key, &output)?;
        }
        Command::Hash { text } => {
            println!("{}", service.hash_sensitive_data(&text));
        }
        Command::Verify { file, hash } => {
            let data = fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            if !service.verify_file_integrity(&data, &hash) {
                eprintln!("integrity check failed");
                return Ok(ExitCode::FAILURE);
            }
            println!("ok");
        }
        Command::Random { len } => {
            println!("{}", service.generate_secure_random(len));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_key(encoded: &str) -> Result<CapsuleKey> {
    CapsuleKey::from_hex(encoded).context("key must be 64 hex characters")
}

fn read_stdin() -> Result<String> {
    read_all(io::stdin())
}

/// 原样读取全部输入，不去除末尾换行
fn read_all<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("input is not valid UTF-8")?;
    Ok(buf)
}
