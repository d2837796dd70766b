//! 原子写入工具
//!
//! 解密后的附件先写入同目录临时文件，成功后再 rename 到目标路径，
//! 保证目标路径要么是完整明文，要么保持原状。

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rand::{RngCore, rngs::OsRng};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 原子写文件
///
/// 流程：
/// 1. 在目标目录创建临时文件并写入全部内容；
/// 2. fsync 后使用 rename 替换目标文件；
/// 3. 任一步失败都会清理临时文件。
pub fn write_atomic(target: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target path has no parent directory",
            ));
        }
    };

    fs::create_dir_all(parent)?;

    let tmp_path = build_tmp_path(parent, target.file_name());

    let result = (|| {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(data)?;
        tmp_file.sync_all()?;
        fs::rename(&tmp_path, target)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

fn build_tmp_path(parent: &Path, file_name: Option<&std::ffi::OsStr>) -> PathBuf {
    let base_name = file_name
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("capsule-attachment");

    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);

    parent.join(format!(
        ".{base_name}.tmp-{}-{counter}-{:016x}",
        std::process::id(),
        OsRng.next_u64()
    ))
}
