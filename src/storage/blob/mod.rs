//! 文档内容的 blob 存储
//!
//! 数据库只保存 `storage_key`，文件字节由 `BlobStore` 负责读写。

mod local;

pub use local::LocalBlobStore;

use crate::errors::Result;

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: &[u8]) -> Result<()>;
    /// 不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// 删除不存在的 key 视为成功
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 生成新的存储键：`<时间戳>-<uuid><扩展名>`
pub fn generate_storage_key(extension: &str) -> String {
    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        uuid::Uuid::new_v4().simple(),
        extension.to_ascii_lowercase()
    )
}

/// 存储键只允许字母、数字、`-`、`_`、`.`，且不能以 `.` 开头
pub(crate) fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_safe_and_unique() {
        let a = generate_storage_key(".PDF");
        let b = generate_storage_key(".PDF");
        assert!(a.ends_with(".pdf"));
        assert_ne!(a, b);
        assert!(is_safe_key(&a));
    }

    #[test]
    fn test_unsafe_keys() {
        assert!(!is_safe_key(""));
        assert!(!is_safe_key("../etc/passwd"));
        assert!(!is_safe_key("a/b.pdf"));
        assert!(!is_safe_key(".hidden"));
    }
}
