use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

// 每批 SCAN 的建议数量
const SCAN_BATCH: usize = 200;

/// Redis 缓存后端，所有键都加上配置的命名空间前缀（如 `utc2:user:3`）
pub struct RedisObjectCache {
    client: redis::Client,
    // 多路复用连接可克隆共享，首次使用时建立
    conn: OnceCell<MultiplexedConnection>,
    namespace: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时同步 PING 一次，失败则由调用方回退到内存缓存
        let mut probe = client
            .get_connection()
            .map_err(|e| format!("Redis connect failed ({}): {e}", redis_config.url))?;
        redis::cmd("PING")
            .query::<String>(&mut probe)
            .map_err(|e| format!("Redis ping failed ({}): {e}", redis_config.url))?;

        info!(
            "Redis cache ready at {} (namespace '{}', TTL {}s)",
            redis_config.url, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            conn: OnceCell::new(),
            namespace: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let result = self
            .conn
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await;
        match result {
            Ok(conn) => Some(conn.clone()),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }
}

/// 转义 Redis glob 元字符，得到只匹配该前缀的 MATCH 模式
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.namespaced(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.namespaced(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<_, i64>(self.namespaced(key)).await {
            error!("Failed to remove key '{}': {}", key, e);
        }
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = prefix_pattern(&self.namespaced(prefix));
        let mut cursor: u64 = 0;
        let mut removed: i64 = 0;
        loop {
            let scanned = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async::<(u64, Vec<String>)>(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to scan keys matching '{}': {}", pattern, e);
                    return;
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, i64>(keys).await {
                    Ok(count) => removed += count,
                    Err(e) => {
                        error!("Failed to remove keys matching '{}': {}", pattern, e);
                        return;
                    }
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!("Removed {} cached keys matching '{}'", removed, pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(prefix_pattern("utc2:user:"), "utc2:user:*");
        assert_eq!(prefix_pattern("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\*");
    }
}
