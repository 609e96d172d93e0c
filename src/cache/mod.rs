//! 缓存层
//!
//! 通过插件注册表在启动时按配置选择 Moka（内存）或 Redis 后端。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    /// 删除以 `prefix` 开头的全部键
    async fn invalidate_prefix(&self, prefix: &str);
}

/// 已认证用户快照的键前缀
pub const USER_CACHE_PREFIX: &str = "user:";

/// 已认证用户的缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("{USER_CACHE_PREFIX}{user_id}")
}

/// 声明缓存插件，生成 `register_plugin()` 供启动时调用
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub fn register_plugin() {
            let constructor: $crate::cache::register::ObjectCacheConstructor =
                std::sync::Arc::new(|| {
                    let fut: $crate::cache::register::BoxedObjectCacheFuture =
                        Box::pin(async {
                            let cache = <$ty>::new()
                                .map_err($crate::errors::PortalError::cache_connection)?;
                            Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::PortalError>(
                                Box::new(cache),
                            )
                        });
                    fut
                });
            $crate::cache::register::register_object_cache_plugin($name, constructor);
        }
    };
}

/// 注册内置缓存插件
pub fn register_builtin_plugins() {
    object_cache::moka::register_plugin();
    object_cache::redis::register_plugin();
}
