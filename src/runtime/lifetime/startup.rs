use actix_web::web;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, USER_CACHE_PREFIX, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::integrations::{GeminiClient, HmsVideoClient, TextGenerator, VideoRoomProvider};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::routes;
use crate::storage::{BlobStore, LocalBlobStore, Storage};
use crate::utils::password::hash_password;

const DEFAULT_ADMIN_EMAIL: &str = "admin@utc2.edu.vn";

/// 服务运行所需的全部共享组件
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub blobs: Arc<dyn BlobStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub video: Arc<dyn VideoRoomProvider>,
}

impl StartupContext {
    /// 注入共享组件并注册全部路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.blobs.clone()))
            .app_data(web::Data::new(self.generator.clone()))
            .app_data(web::Data::new(self.video.clone()))
            .configure(routes::configure_routes)
            .default_service(web::to(routes::not_found));
    }
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => Some(Arc::from(cache)),
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 Moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        warn!("Successfully created {} cache backend", cache_type);
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(PortalError::cache_connection(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 数据库中没有任何用户时创建招生委员会负责人账号
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("Database already has {} user(s), skipping admin seed", count);
        return Ok(());
    }

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_password(16);
        warn!("ADMIN_PASSWORD not set, generated admin password: {}", generated);
        generated
    });

    let admin = storage
        .create_user(CreateUserRequest {
            email,
            password: hash_password(&password)?,
            role: UserRole::TruongBan,
            full_name: "Trưởng ban tuyển sinh".to_string(),
            phone: None,
            department: None,
            avatar_url: None,
        })
        .await?;
    info!("Admin account created (ID: {}, email: {})", admin.id, admin.email);
    Ok(())
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    crate::cache::register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_admin(&storage).await {
        warn!("Admin seed skipped: {}", e);
    }

    let cache = create_cache().await?;
    // 清除上次运行残留的用户快照
    cache.invalidate_prefix(USER_CACHE_PREFIX).await;
    warn!("Cache backend initialized");

    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&config.documents.dir).await?);
    info!("Document blobs stored under {}", config.documents.dir);

    let generator = GeminiClient::new(&config.ai)?;
    if !generator.is_configured() {
        warn!("AI API key not set, report generation is disabled");
    }
    let video = HmsVideoClient::new(&config.video)?;
    if !video.is_configured() {
        warn!("Video credentials not set, room creation is disabled");
    }

    Ok(StartupContext {
        storage,
        cache,
        blobs,
        generator: Arc::new(generator),
        video: Arc::new(video),
    })
}
