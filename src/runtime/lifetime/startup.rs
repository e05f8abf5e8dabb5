use crate::cache::{CompressedCache, ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::{generate_random_password, hash_password};
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub compressed_cache: CompressedCache,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> io::Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(io::Error::other(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 用户表为空时创建默认管理员。返回新建的管理员
pub async fn seed_admin_with_password(
    storage: &Arc<dyn Storage>,
    password: &str,
) -> Option<User> {
    match storage.count_users(None).await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return None;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return None;
        }
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return None;
        }
    };

    let admin_request = CreateUserRequest {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password_hash,
        role: UserRole::Admin,
        full_name: "Administrator".to_string(),
        phone: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
            Some(user)
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
            None
        }
    }
}

/// 密码优先取 ADMIN_PASSWORD，否则随机生成并打印一次
async fn seed_admin(storage: &Arc<dyn Storage>) {
    let (password, generated) = match std::env::var("ADMIN_PASSWORD") {
        Ok(pwd) if !pwd.is_empty() => (pwd, false),
        _ => (generate_random_password(16), true),
    };

    if seed_admin_with_password(storage, &password).await.is_some() && generated {
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", password);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和上传目录
pub async fn prepare_server_startup() -> io::Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .map_err(|e| io::Error::other(format!("Failed to create storage backend: {e}")))?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    let upload_dir = &AppConfig::get().upload.dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    debug!("Upload directory ready at {}", upload_dir);

    let cache = create_cache().await?;
    let compressed_cache = CompressedCache::new(cache);
    warn!("Cache backend initialized");

    Ok(StartupContext {
        storage,
        compressed_cache,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::password::verify_password;

    #[tokio::test]
    async fn test_seed_admin_only_when_empty() {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::with_url("sqlite::memory:").await.unwrap());

        let admin = seed_admin_with_password(&storage, "first-password")
            .await
            .expect("admin should be seeded");
        assert_eq!(admin.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(admin.role, UserRole::Admin);
        assert!(verify_password("first-password", &admin.password_hash));

        assert!(
            seed_admin_with_password(&storage, "second-password")
                .await
                .is_none()
        );
        assert_eq!(storage.count_users(None).await.unwrap(), 1);
    }
}
