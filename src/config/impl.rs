use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 未配置 JWT_SECRET 时使用的占位密钥
pub const DEFAULT_JWT_SECRET: &str = "default_jwt_secret_change_me";

/// 逗号分隔的环境变量转为列表
fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("app.system_name", "Schools24")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.unix_socket_path", "")?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 16)?
            .set_default("server.timeouts.client_request", 30_000)?
            .set_default("server.timeouts.client_disconnect", 5_000)?
            .set_default("server.timeouts.keep_alive", 75)?
            .set_default("server.limits.max_payload_size", 10 * 1024 * 1024)?
            .set_default("jwt.secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("jwt.refresh_expiration_days", 7)?
            .set_default("database.url", "sqlite://schools24.db?mode=rwc")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout", 30)?
            .set_default("cache.type", "moka")?
            .set_default("cache.default_ttl", 3600)?
            .set_default("cache.redis.url", "redis://127.0.0.1:6379")?
            .set_default("cache.redis.key_prefix", "schools24:")?
            .set_default("cache.redis.pool_size", 10)?
            .set_default("cache.memory.max_capacity", 64 * 1024 * 1024)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default(
                "cors.allowed_methods",
                vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"],
            )?
            .set_default(
                "cors.allowed_headers",
                vec!["Origin", "Content-Type", "Accept", "Authorization"],
            )?
            .set_default("cors.max_age", 3600)?
            .set_default("rate_limit.requests_per_min", 100)?
            .set_default("rate_limit.burst", 20)?
            .set_default("rate_limit.cleanup_interval_secs", 600)?
            .set_default("rate_limit.trust_proxy_headers", false)?
            .set_default("upload.dir", "./uploads")?
            .set_default("upload.max_size", 10 * 1024 * 1024)?
            .set_default(
                "upload.allowed_types",
                vec![".jpg", ".jpeg", ".png", ".gif", ".webp", ".pdf"],
            )?
            .set_default("argon2.memory_cost", 19_456)?
            .set_default("argon2.time_cost", 2)?
            .set_default("argon2.parallelism", 1)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("SCHOOLS24")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // 兼容扁平环境变量
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option(
                "jwt.expiration_hours",
                std::env::var("JWT_EXPIRATION_HOURS").ok(),
            )?
            .set_override_option(
                "jwt.refresh_expiration_days",
                std::env::var("JWT_REFRESH_EXPIRATION_DAYS").ok(),
            )?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option(
                "database.pool_size",
                std::env::var("DATABASE_MAX_CONNECTIONS").ok(),
            )?
            .set_override_option("cache.type", std::env::var("CACHE_TYPE").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("REDIS_TTL").ok())?
            .set_override_option(
                "rate_limit.requests_per_min",
                std::env::var("RATE_LIMIT_REQUESTS_PER_MIN").ok(),
            )?
            .set_override_option("rate_limit.burst", std::env::var("RATE_LIMIT_BURST").ok())?
            .set_override_option(
                "rate_limit.trust_proxy_headers",
                std::env::var("RATE_LIMIT_TRUST_PROXY").ok(),
            )?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .set_override_option(
                "providers.payment.key_id",
                std::env::var("RAZORPAY_KEY_ID").ok(),
            )?
            .set_override_option(
                "providers.payment.key_secret",
                std::env::var("RAZORPAY_KEY_SECRET").ok(),
            )?
            .set_override_option(
                "providers.sms.account_sid",
                std::env::var("TWILIO_ACCOUNT_SID").ok(),
            )?
            .set_override_option(
                "providers.sms.auth_token",
                std::env::var("TWILIO_AUTH_TOKEN").ok(),
            )?
            .set_override_option(
                "providers.sms.from_number",
                std::env::var("TWILIO_PHONE_NUMBER").ok(),
            )?
            .set_override_option(
                "providers.email.api_key",
                std::env::var("SENDGRID_API_KEY").ok(),
            )?
            .set_override_option(
                "providers.email.from_address",
                std::env::var("SENDGRID_FROM_EMAIL").ok(),
            )?
            .set_override_option(
                "providers.push.credentials_path",
                std::env::var("FIREBASE_CREDENTIALS_PATH").ok(),
            )?
            .set_override_option("cors.allowed_origins", env_list("CORS_ALLOWED_ORIGINS"))?
            .set_override_option("cors.allowed_methods", env_list("CORS_ALLOWED_METHODS"))?
            .set_override_option("cors.allowed_headers", env_list("CORS_ALLOWED_HEADERS"))?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let config = AppConfig::load().expect("defaults should load");
        assert!(config.server.workers >= 1);
        assert!(config.rate_limit.burst > 0);
        assert!(config.jwt.expiration_hours > 0);
        assert!(!config.upload.allowed_types.is_empty());
        assert!(!config.rate_limit.trust_proxy_headers);
        assert!(config.providers.payment.key_id.is_empty());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::load().expect("defaults should load");
        assert_eq!(
            config.server_bind_address(),
            format!("{}:{}", config.server.host, config.server.port)
        );
    }
}
