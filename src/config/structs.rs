use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub upload: UploadConfig,
    pub argon2: Argon2Config,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub expiration_hours: i64,
    pub refresh_expiration_days: i64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

/// 限流配置（令牌桶）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_min: u32,
    pub burst: u32,
    pub cleanup_interval_secs: u64,
    /// 仅在部署于可信反向代理之后时开启，否则客户端可伪造转发头
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,                // 上传目录
    pub max_size: usize,            // 单文件最大字节数
    pub allowed_types: Vec<String>, // 允许的扩展名
}

/// Argon2 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 第三方服务配置，目前只做加载，不发起调用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub payment: PaymentProviderConfig,
    #[serde(default)]
    pub sms: SmsProviderConfig,
    #[serde(default)]
    pub email: EmailProviderConfig,
    #[serde(default)]
    pub push: PushProviderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentProviderConfig {
    #[serde(default)]
    pub key_id: String,
    #[serde(skip_serializing, default)]
    pub key_secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsProviderConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(skip_serializing, default)]
    pub auth_token: String,
    #[serde(default)]
    pub from_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailProviderConfig {
    #[serde(skip_serializing, default)]
    pub api_key: String,
    #[serde(default)]
    pub from_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushProviderConfig {
    #[serde(default)]
    pub credentials_path: String,
}
