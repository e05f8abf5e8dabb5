use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use schools24_backend::config::{AppConfig, DEFAULT_JWT_SECRET};
use schools24_backend::middlewares::{RateLimit, RateLimiter, RequireJWT, build_cors};
use schools24_backend::models::AppStartTime;
use schools24_backend::routes;
use schools24_backend::runtime::lifetime;
use schools24_backend::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    AppConfig::init().map_err(|e| std::io::Error::other(format!("配置加载失败: {e}")))?;
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting pre-startup processing...
        Project: {}
        Version: {}
        Environment: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    if config.is_production() && config.jwt.secret == DEFAULT_JWT_SECRET {
        warn!("JWT secret is still the built-in default, set JWT_SECRET before serving traffic");
    }

    let startup = lifetime::startup::prepare_server_startup().await?;

    let storage = startup.storage.clone();
    let compressed_cache = startup.compressed_cache.clone();

    // 限流器全局共享，清理任务随进程运行
    let rate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
    let _cleanup = rate_limiter.spawn_cleanup(Duration::from_secs(
        config.rate_limit.cleanup_interval_secs.max(1),
    ));

    // 输出预处理时间
    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );

    // 预处理完成 //

    let workers = config.server.workers.max(1);
    warn!("Using {} CPU cores for the server", workers);

    // Start the HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequireJWT)
            .wrap(RateLimit::new(rate_limiter.clone()))
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 设置查询参数错误处理器
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // 设置JSON错误处理器
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(compressed_cache.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            )) // 设置最大请求体大小
            .configure(routes::configure_health_routes) // 健康检查与上传文件
            .configure(routes::configure_auth_routes) // 配置认证相关路由
            .configure(routes::configure_student_routes) // 学生端
            .configure(routes::configure_teacher_routes) // 教师端
            .configure(routes::configure_classes_routes) // 配置班级相关路由
            .configure(routes::configure_academic_routes) // 课表、作业、成绩、科目
            .configure(routes::configure_announcement_routes) // 公告
            .configure(routes::configure_admin_routes) // 管理后台
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive)) // 启用长连接
    .client_request_timeout(Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(workers);

    let server = {
        #[cfg(unix)]
        {
            if let Some(socket_path) = config.unix_socket_path() {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)?;
                }
                server.bind_uds(socket_path)?
            } else {
                let bind_address = config.server_bind_address();
                warn!("Starting server at http://{}", bind_address);
                server.bind(bind_address)?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
