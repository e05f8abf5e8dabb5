//! Schools24 - 学校管理平台后端服务
//!
//! 基于 Actix Web 构建，面向学生、教师和管理员三类角色，
//! 覆盖课表、作业、成绩、考勤、公告与收费。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis，Snappy 压缩封装）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色、限流与 CORS 中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
