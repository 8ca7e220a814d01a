//! 练习批改平台后端服务
//!
//! 学生上传练习照片并消耗积分，工作人员批改后学生查看文字、图片与音频批改。
//!
//! # 架构
//! - `cache`: 进程内缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层与媒体存储
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 图片归一化、JWT、密码与校验工具

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
