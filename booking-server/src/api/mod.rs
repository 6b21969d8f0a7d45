//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`users`] - 账户管理接口
//! - [`tables`] - 餐桌管理接口
//! - [`bookings`] - 预订管理接口

pub mod auth;
pub mod health;

// Data models API
pub mod bookings;
pub mod tables;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
