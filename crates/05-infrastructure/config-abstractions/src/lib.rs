//! # Configuration Abstractions
//!
//! 配置管理抽象层。
//!
//! ## 核心接口
//!
//! - [`ConfigurationRegistry`] - 按ID/名称查找配置
//! - [`ConfigurationValidator`] - 配置验证接口

pub mod registry;
pub mod validator;

pub use registry::*;
pub use validator::*;
