//! # Infrastructure Common
//!
//! 能力框架的公共契约和结果模型。
//!
//! ## 核心组件
//!
//! - [`Outcome`] / [`Message`] - 统一的成功/失败结果模型
//! - [`Capability`] / [`Execute`] - 能力契约
//! - [`CapabilityBase`] - 静态声明的能力标记
//! - [`Configuration`] - 能力配置
//! - [`HealthStatus`] - 健康检查
//! - [`LifecycleCell`] - 服务生命周期状态
//!
//! ## 设计原则
//!
//! - 预期内的失败以 [`Outcome::Failure`] 返回，不以 panic 传播
//! - 能力标记在编译期声明，不依赖运行时名称推断

pub mod capability;
pub mod configuration;
pub mod errors;
pub mod health;
pub mod lifecycle;
pub mod message;
pub mod metadata;
pub mod outcome;

pub use capability::*;
pub use configuration::*;
pub use errors::*;
pub use health::*;
pub use lifecycle::*;
pub use message::{messages, Message, Severity};
pub use metadata::*;
pub use outcome::*;

pub use tokio_util::sync::CancellationToken;
