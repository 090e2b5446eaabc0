//! # 基础设施组合层
//!
//! 将日志、配置加载、类型来源和绑定注册表组合成一个可用的能力宿主。
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use infrastructure_composition::{CapabilityHost, LoggingConfig};
//!
//! let host = CapabilityHost::builder()
//!     .register_kind::<FileCfg>("file")
//!     .add_config_file("capabilities.toml")?
//!     .scan_module("my_app::connections")
//!     .with_logging(LoggingConfig::development())
//!     .build()?;
//!
//! let conn = host.get::<dyn Conn, _>("primary").into_value();
//! ```

pub mod builder;
pub mod host;

// 重新导出主要类型
pub use builder::{CapabilityHostBuilder, HostOptions, LoggingConfig};
pub use host::CapabilityHost;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

#[cfg(test)]
mod tests;
