//! # Configuration Implementation
//!
//! 配置管理的具体实现。
//!
//! ## 主要组件
//!
//! - [`InMemoryConfigurationRegistry`] - 按 ID/名称索引的配置注册表
//! - [`ConfigurationLoader`] - 从 TOML/JSON/YAML 文件加载配置

pub mod loader;
pub mod registry;

pub use loader::*;
pub use registry::*;
