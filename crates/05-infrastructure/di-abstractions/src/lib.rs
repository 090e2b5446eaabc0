//! # Dependency Injection Abstractions
//!
//! 能力注册与解析的核心抽象。
//!
//! ## 核心接口
//!
//! - [`TypeCandidate`] - 类型来源提供的候选类型及其祖先链
//! - [`CapabilityDescriptor`] - 内省得到的 `(具体类型, 能力接口, 配置类型)`
//! - [`FactoryShape`] / [`Binding`] - 封闭工厂形状与规范绑定
//! - [`TypeSource`] - 类型来源接口
//! - [`CapabilityRegistry`] - 能力注册表接口
//! - [`CapabilityResolver`] - 能力解析接口

pub mod candidate;
pub mod descriptor;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use candidate::*;
pub use descriptor::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;

// 供 `#[derive(Capability)]` 生成的代码使用
pub use inventory;
