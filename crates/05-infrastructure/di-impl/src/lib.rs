//! # 依赖注入具体实现
//!
//! 提供类型内省器、绑定注册表、能力解析门面和类型来源实现。
//!
//! ```ignore
//! let registry = Arc::new(BindingRegistry::default());
//! registry.register_sources(&[&InventoryTypeSource::for_module("demo")]);
//!
//! let resolver = CapabilityResolverImpl::new(registry, configurations);
//! let store = resolver.get::<dyn Store, _>("primary").into_value();
//! ```

pub mod introspector;
pub mod registry;
pub mod resolver;
pub mod sources;

pub use introspector::introspect;
pub use registry::BindingRegistry;
pub use resolver::CapabilityResolverImpl;
pub use sources::{InventoryTypeSource, ManualTypeSource};
