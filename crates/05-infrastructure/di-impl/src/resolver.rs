//! 能力解析门面

use crate::registry::BindingRegistry;
use config_abstractions::ConfigurationRegistry;
use di_abstractions::{CapabilityRegistry, CapabilityResolver, FactoryShape, Resolved};
use infrastructure_common::{
    messages, ConfigurationKey, ConfigurationType, DependencyError, Message, Outcome, TypeInfo,
};
use std::sync::Arc;
use tracing::debug;

/// 能力解析器实现
///
/// 先在配置注册表中查找配置，再以 `Factory<I, 配置的运行时类型>` 查找绑定。
#[derive(Clone)]
pub struct CapabilityResolverImpl {
    registry: Arc<BindingRegistry>,
    configurations: Arc<dyn ConfigurationRegistry>,
}

impl CapabilityResolverImpl {
    /// 创建解析器
    pub fn new(registry: Arc<BindingRegistry>, configurations: Arc<dyn ConfigurationRegistry>) -> Self {
        Self {
            registry,
            configurations,
        }
    }

    /// 绑定注册表
    pub fn registry(&self) -> &Arc<BindingRegistry> {
        &self.registry
    }

    /// 配置注册表
    pub fn configurations(&self) -> &Arc<dyn ConfigurationRegistry> {
        &self.configurations
    }
}

impl std::fmt::Debug for CapabilityResolverImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityResolverImpl")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl CapabilityResolver for CapabilityResolverImpl {
    fn resolve<I, K>(&self, key: K) -> Outcome<Resolved<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        K: Into<ConfigurationKey>,
    {
        let key = key.into();
        let interface = TypeInfo::of::<I>();

        let Some(configuration) = self.configurations.find(&key) else {
            debug!("解析失败: 配置 {} 不存在", key);
            return Outcome::failure(messages::CONFIGURATION_NOT_FOUND.format([key.to_string()]));
        };

        let shape = FactoryShape::configured_by(interface, configuration.type_info());
        let Some(binding) = self.registry.binding(&shape) else {
            debug!("解析失败: 形状 {} 未绑定", shape);
            let error = DependencyError::NotRegistered {
                interface: interface.to_string(),
                configuration: configuration.type_info().to_string(),
            };
            return Outcome::failure(Message::from(&error));
        };

        match binding.interface::<I>() {
            Some(capability) => {
                debug!("解析 {} ({}) -> {}", interface, key, binding.concrete_type());
                Outcome::success(Resolved {
                    capability,
                    configuration,
                })
            }
            None => {
                let error = DependencyError::TypeMismatch {
                    expected: interface.to_string(),
                    actual: binding.concrete_type().to_string(),
                };
                Outcome::failure(Message::from(&error))
            }
        }
    }
}
