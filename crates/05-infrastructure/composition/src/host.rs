//! 能力宿主

use crate::builder::{CapabilityHostBuilder, HostOptions};
use config_abstractions::ConfigurationRegistry;
use config_impl::{InMemoryConfigurationRegistry, LoadReport};
use di_abstractions::{CapabilityResolver, RegistrationReport, Resolved};
use di_impl::{BindingRegistry, CapabilityResolverImpl};
use infrastructure_common::{ConfigurationKey, HealthReport, Outcome};
use std::sync::Arc;

/// 能力宿主
///
/// 持有配置注册表、绑定注册表和解析门面。构建完成后只读。
#[derive(Debug)]
pub struct CapabilityHost {
    resolver: CapabilityResolverImpl,
    configurations: Arc<InMemoryConfigurationRegistry>,
    options: HostOptions,
    load_report: LoadReport,
    registration: RegistrationReport,
}

impl CapabilityHost {
    /// 创建宿主构建器
    pub fn builder() -> CapabilityHostBuilder {
        CapabilityHostBuilder::new()
    }

    pub(crate) fn new(
        resolver: CapabilityResolverImpl,
        configurations: Arc<InMemoryConfigurationRegistry>,
        options: HostOptions,
        load_report: LoadReport,
        registration: RegistrationReport,
    ) -> Self {
        Self {
            resolver,
            configurations,
            options,
            load_report,
            registration,
        }
    }

    /// 绑定注册表
    pub fn registry(&self) -> &Arc<BindingRegistry> {
        self.resolver.registry()
    }

    /// 解析门面
    pub fn resolver(&self) -> &CapabilityResolverImpl {
        &self.resolver
    }

    /// 配置注册表
    pub fn configurations(&self) -> &Arc<InMemoryConfigurationRegistry> {
        &self.configurations
    }

    /// 生效的宿主选项
    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// 配置加载报告
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// 能力注册报告
    pub fn registration(&self) -> &RegistrationReport {
        &self.registration
    }

    /// 按配置名称列出可解析的配置
    pub fn configuration_names(&self) -> Vec<String> {
        self.configurations
            .get_all()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// 全部能力的健康状态
    pub async fn health_report(&self) -> HealthReport {
        self.registry().health_report().await
    }
}

impl CapabilityResolver for CapabilityHost {
    fn resolve<I, K>(&self, key: K) -> Outcome<Resolved<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        K: Into<ConfigurationKey>,
    {
        self.resolver.resolve::<I, K>(key)
    }
}
