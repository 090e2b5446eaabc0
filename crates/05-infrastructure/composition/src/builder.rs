//! 能力宿主构建器

use crate::host::CapabilityHost;
use config_abstractions::ConfigurationValidator;
use config_impl::{ConfigurationLoader, InMemoryConfigurationRegistry, LoadReport};
use di_abstractions::{CapabilityRegistry, RegistrationPolicy, RegistrationReport, TypeSource};
use di_impl::{BindingRegistry, CapabilityResolverImpl, InventoryTypeSource};
use infrastructure_common::{ConfigError, Configuration, InfrastructureError, Outcome};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 宿主选项所在的配置节
pub const HOST_SECTION: &str = "host";

/// 能力宿主构建器
///
/// 使用建造者模式组合日志、配置加载、类型来源和绑定注册表。
pub struct CapabilityHostBuilder {
    /// 配置加载器
    loader: ConfigurationLoader,
    /// 配置文件列表
    config_files: Vec<PathBuf>,
    /// 直接添加的配置
    configurations: Vec<Arc<dyn Configuration>>,
    /// 类型来源列表
    type_sources: Vec<Box<dyn TypeSource>>,
    /// 显式指定的注册策略（优先于配置文件）
    policy: Option<RegistrationPolicy>,
    /// 显式指定的日志配置（优先于配置文件）
    logging_config: Option<LoggingConfig>,
    /// 是否拒绝未通过验证的配置
    reject_invalid: Option<bool>,
}

impl CapabilityHostBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            loader: ConfigurationLoader::new(),
            config_files: Vec::new(),
            configurations: Vec::new(),
            type_sources: Vec::new(),
            policy: None,
            logging_config: None,
            reject_invalid: None,
        }
    }

    /// 注册配置类型
    pub fn register_kind<K>(mut self, kind: impl Into<String>) -> Self
    where
        K: Configuration + DeserializeOwned,
    {
        self.loader = self.loader.register_kind::<K>(kind);
        self
    }

    /// 添加配置验证器
    pub fn add_validator<K, V>(mut self, validator: V) -> Self
    where
        K: Configuration,
        V: ConfigurationValidator<K> + 'static,
    {
        self.loader = self.loader.with_validator::<K, V>(validator);
        self
    }

    /// 添加配置文件（TOML/JSON/YAML，按扩展名识别）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加配置文件: {}", path.display());
        self.config_files.push(path.to_path_buf());
        Ok(self)
    }

    /// 允许用环境变量覆盖配置文件
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.loader = self.loader.with_env_prefix(prefix);
        self
    }

    /// 直接添加配置
    pub fn add_configuration<K: Configuration>(mut self, configuration: K) -> Self {
        debug!("添加配置: {}", configuration.name());
        self.configurations.push(Arc::new(configuration));
        self
    }

    /// 添加类型来源
    pub fn add_type_source<T: TypeSource + 'static>(mut self, source: T) -> Self {
        debug!("添加类型来源: {}", source.name());
        self.type_sources.push(Box::new(source));
        self
    }

    /// 扫描指定 crate 或模块中登记的能力
    pub fn scan_module<S: Into<String>>(self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加模块扫描: {}", prefix);
        self.add_type_source(InventoryTypeSource::for_module(prefix))
    }

    /// 扫描全部登记的能力
    pub fn scan_inventory(self) -> Self {
        self.add_type_source(InventoryTypeSource::all())
    }

    /// 设置注册策略
    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// 设置是否拒绝未通过验证的配置
    pub fn reject_invalid(mut self, enabled: bool) -> Self {
        self.reject_invalid = Some(enabled);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 构建能力宿主
    pub fn build(self) -> Result<CapabilityHost, InfrastructureError> {
        let documents = self
            .config_files
            .iter()
            .map(|path| self.loader.read_file(path))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let options = self.resolve_options(&documents)?;
        if let Some(logging) = &options.logging {
            initialize_logging(logging);
        }

        info!("开始构建能力宿主");

        let configurations = Arc::new(InMemoryConfigurationRegistry::new());
        for configuration in self.configurations {
            configurations.insert(configuration)?;
        }

        let mut load_report = LoadReport::default();
        for document in &documents {
            let report = self.loader.load_value(document, &configurations)?;
            load_report.loaded.extend(report.loaded);
            load_report.rejected.extend(report.rejected);
        }

        if options.reject_invalid && !load_report.rejected.is_empty() {
            let errors = load_report
                .failure_messages()
                .iter()
                .map(|message| message.render())
                .collect();
            return Err(ConfigError::ValidationFailed { errors }.into());
        }

        let registry = Arc::new(BindingRegistry::new(options.policy));
        let sources: Vec<&dyn TypeSource> = self.type_sources.iter().map(|s| s.as_ref()).collect();
        let registration = match registry.register_sources(&sources) {
            Outcome::Success(report) => report,
            Outcome::Failure(message) => {
                return Err(InfrastructureError::RegistrationRejected { message })
            }
        };
        log_registration(&registration);

        let resolver = CapabilityResolverImpl::new(registry, configurations.clone());

        info!("能力宿主构建完成");
        Ok(CapabilityHost::new(
            resolver,
            configurations,
            options,
            load_report,
            registration,
        ))
    }

    /// 合并配置文件中的 `host` 节与显式设置
    fn resolve_options(&self, documents: &[serde_json::Value]) -> Result<HostOptions, ConfigError> {
        let mut options = HostOptions::default();
        for document in documents {
            if let Some(section) = document.get(HOST_SECTION) {
                options = serde_json::from_value(section.clone())?;
            }
        }

        if let Some(policy) = self.policy {
            options.policy = policy;
        }
        if let Some(logging) = &self.logging_config {
            options.logging = Some(logging.clone());
        }
        if let Some(reject_invalid) = self.reject_invalid {
            options.reject_invalid = reject_invalid;
        }
        Ok(options)
    }
}

impl Default for CapabilityHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn log_registration(report: &RegistrationReport) {
    for ambiguity in &report.ambiguities {
        debug!(
            "形状 {} 保留 {}，忽略 {}",
            ambiguity.shape, ambiguity.kept, ambiguity.rejected
        );
    }
    if report.discovered.is_empty() {
        warn!("未发现任何能力");
    }
}

/// 初始化日志系统
///
/// 全局订阅者只能设置一次，重复初始化时保留已有的订阅者。
fn initialize_logging(config: &LoggingConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match result {
        Ok(()) => info!("日志系统初始化完成"),
        Err(e) => debug!("日志系统已初始化，跳过: {}", e),
    }
}

/// 宿主选项
///
/// 可从配置文件的 `host` 节读取：
///
/// ```toml
/// [host]
/// policy = "strict"
/// reject_invalid = true
///
/// [host.logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOptions {
    /// 注册策略
    pub policy: RegistrationPolicy,
    /// 日志配置；为空时不初始化日志
    pub logging: Option<LoggingConfig>,
    /// 是否拒绝未通过验证的配置
    pub reject_invalid: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(with = "level_serde")]
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}

mod level_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(level: &tracing::Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(level.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<tracing::Level, D::Error> {
        let raw = String::deserialize(deserializer)?;
        tracing::Level::from_str(&raw).map_err(D::Error::custom)
    }
}
