//! 配置加载器
//!
//! 从 JSON/TOML/YAML 文件读取 `configurations` 列表，按 `kind` 反序列化为
//! 具体配置类型，运行验证器后写入注册表。
//!
//! ```toml
//! [[configurations]]
//! kind = "file"
//! id = "7a0c3f5e-9d2b-4c61-8f1e-2b7d4a9c0e11"
//! name = "primary"
//! path = "/var/lib/demo"
//! ```

use crate::registry::InMemoryConfigurationRegistry;
use config_abstractions::{ConfigurationValidator, ValidationFailure};
use infrastructure_common::{ConfigError, Configuration, ConfigurationType, Message, TypeInfo};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 配置列表所在的键
pub const CONFIGURATIONS_KEY: &str = "configurations";

/// 配置类型标识所在的键
pub const KIND_KEY: &str = "kind";

type Decoder = Box<dyn Fn(Value) -> Result<Arc<dyn Configuration>, ConfigError> + Send + Sync>;
type Check = Box<dyn Fn(&dyn Configuration) -> Option<ValidationFailure> + Send + Sync>;

/// 加载报告
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// 成功加载的配置名称
    pub loaded: Vec<String>,
    /// 未通过验证而被拒绝的配置
    pub rejected: Vec<ValidationFailure>,
}

impl LoadReport {
    /// 全部验证失败消息
    pub fn failure_messages(&self) -> Vec<Message> {
        self.rejected
            .iter()
            .flat_map(|failure| failure.messages.iter().cloned())
            .collect()
    }
}

/// 配置加载器
pub struct ConfigurationLoader {
    kinds: HashMap<String, (TypeInfo, Decoder)>,
    validators: HashMap<TypeId, Vec<Check>>,
    env_prefix: Option<String>,
}

impl std::fmt::Debug for ConfigurationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<String> = self
            .kinds
            .iter()
            .map(|(kind, (type_info, _))| format!("{}={}", kind, type_info))
            .collect();
        f.debug_struct("ConfigurationLoader")
            .field("kinds", &kinds)
            .field("validators_count", &self.validators.values().map(Vec::len).sum::<usize>())
            .field("env_prefix", &self.env_prefix)
            .finish()
    }
}

impl ConfigurationLoader {
    /// 创建新的加载器
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            validators: HashMap::new(),
            env_prefix: None,
        }
    }

    /// 注册配置类型
    pub fn register_kind<K>(mut self, kind: impl Into<String>) -> Self
    where
        K: Configuration + DeserializeOwned,
    {
        let kind = kind.into();
        let decoder: Decoder = Box::new(|value| {
            let config: K = serde_json::from_value(value)?;
            Ok(Arc::new(config) as Arc<dyn Configuration>)
        });
        info!("注册配置类型: {} -> {}", kind, TypeInfo::of::<K>());
        self.kinds.insert(kind, (TypeInfo::of::<K>(), decoder));
        self
    }

    /// 注册配置验证器
    pub fn with_validator<K, V>(mut self, validator: V) -> Self
    where
        K: Configuration,
        V: ConfigurationValidator<K> + 'static,
    {
        let check: Check = Box::new(move |config: &dyn Configuration| {
            let typed = config.downcast_ref::<K>()?;
            let errors = validator.validate(typed).err()?;
            Some(ValidationFailure {
                configuration: config.name().to_string(),
                validator: validator.name().to_string(),
                messages: errors.iter().map(Message::from).collect(),
            })
        });
        self.validators
            .entry(TypeId::of::<K>())
            .or_default()
            .push(check);
        self
    }

    /// 允许用环境变量覆盖文件内容（`PREFIX__SECTION__KEY`）
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 读取配置文件（格式由扩展名决定）
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Value, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("读取配置文件: {}", path.display());
        let mut builder = config::Config::builder().add_source(config::File::from(path));
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__"),
            );
        }

        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<Value>())
            .map_err(|e| {
                error!("配置文件解析失败: {}, error={}", path.display(), e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })
    }

    /// 加载配置文件到注册表
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        registry: &InMemoryConfigurationRegistry,
    ) -> Result<LoadReport, ConfigError> {
        let root = self.read_file(path)?;
        self.load_value(&root, registry)
    }

    /// 从已解析的文档加载配置到注册表
    ///
    /// 文档缺少 `configurations` 时视为空列表。类型未知或 ID/名称重复会中止加载；
    /// 验证失败只拒绝对应的配置，并记录在报告中。
    pub fn load_value(
        &self,
        root: &Value,
        registry: &InMemoryConfigurationRegistry,
    ) -> Result<LoadReport, ConfigError> {
        let entries = match root.get(CONFIGURATIONS_KEY) {
            None | Some(Value::Null) => return Ok(LoadReport::default()),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(ConfigError::ParseError {
                    source: format!("`{}` 必须是数组, 实际为 {}", CONFIGURATIONS_KEY, other).into(),
                })
            }
        };

        let mut report = LoadReport::default();
        for entry in entries {
            let config = self.decode(entry.clone())?;

            if let Some(failure) = self.validate(config.as_ref()) {
                warn!(
                    "配置 {} 未通过验证 ({}): {}",
                    failure.configuration,
                    failure.validator,
                    failure
                        .messages
                        .iter()
                        .map(Message::render)
                        .collect::<Vec<_>>()
                        .join("; ")
                );
                report.rejected.push(failure);
                continue;
            }

            report.loaded.push(config.name().to_string());
            registry.insert(config)?;
        }

        info!(
            "配置加载完成: 成功 {} 个, 拒绝 {} 个",
            report.loaded.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    fn decode(&self, entry: Value) -> Result<Arc<dyn Configuration>, ConfigError> {
        let Value::Object(mut fields) = entry else {
            return Err(ConfigError::ParseError {
                source: "配置项必须是对象".into(),
            });
        };

        let kind = match fields.remove(KIND_KEY) {
            Some(Value::String(kind)) => kind,
            _ => {
                return Err(ConfigError::KeyNotFound {
                    key: KIND_KEY.to_string(),
                })
            }
        };

        let (_, decoder) = self
            .kinds
            .get(&kind)
            .ok_or_else(|| ConfigError::UnknownKind { kind: kind.clone() })?;

        decoder(Value::Object(fields))
    }

    fn validate(&self, config: &dyn Configuration) -> Option<ValidationFailure> {
        let checks = self.validators.get(&config.type_info().id)?;
        let mut failures = checks.iter().filter_map(|check| check(config));
        let mut first = failures.next()?;
        for more in failures {
            first.messages.extend(more.messages);
        }
        Some(first)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}
