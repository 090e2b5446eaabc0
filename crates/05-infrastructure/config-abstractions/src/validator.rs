//! 配置验证抽象接口

use infrastructure_common::{Configuration, Message, ValidationError};

/// 配置验证器 trait
///
/// 针对某一具体配置类型，加载时调用。
pub trait ConfigurationValidator<K: Configuration>: Send + Sync {
    /// 验证配置
    fn validate(&self, config: &K) -> Result<(), Vec<ValidationError>>;

    /// 获取验证器名称
    fn name(&self) -> &str;
}

/// 闭包形式的验证器
pub struct FnValidator<F> {
    name: String,
    check: F,
}

impl<F> FnValidator<F> {
    /// 创建闭包验证器
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<K, F> ConfigurationValidator<K> for FnValidator<F>
where
    K: Configuration,
    F: Fn(&K) -> Result<(), Vec<ValidationError>> + Send + Sync,
{
    fn validate(&self, config: &K) -> Result<(), Vec<ValidationError>> {
        (self.check)(config)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 单份配置的验证失败记录
///
/// 上游验证产生的 `CFG_002` 消息原样透传给调用方。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// 配置名称
    pub configuration: String,
    /// 验证器名称
    pub validator: String,
    /// 失败消息
    pub messages: Vec<Message>,
}
