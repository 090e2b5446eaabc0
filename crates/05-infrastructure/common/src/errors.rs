//! 错误类型定义
//!
//! 这些错误用于基础设施内部的可失败流程；跨越注册/解析边界时统一
//! 转换为 [`Message`]，以 [`crate::Outcome`] 的失败分支返回。

use crate::message::{messages, Message};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("未知的配置类型: {kind}")]
    UnknownKind { kind: String },

    #[error("配置重复: {id}")]
    DuplicateConfiguration { id: String },

    #[error("配置验证失败: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("能力未注册: {interface}, 配置类型: {configuration}")]
    NotRegistered {
        interface: String,
        configuration: String,
    },

    #[error("能力创建失败: {type_name}, 原因: {source}")]
    ActivationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("能力类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("工厂形状 {shape} 已绑定到 {existing}, 拒绝 {rejected}")]
    AmbiguousRegistration {
        shape: String,
        existing: String,
        rejected: String,
    },
}

impl DependencyError {
    /// 创建能力创建失败错误
    pub fn activation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ActivationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("验证失败: {message}")]
    ValidationFailed { message: String },

    #[error("必需字段缺失: {field_name}")]
    RequiredFieldMissing { field_name: String },

    #[error("字段值无效: {field_name}, 值: {value}, 原因: {reason}")]
    InvalidFieldValue {
        field_name: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    /// 创建新的验证错误
    pub fn new(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// 创建必需字段缺失错误
    pub fn required_field_missing(field_name: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field_name: field_name.into(),
        }
    }

    /// 创建字段值无效错误
    pub fn invalid_field_value(
        field_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            field_name: field_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// 生命周期错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("非法的状态转换: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("能力注册被拒绝: {message}")]
    RegistrationRejected { message: Message },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

impl From<&ConfigError> for Message {
    fn from(error: &ConfigError) -> Self {
        match error {
            ConfigError::ValidationFailed { errors } => {
                messages::VALIDATION_FAILED.format([errors.join("; ")])
            }
            ConfigError::KeyNotFound { key } => messages::CONFIGURATION_NOT_FOUND.format([key]),
            other => messages::CONFIGURATION_LOAD_FAILED.format([other]),
        }
    }
}

impl From<&DependencyError> for Message {
    fn from(error: &DependencyError) -> Self {
        match error {
            DependencyError::NotRegistered {
                interface,
                configuration,
            } => messages::NOT_REGISTERED.format([interface, configuration]),
            DependencyError::ActivationFailed { type_name, source } => {
                messages::ACTIVATION_FAILED.format([type_name.clone(), source.to_string()])
            }
            DependencyError::TypeMismatch { expected, actual } => {
                messages::TYPE_MISMATCH.format([expected, actual])
            }
            DependencyError::AmbiguousRegistration {
                shape,
                existing,
                rejected,
            } => messages::AMBIGUOUS_REGISTRATION.format([shape, existing, rejected]),
        }
    }
}

impl From<&ValidationError> for Message {
    fn from(error: &ValidationError) -> Self {
        messages::VALIDATION_FAILED.format([error])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_error_to_message() {
        let error = DependencyError::NotRegistered {
            interface: "dyn Connection".to_string(),
            configuration: "FileCfg".to_string(),
        };
        let message = Message::from(&error);

        assert_eq!(message.code(), "DI_001");
        assert_eq!(message.render(), "能力未注册: 接口 dyn Connection, 配置类型 FileCfg");
    }

    #[test]
    fn test_validation_failure_passes_through_as_cfg_002() {
        let error = ConfigError::ValidationFailed {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        let message = Message::from(&error);

        assert_eq!(message.code(), "CFG_002");
        assert_eq!(message.render(), "配置验证失败: a; b");
    }
}
