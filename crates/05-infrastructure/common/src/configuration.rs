//! 配置相关的基础接口定义

use crate::metadata::TypeInfo;
use std::any::Any;
use std::fmt::{self, Debug};
use uuid::Uuid;

/// 配置 trait
///
/// 每个能力实例由一份配置描述；配置的运行时类型决定解析到哪个能力实现。
pub trait Configuration: ConfigurationType + Send + Sync + Debug + 'static {
    /// 配置ID
    fn id(&self) -> Uuid;

    /// 配置名称
    fn name(&self) -> &str;
}

/// 配置的运行时类型信息
///
/// 对所有 [`Configuration`] 自动实现，使 `dyn Configuration` 也能取得具体类型。
pub trait ConfigurationType {
    /// 具体配置类型
    fn type_info(&self) -> TypeInfo;

    /// 转换为 `Any`
    fn as_any(&self) -> &dyn Any;
}

impl<T: Configuration> ConfigurationType for T {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Configuration {
    /// 向下转换为具体配置类型
    pub fn downcast_ref<K: Configuration>(&self) -> Option<&K> {
        self.as_any().downcast_ref::<K>()
    }

    /// 是否为指定配置类型
    pub fn is<K: Configuration>(&self) -> bool {
        self.type_info().is::<K>()
    }
}

/// 配置查找键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigurationKey {
    /// 按ID查找
    Id(Uuid),
    /// 按名称查找
    Name(String),
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::Name(name) => write!(f, "name={}", name),
        }
    }
}

impl From<Uuid> for ConfigurationKey {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ConfigurationKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ConfigurationKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for ConfigurationKey {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}
