//! 封闭工厂形状与绑定
//!
//! 一个能力描述符 `(C, I, K)` 满足三种封闭形状：`Factory<I>`、
//! `Factory<I, K>` 和与能力无关的 `Factory`。注册表为每个具体类型只保存
//! 一个规范绑定，形状只是指向绑定的索引键。

use crate::descriptor::{ActivatedCapability, CapabilityDescriptor};
use infrastructure_common::{Configuration, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 封闭工厂形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactoryShape {
    /// 与能力无关的 `Factory`
    Any,
    /// `Factory<I>`
    Interface(TypeInfo),
    /// `Factory<I, K>`
    Configured {
        /// 能力接口
        interface: TypeInfo,
        /// 配置类型
        configuration: TypeInfo,
    },
}

impl FactoryShape {
    /// `Factory<I>`
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::Interface(TypeInfo::of::<I>())
    }

    /// `Factory<I, K>`
    pub fn configured<I: ?Sized + 'static, K: Configuration>() -> Self {
        Self::Configured {
            interface: TypeInfo::of::<I>(),
            configuration: TypeInfo::of::<K>(),
        }
    }

    /// 由运行时配置类型构造 `Factory<I, K>`
    pub fn configured_by(interface: TypeInfo, configuration: TypeInfo) -> Self {
        Self::Configured {
            interface,
            configuration,
        }
    }

    /// 描述符满足的全部封闭形状（由具体到宽泛）
    pub fn closed_shapes(descriptor: &CapabilityDescriptor) -> [FactoryShape; 3] {
        [
            Self::configured_by(descriptor.interface, descriptor.configuration),
            Self::Interface(descriptor.interface),
            Self::Any,
        ]
    }
}

impl fmt::Display for FactoryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Factory"),
            Self::Interface(interface) => write!(f, "Factory<{}>", interface),
            Self::Configured {
                interface,
                configuration,
            } => write!(f, "Factory<{}, {}>", interface, configuration),
        }
    }
}

/// 绑定：具体类型的规范注册项
#[derive(Debug, Clone)]
pub struct Binding {
    /// 能力描述符
    pub descriptor: CapabilityDescriptor,
    /// 注册顺序（从 0 开始）
    pub sequence: usize,
    instance: ActivatedCapability,
}

impl Binding {
    /// 创建新的绑定
    pub fn new(descriptor: CapabilityDescriptor, sequence: usize, instance: ActivatedCapability) -> Self {
        Self {
            descriptor,
            sequence,
            instance,
        }
    }

    /// 单例实例
    pub fn instance(&self) -> &ActivatedCapability {
        &self.instance
    }

    /// 以能力接口取得单例
    pub fn interface<I: ?Sized + 'static>(&self) -> Option<Arc<I>> {
        self.instance.interface::<I>()
    }

    /// 以具体类型取得单例
    pub fn concrete<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.instance.concrete::<C>()
    }

    /// 具体类型
    pub fn concrete_type(&self) -> TypeInfo {
        self.descriptor.concrete
    }
}
