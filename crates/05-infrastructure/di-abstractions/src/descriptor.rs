//! 能力描述符
//!
//! 描述符由内省器从候选类型中提取：`(具体类型, 能力接口, 配置类型)`，
//! 外加创建单例所需的激活函数。

use infrastructure_common::{Capability, CapabilityBase, DependencyError, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 激活函数：创建具体类型的单例
pub type Activator = fn() -> Result<ActivatedCapability, DependencyError>;

/// 能力描述符
#[derive(Clone, Copy)]
pub struct CapabilityDescriptor {
    /// 具体类型
    pub concrete: TypeInfo,
    /// 能力接口类型
    pub interface: TypeInfo,
    /// 配置类型
    pub configuration: TypeInfo,
    activator: Activator,
}

impl CapabilityDescriptor {
    /// 从能力标记构造描述符
    pub fn of<C: CapabilityBase>() -> Self {
        Self {
            concrete: TypeInfo::of::<C>(),
            interface: TypeInfo::of::<C::Interface>(),
            configuration: TypeInfo::of::<C::Config>(),
            activator: activate::<C>,
        }
    }

    /// 创建单例
    pub fn activate(&self) -> Result<ActivatedCapability, DependencyError> {
        (self.activator)()
    }
}

impl PartialEq for CapabilityDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.concrete == other.concrete
            && self.interface == other.interface
            && self.configuration == other.configuration
    }
}

impl Eq for CapabilityDescriptor {}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("concrete", &self.concrete.full_name)
            .field("interface", &self.interface.full_name)
            .field("configuration", &self.configuration.full_name)
            .finish()
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : CapabilityBase<{}, {}>",
            self.concrete, self.interface, self.configuration
        )
    }
}

/// 已创建的能力单例
///
/// 同一个实例的三种视图：具体类型、能力接口和 [`Capability`]。
#[derive(Clone)]
pub struct ActivatedCapability {
    concrete: Arc<dyn Any + Send + Sync>,
    interface: Arc<dyn Any + Send + Sync>,
    capability: Arc<dyn Capability>,
}

impl ActivatedCapability {
    /// 包装已存在的实例
    pub fn from_instance<C: CapabilityBase>(instance: Arc<C>) -> Self {
        let interface: Arc<C::Interface> = Arc::clone(&instance).into_interface();
        Self {
            concrete: Arc::clone(&instance) as Arc<dyn Any + Send + Sync>,
            interface: Arc::new(interface),
            capability: instance,
        }
    }

    /// 以能力接口取得实例
    pub fn interface<I: ?Sized + 'static>(&self) -> Option<Arc<I>> {
        self.interface.downcast_ref::<Arc<I>>().cloned()
    }

    /// 以具体类型取得实例
    pub fn concrete<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        Arc::clone(&self.concrete).downcast::<C>().ok()
    }

    /// 以 [`Capability`] 取得实例
    pub fn capability(&self) -> Arc<dyn Capability> {
        Arc::clone(&self.capability)
    }

    /// 是否与另一视图指向同一个实例
    pub fn same_instance(&self, other: &ActivatedCapability) -> bool {
        Arc::ptr_eq(&self.concrete, &other.concrete)
    }
}

impl fmt::Debug for ActivatedCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivatedCapability")
            .field("name", &self.capability.name())
            .finish()
    }
}

fn activate<C: CapabilityBase>() -> Result<ActivatedCapability, DependencyError> {
    let instance = Arc::new(C::activate()?);
    Ok(ActivatedCapability::from_instance(instance))
}
