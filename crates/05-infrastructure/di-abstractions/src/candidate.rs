//! 候选类型
//!
//! 类型来源提供的候选类型，附带从自身向外的祖先链。内省器沿祖先链
//! 查找最近的能力标记。

use crate::descriptor::CapabilityDescriptor;
use infrastructure_common::{CapabilityBase, TypeInfo};

/// 祖先链中的一个节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ancestor {
    /// 不携带能力标记的普通类型
    Plain(TypeInfo),
    /// 能力标记，但类型参数尚未封闭（泛型定义）
    OpenCapability {
        /// 泛型定义名称，如 `ConnBase<I, K>`
        definition: &'static str,
    },
    /// 类型参数已封闭的能力标记
    Capability(CapabilityDescriptor),
}

impl Ancestor {
    /// 是否为能力标记（无论是否封闭）
    pub fn is_anchor(&self) -> bool {
        !matches!(self, Self::Plain(_))
    }
}

/// 候选类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCandidate {
    type_info: TypeInfo,
    ancestry: Vec<Ancestor>,
}

impl TypeCandidate {
    /// 不声明能力的普通类型
    pub fn plain<T: ?Sized + 'static>() -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            type_info,
            ancestry: vec![Ancestor::Plain(type_info)],
        }
    }

    /// 自身声明了能力标记的类型
    pub fn capability<C: CapabilityBase>() -> Self {
        Self {
            type_info: TypeInfo::of::<C>(),
            ancestry: vec![Ancestor::Capability(CapabilityDescriptor::of::<C>())],
        }
    }

    /// 在祖先链外侧追加另一个候选类型的整条祖先链
    pub fn extends(mut self, parent: TypeCandidate) -> Self {
        self.ancestry.extend(parent.ancestry);
        self
    }

    /// 在祖先链外侧追加未封闭的能力标记
    pub fn extends_open(mut self, definition: &'static str) -> Self {
        self.ancestry.push(Ancestor::OpenCapability { definition });
        self
    }

    /// 类型信息
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 祖先链（由近及远，第一个元素为类型自身）
    pub fn ancestry(&self) -> &[Ancestor] {
        &self.ancestry
    }
}
