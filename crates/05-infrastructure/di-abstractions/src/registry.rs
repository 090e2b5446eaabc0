//! 能力注册表抽象接口

use crate::candidate::TypeCandidate;
use crate::factory::{Binding, FactoryShape};
use crate::scanner::TypeSource;
use infrastructure_common::{
    CapabilityBase, Configuration, DependencyError, Message, Outcome, TypeInfo,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 能力注册表 trait
///
/// 注册只增不减；注册与解析都通过 `&self` 进行，实现负责保证并发读取
/// 永远看不到写了一半的绑定集合。
pub trait CapabilityRegistry: Send + Sync {
    /// 注册候选类型
    fn register(&self, candidates: Vec<TypeCandidate>) -> Outcome<RegistrationReport>;

    /// 注册类型来源中的所有候选类型
    fn register_sources(&self, sources: &[&dyn TypeSource]) -> Outcome<RegistrationReport> {
        let mut report = RegistrationReport::default();
        for source in sources {
            match self.register(source.candidates()) {
                Outcome::Success(partial) => report.merge(partial),
                Outcome::Failure(message) => return Outcome::failure(message),
            }
        }
        Outcome::success(report)
    }

    /// 注册已创建的实例
    fn register_instance<C: CapabilityBase>(&self, instance: Arc<C>) -> Outcome<RegistrationReport>
    where
        Self: Sized;

    /// 按封闭形状查找绑定
    fn binding(&self, shape: &FactoryShape) -> Option<Binding>;

    /// 全部绑定（按注册顺序）
    fn bindings(&self) -> Vec<Binding>;

    /// 已绑定的形状数量
    fn shape_count(&self) -> usize;

    /// `Factory<I>`
    fn factory<I: ?Sized + 'static>(&self) -> Option<Arc<I>>
    where
        Self: Sized,
    {
        self.binding(&FactoryShape::interface::<I>())
            .and_then(|binding| binding.interface::<I>())
    }

    /// `Factory<I, K>`
    fn factory_for<I: ?Sized + 'static, K: Configuration>(&self) -> Option<Arc<I>>
    where
        Self: Sized,
    {
        self.binding(&FactoryShape::configured::<I, K>())
            .and_then(|binding| binding.interface::<I>())
    }

    /// 与能力无关的 `Factory`
    fn any_factory(&self) -> Option<Binding> {
        self.binding(&FactoryShape::Any)
    }
}

/// 形状冲突时的注册策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// 先注册者胜出，后来者被忽略并记入报告
    FirstWins,
    /// 拒绝与已绑定的 `Factory<I, K>` 形状冲突的注册
    Strict,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self::FirstWins
    }
}

/// 形状冲突记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// 冲突的封闭形状
    pub shape: FactoryShape,
    /// 保留的具体类型
    pub kept: TypeInfo,
    /// 被忽略的具体类型
    pub rejected: TypeInfo,
}

impl Ambiguity {
    /// 转换为依赖注入错误
    pub fn to_error(&self) -> DependencyError {
        DependencyError::AmbiguousRegistration {
            shape: self.shape.to_string(),
            existing: self.kept.to_string(),
            rejected: self.rejected.to_string(),
        }
    }

    /// 转换为 `DI_002` 消息
    pub fn to_message(&self) -> Message {
        Message::from(&self.to_error())
    }
}

/// 注册报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// 扫描的候选类型数量
    pub scanned: usize,
    /// 识别出的能力描述符
    pub discovered: Vec<TypeInfo>,
    /// 新绑定的形状
    pub bound: Vec<FactoryShape>,
    /// 重复注册（幂等忽略）的具体类型
    pub repeated: Vec<TypeInfo>,
    /// 形状冲突
    pub ambiguities: Vec<Ambiguity>,
}

impl RegistrationReport {
    /// 合并另一份报告
    pub fn merge(&mut self, other: RegistrationReport) {
        self.scanned += other.scanned;
        self.discovered.extend(other.discovered);
        self.bound.extend(other.bound);
        self.repeated.extend(other.repeated);
        self.ambiguities.extend(other.ambiguities);
    }

    /// 是否没有产生任何新绑定
    pub fn is_noop(&self) -> bool {
        self.bound.is_empty()
    }
}
