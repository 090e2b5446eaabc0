//! 绑定注册表
//!
//! 写入方由互斥锁串行化，在私有副本上完成整批注册后一次性发布新的快照；
//! 读取方只克隆当前快照指针，永远看不到写了一半的绑定集合。

use crate::introspector::introspect;
use di_abstractions::{
    ActivatedCapability, Ambiguity, Binding, CapabilityDescriptor, CapabilityRegistry,
    FactoryShape, RegistrationPolicy, RegistrationReport, TypeCandidate,
};
use infrastructure_common::{
    CapabilityBase, CapabilityHealth, DependencyError, HealthReport, Message, Outcome, TypeInfo,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 注册表快照
#[derive(Debug, Clone, Default)]
struct RegistrySnapshot {
    /// 规范绑定（按注册顺序）
    bindings: Vec<Binding>,
    /// 封闭形状 -> 绑定下标
    shapes: HashMap<FactoryShape, usize>,
    /// 具体类型 -> 绑定下标
    concretes: HashMap<TypeInfo, usize>,
}

impl RegistrySnapshot {
    fn binding(&self, shape: &FactoryShape) -> Option<&Binding> {
        self.shapes.get(shape).map(|&index| &self.bindings[index])
    }
}

/// 绑定注册表
///
/// 每个具体类型只有一个规范绑定和一个单例；三种封闭形状都指向它。
#[derive(Debug, Default)]
pub struct BindingRegistry {
    policy: RegistrationPolicy,
    current: RwLock<Arc<RegistrySnapshot>>,
    writer: Mutex<()>,
}

impl BindingRegistry {
    /// 创建指定策略的注册表
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            policy,
            current: RwLock::new(Arc::new(RegistrySnapshot::default())),
            writer: Mutex::new(()),
        }
    }

    /// 注册策略
    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// 已绑定的具体类型数量
    pub fn len(&self) -> usize {
        self.snapshot().bindings.len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.snapshot().bindings.is_empty()
    }

    /// 按具体类型查找绑定
    pub fn binding_of<C: 'static>(&self) -> Option<Binding> {
        let snapshot = self.snapshot();
        snapshot
            .concretes
            .get(&TypeInfo::of::<C>())
            .map(|&index| snapshot.bindings[index].clone())
    }

    /// 汇总所有单例的健康状态
    pub async fn health_report(&self) -> HealthReport {
        let snapshot = self.snapshot();
        let mut report = HealthReport::default();
        for binding in &snapshot.bindings {
            let capability = binding.instance().capability();
            let status = capability.health().await;
            report.entries.push(CapabilityHealth::new(
                capability.name(),
                binding.concrete_type(),
                status,
            ));
        }
        report
    }

    fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read())
    }

    /// 在写锁内基于当前快照构造新快照，成功后整体发布
    fn write<F>(&self, apply: F) -> Outcome<RegistrationReport>
    where
        F: FnOnce(&mut Staging<'_>) -> Result<(), Message>,
    {
        let _guard = self.writer.lock();
        let mut next = RegistrySnapshot::clone(&self.snapshot());
        let mut staging = Staging {
            policy: self.policy,
            snapshot: &mut next,
            report: RegistrationReport::default(),
        };

        if let Err(message) = apply(&mut staging) {
            message.log();
            return Outcome::failure(message);
        }

        let report = staging.report;
        if !report.is_noop() {
            *self.current.write() = Arc::new(next);
        }

        info!(
            "能力注册完成: 扫描 {} 个, 识别 {} 个, 新绑定形状 {} 个, 重复 {} 个, 冲突 {} 个",
            report.scanned,
            report.discovered.len(),
            report.bound.len(),
            report.repeated.len(),
            report.ambiguities.len()
        );
        Outcome::success(report)
    }
}

/// 单次写入的暂存区
struct Staging<'a> {
    policy: RegistrationPolicy,
    snapshot: &'a mut RegistrySnapshot,
    report: RegistrationReport,
}

impl Staging<'_> {
    fn bind<F>(&mut self, descriptor: CapabilityDescriptor, activate: F) -> Result<(), Message>
    where
        F: FnOnce() -> Result<ActivatedCapability, DependencyError>,
    {
        self.report.discovered.push(descriptor.concrete);

        if self.snapshot.concretes.contains_key(&descriptor.concrete) {
            debug!("重复注册已忽略: {}", descriptor.concrete);
            self.report.repeated.push(descriptor.concrete);
            return Ok(());
        }

        let mut free = Vec::with_capacity(3);
        for shape in FactoryShape::closed_shapes(&descriptor) {
            let Some(existing) = self.snapshot.binding(&shape) else {
                free.push(shape);
                continue;
            };

            let ambiguity = Ambiguity {
                shape,
                kept: existing.concrete_type(),
                rejected: descriptor.concrete,
            };

            // 同一 (I, K) 的竞争才是真正的歧义，宽泛形状本就由多个类型共享
            if matches!(shape, FactoryShape::Configured { .. }) {
                if self.policy == RegistrationPolicy::Strict {
                    return Err(ambiguity.to_message());
                }
                warn!("{}", ambiguity.to_message().render());
            } else {
                debug!("{}", ambiguity.to_message().render());
            }
            self.report.ambiguities.push(ambiguity);
        }

        if free.is_empty() {
            return Ok(());
        }

        let instance = activate().map_err(|e| Message::from(&e))?;
        let index = self.snapshot.bindings.len();
        self.snapshot
            .bindings
            .push(Binding::new(descriptor, index, instance));
        self.snapshot.concretes.insert(descriptor.concrete, index);
        for shape in free {
            debug!("绑定 {} -> {}", shape, descriptor.concrete);
            self.snapshot.shapes.insert(shape, index);
            self.report.bound.push(shape);
        }
        Ok(())
    }
}

impl CapabilityRegistry for BindingRegistry {
    fn register(&self, candidates: Vec<TypeCandidate>) -> Outcome<RegistrationReport> {
        self.write(|staging| {
            for candidate in &candidates {
                staging.report.scanned += 1;
                if let Some(descriptor) = introspect(candidate) {
                    staging.bind(descriptor, || descriptor.activate())?;
                }
            }
            Ok(())
        })
    }

    fn register_instance<C: CapabilityBase>(&self, instance: Arc<C>) -> Outcome<RegistrationReport> {
        self.write(|staging| {
            staging.report.scanned += 1;
            staging.bind(CapabilityDescriptor::of::<C>(), || {
                Ok(ActivatedCapability::from_instance(instance))
            })
        })
    }

    fn binding(&self, shape: &FactoryShape) -> Option<Binding> {
        self.snapshot().binding(shape).cloned()
    }

    fn bindings(&self) -> Vec<Binding> {
        self.snapshot().bindings.clone()
    }

    fn shape_count(&self) -> usize {
        self.snapshot().shapes.len()
    }
}
