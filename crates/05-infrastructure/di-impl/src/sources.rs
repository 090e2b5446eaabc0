//! 类型来源实现

use di_abstractions::{registered_candidates, TypeCandidate, TypeSource};
use tracing::debug;

/// 手工列出的候选类型
#[derive(Debug, Clone, Default)]
pub struct ManualTypeSource {
    name: String,
    candidates: Vec<TypeCandidate>,
}

impl ManualTypeSource {
    /// 创建空的来源
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    /// 添加候选类型
    pub fn with(mut self, candidate: TypeCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }
}

impl TypeSource for ManualTypeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self) -> Vec<TypeCandidate> {
        self.candidates.clone()
    }
}

/// 编译期登记的候选类型
///
/// 通过 `#[derive(Capability)]` 登记；可按 crate 或模块路径前缀筛选。
/// 链接器决定的登记顺序不稳定，候选类型按类型全名排序后提供。
#[derive(Debug, Clone, Default)]
pub struct InventoryTypeSource {
    prefix: Option<String>,
}

impl InventoryTypeSource {
    /// 全部登记项
    pub fn all() -> Self {
        Self { prefix: None }
    }

    /// 指定 crate 或模块下的登记项
    pub fn for_module(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl TypeSource for InventoryTypeSource {
    fn name(&self) -> &str {
        self.prefix.as_deref().unwrap_or("inventory")
    }

    fn candidates(&self) -> Vec<TypeCandidate> {
        let mut candidates: Vec<TypeCandidate> = registered_candidates()
            .filter(|registration| match &self.prefix {
                Some(prefix) => registration.is_within(prefix),
                None => true,
            })
            .map(|registration| (registration.candidate)())
            .collect();
        candidates.sort_by_key(|candidate| candidate.type_info().full_name);
        debug!("类型来源 {} 提供 {} 个候选类型", self.name(), candidates.len());
        candidates
    }
}
