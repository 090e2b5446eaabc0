//! 类型来源抽象接口
//!
//! 类型来源向内省器提供候选类型：手工列表、插件加载器或编译期清单。

use crate::candidate::TypeCandidate;

/// 类型来源 trait
pub trait TypeSource: Send + Sync {
    /// 来源名称
    fn name(&self) -> &str;

    /// 枚举候选类型
    fn candidates(&self) -> Vec<TypeCandidate>;
}

/// 编译期候选类型登记项
///
/// 由 `#[derive(Capability)]` 通过 `inventory::submit!` 生成，
/// 按模块路径筛选即可模拟“按程序集注册”。
#[derive(Debug)]
pub struct CandidateRegistration {
    /// 声明所在的模块路径
    pub module_path: &'static str,
    /// 构造候选类型
    pub candidate: fn() -> TypeCandidate,
}

impl CandidateRegistration {
    /// 创建登记项
    pub const fn new(module_path: &'static str, candidate: fn() -> TypeCandidate) -> Self {
        Self {
            module_path,
            candidate,
        }
    }

    /// 模块路径是否位于指定前缀（crate 或模块）之下
    pub fn is_within(&self, prefix: &str) -> bool {
        self.module_path == prefix
            || self
                .module_path
                .strip_prefix(prefix)
                .map_or(false, |rest| rest.starts_with("::"))
    }
}

inventory::collect!(CandidateRegistration);

/// 所有编译期登记的候选类型
pub fn registered_candidates() -> impl Iterator<Item = &'static CandidateRegistration> {
    inventory::iter::<CandidateRegistration>.into_iter()
}
