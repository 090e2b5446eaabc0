//! # Capability Macros
//!
//! 声明能力标记并登记到编译期清单的派生宏。
//!
//! ## 使用示例
//!
//! ```ignore
//! use capability_macros::Capability;
//!
//! #[derive(Default, Capability)]
//! #[capability(interface = dyn Store, config = FileCfg, name = "file", lifecycle = state)]
//! pub struct FileStore {
//!     state: LifecycleCell,
//! }
//! ```
//!
//! 生成的代码引用 `infrastructure_common` 和 `di_abstractions`，使用方需要依赖这两个 crate。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod capability;

/// 能力派生宏
///
/// 为结构体实现 `CapabilityBase`，并通过 `inventory` 登记为候选类型。
///
/// # 参数
///
/// - `interface = dyn Trait` - 能力接口（必需）
/// - `config = Type` - 配置类型（必需）
/// - `activate = path::to::fn` - 激活函数，默认使用 `Default`
/// - `name = "..."` - 能力名称，提供时同时实现 `Capability`
/// - `lifecycle = field` - `LifecycleCell` 字段，决定 `is_running`
/// - `skip_inventory` - 不登记到编译期清单
#[proc_macro_derive(Capability, attributes(capability))]
pub fn derive_capability(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    capability::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
