//! 能力派生宏实现

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error, Ident, LitStr, Path, Result, Type};

/// `#[capability(...)]` 参数
pub struct CapabilityArgs {
    /// 能力接口，如 `dyn Store`
    pub interface: Type,
    /// 配置类型
    pub config: Type,
    /// 自定义激活函数
    pub activate: Option<Path>,
    /// 能力名称；提供时同时生成 `Capability` 实现
    pub name: Option<LitStr>,
    /// `LifecycleCell` 字段，决定 `is_running`
    pub lifecycle: Option<Ident>,
    /// 是否登记到编译期清单（默认登记）
    pub register: bool,
}

impl CapabilityArgs {
    /// 从派生输入的属性中解析参数
    pub fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut interface = None;
        let mut config = None;
        let mut activate = None;
        let mut name = None;
        let mut lifecycle = None;
        let mut register = true;

        for attr in input.attrs.iter().filter(|a| a.path().is_ident("capability")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("interface") {
                    interface = Some(meta.value()?.parse::<Type>()?);
                } else if meta.path.is_ident("config") {
                    config = Some(meta.value()?.parse::<Type>()?);
                } else if meta.path.is_ident("activate") {
                    activate = Some(meta.value()?.parse::<Path>()?);
                } else if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse::<LitStr>()?);
                } else if meta.path.is_ident("lifecycle") {
                    lifecycle = Some(meta.value()?.parse::<Ident>()?);
                } else if meta.path.is_ident("skip_inventory") {
                    register = false;
                } else {
                    return Err(meta.error("未知的 capability 参数"));
                }
                Ok(())
            })?;
        }

        let interface = interface.ok_or_else(|| {
            Error::new_spanned(&input.ident, "缺少 #[capability(interface = ...)]")
        })?;
        let config = config
            .ok_or_else(|| Error::new_spanned(&input.ident, "缺少 #[capability(config = ...)]"))?;

        if lifecycle.is_some() && name.is_none() {
            return Err(Error::new_spanned(
                &input.ident,
                "lifecycle 参数需要同时指定 name",
            ));
        }

        Ok(Self {
            interface,
            config,
            activate,
            name,
            lifecycle,
            register,
        })
    }
}

/// 展开 `#[derive(Capability)]`
pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "能力类型的类型参数必须封闭，不支持泛型",
        ));
    }

    let args = CapabilityArgs::from_input(input)?;
    let ident = &input.ident;
    let interface = &args.interface;
    let config = &args.config;

    let activate_body = match &args.activate {
        Some(path) => quote! { #path() },
        None => quote! {
            ::core::result::Result::Ok(<Self as ::core::default::Default>::default())
        },
    };

    let capability_impl = args.name.as_ref().map(|name| {
        let is_running = match &args.lifecycle {
            Some(field) => quote! { self.#field.is_running() },
            None => quote! { true },
        };
        quote! {
            impl ::infrastructure_common::Capability for #ident {
                fn name(&self) -> &str {
                    #name
                }

                fn is_running(&self) -> bool {
                    #is_running
                }
            }
        }
    });

    let registration = args.register.then(|| {
        quote! {
            ::di_abstractions::inventory::submit! {
                ::di_abstractions::CandidateRegistration::new(
                    ::core::module_path!(),
                    ::di_abstractions::TypeCandidate::capability::<#ident>,
                )
            }
        }
    });

    Ok(quote! {
        #capability_impl

        impl ::infrastructure_common::CapabilityBase for #ident {
            type Interface = #interface;
            type Config = #config;

            fn activate() -> ::core::result::Result<Self, ::infrastructure_common::DependencyError> {
                #activate_body
            }

            fn into_interface(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<Self::Interface> {
                self
            }
        }

        #registration
    })
}
