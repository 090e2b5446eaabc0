//! 消息定义
//!
//! 所有能力通过 [`Message`] 描述失败或提示信息。消息是不可变的，
//! 格式化和调整严重级别都会返回新的实例，消息代码始终保持不变。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, error, info, warn};

/// 消息严重级别
///
/// 按 `Debug < Info < Warning < Error < Critical` 排序，仅供调用方过滤和记录日志。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
    /// 严重错误
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

impl Severity {
    /// 对应的 tracing 日志级别
    pub fn level(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// 消息
///
/// 由稳定的代码、带 `{0}`、`{1}` 占位符的模板和严重级别组成。
/// 参数通过 [`Message::format`] 绑定，在 [`Message::render`] 时替换。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    code: Cow<'static, str>,
    template: Cow<'static, str>,
    severity: Severity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
}

impl Message {
    /// 创建目录中的静态消息
    pub const fn new(code: &'static str, template: &'static str, severity: Severity) -> Self {
        Self {
            code: Cow::Borrowed(code),
            template: Cow::Borrowed(template),
            severity,
            args: Vec::new(),
        }
    }

    /// 创建运行时构造的消息
    pub fn custom(
        code: impl Into<String>,
        template: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: Cow::Owned(code.into()),
            template: Cow::Owned(template.into()),
            severity,
            args: Vec::new(),
        }
    }

    /// 消息代码
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 消息模板
    pub fn template(&self) -> &str {
        &self.template
    }

    /// 严重级别
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// 已绑定的参数
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 绑定参数，返回新的消息实例
    ///
    /// 原消息保持不变；重复调用会替换之前绑定的参数。
    pub fn format<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            code: self.code.clone(),
            template: self.template.clone(),
            severity: self.severity,
            args: args.into_iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// 调整严重级别，返回新的消息实例
    pub fn with_severity(&self, severity: Severity) -> Self {
        Self {
            severity,
            ..self.clone()
        }
    }

    /// 渲染消息文本
    ///
    /// 没有对应参数的占位符原样保留。
    pub fn render(&self) -> String {
        let template: &str = &self.template;
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let tail = &rest[start..];

            let bound = tail.find('}').and_then(|end| {
                tail[1..end]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.args.get(index))
                    .map(|arg| (arg, end))
            });

            match bound {
                Some((arg, end)) => {
                    rendered.push_str(arg);
                    rest = &tail[end + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = &tail[1..];
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }

    /// 按自身严重级别记录日志
    pub fn log(&self) {
        let text = self.render();
        match self.severity {
            Severity::Debug => debug!(code = %self.code, "{}", text),
            Severity::Info => info!(code = %self.code, "{}", text),
            Severity::Warning => warn!(code = %self.code, "{}", text),
            Severity::Error | Severity::Critical => {
                error!(code = %self.code, severity = %self.severity, "{}", text)
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for Message {}

/// 消息目录
///
/// 代码为扁平字符串，仅作为信息性元数据。
pub mod messages {
    use super::{Message, Severity};

    /// 未找到与请求形状匹配的绑定
    pub const NOT_REGISTERED: Message = Message::new(
        "DI_001",
        "能力未注册: 接口 {0}, 配置类型 {1}",
        Severity::Error,
    );

    /// 同一封闭工厂形状被多个具体类型竞争
    pub const AMBIGUOUS_REGISTRATION: Message = Message::new(
        "DI_002",
        "工厂形状 {0} 已绑定到 {1}, 忽略 {2}",
        Severity::Warning,
    );

    /// 能力单例创建失败
    pub const ACTIVATION_FAILED: Message = Message::new(
        "DI_003",
        "能力实例创建失败: {0}, 原因: {1}",
        Severity::Error,
    );

    /// 绑定的实例类型与请求不符
    pub const TYPE_MISMATCH: Message = Message::new(
        "DI_004",
        "能力类型不匹配: 期望 {0}, 实际 {1}",
        Severity::Critical,
    );

    /// 配置不存在
    pub const CONFIGURATION_NOT_FOUND: Message =
        Message::new("CFG_001", "配置不存在: {0}", Severity::Error);

    /// 配置验证失败
    pub const VALIDATION_FAILED: Message =
        Message::new("CFG_002", "配置验证失败: {0}", Severity::Error);

    /// 配置文件加载失败
    pub const CONFIGURATION_LOAD_FAILED: Message =
        Message::new("CFG_003", "配置加载失败: {0}", Severity::Error);

    /// 结果映射失败
    pub const MAPPING_FAILED: Message =
        Message::new("GEN_001", "结果映射失败: {0}", Severity::Error);

    /// 操作已取消
    pub const OPERATION_CANCELLED: Message =
        Message::new("GEN_002", "操作已取消: {0}", Severity::Warning);

    /// 能力未运行
    pub const NOT_RUNNING: Message =
        Message::new("GEN_003", "能力未运行: {0}", Severity::Warning);
}
