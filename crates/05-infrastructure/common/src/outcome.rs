//! 统一的操作结果模型
//!
//! 所有能力用 [`Outcome`] 报告成功或失败。预期内的失败一律以携带
//! [`Message`] 的失败结果返回；只有调用方误用（在失败结果上读取值）
//! 才会 panic。

use crate::message::{messages, Message};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 操作结果
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    /// 成功，携带值（无值时为 `()`）
    Success(T),
    /// 失败，携带消息
    Failure(Message),
}

impl<T> Outcome<T> {
    /// 创建成功结果
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// 创建失败结果
    pub fn failure(message: Message) -> Self {
        Self::Failure(message)
    }

    /// 是否成功
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// 是否失败
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// 是否为指定代码的失败
    pub fn is_failure_with(&self, code: &str) -> bool {
        matches!(self, Self::Failure(message) if message.code() == code)
    }

    /// 读取成功值
    ///
    /// # Panics
    ///
    /// 在失败结果上调用属于调用方误用，会直接 panic。
    #[track_caller]
    pub fn value(&self) -> &T {
        match self {
            Self::Success(value) => value,
            Self::Failure(message) => value_access_on_failure(message),
        }
    }

    /// 取出成功值
    ///
    /// # Panics
    ///
    /// 同 [`Outcome::value`]。
    #[track_caller]
    pub fn into_value(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(message) => value_access_on_failure(&message),
        }
    }

    /// 失败消息
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    /// 成功值（失败时为 `None`）
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// 借用形式
    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(message) => Outcome::Failure(message.clone()),
        }
    }

    /// 映射成功值，失败时短路
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(message) => Outcome::Failure(message),
        }
    }

    /// 可失败的映射
    ///
    /// 映射函数返回的错误被包装成新的 `GEN_001` 失败。
    pub fn try_map<U, E, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Result<U, E>,
        E: fmt::Display,
    {
        match self {
            Self::Success(value) => match f(value) {
                Ok(mapped) => Outcome::Success(mapped),
                Err(e) => Outcome::Failure(messages::MAPPING_FAILED.format([e])),
            },
            Self::Failure(message) => Outcome::Failure(message),
        }
    }

    /// 链式组合
    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(message) => Outcome::Failure(message),
        }
    }

    /// 映射失败消息
    pub fn map_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(Message) -> Message,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(message) => Self::Failure(f(message)),
        }
    }

    /// 按分支折叠为单一值
    pub fn match_with<R, S, F>(self, on_success: S, on_failure: F) -> R
    where
        S: FnOnce(T) -> R,
        F: FnOnce(Message) -> R,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(message) => on_failure(message),
        }
    }

    /// 转换为标准 `Result`
    pub fn into_result(self) -> Result<T, Message> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(message) => Err(message),
        }
    }
}

impl Outcome<()> {
    /// 无值的成功结果
    pub fn done() -> Self {
        Self::Success(())
    }
}

impl<T> From<Result<T, Message>> for Outcome<T> {
    fn from(result: Result<T, Message>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(message) => Self::Failure(message),
        }
    }
}

#[cold]
#[track_caller]
fn value_access_on_failure(message: &Message) -> ! {
    panic!(
        "ValueAccessOnFailure: 在失败结果上读取值 [{}] {}",
        message.code(),
        message.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Severity;

    fn not_found() -> Message {
        messages::CONFIGURATION_NOT_FOUND.format(["primary"])
    }

    #[test]
    fn test_success_value() {
        let outcome = Outcome::success(42);
        assert!(outcome.is_success());
        assert_eq!(*outcome.value(), 42);
        assert_eq!(outcome.into_value(), 42);
    }

    #[test]
    #[should_panic(expected = "ValueAccessOnFailure")]
    fn test_value_on_failure_panics() {
        let outcome: Outcome<i32> = Outcome::failure(not_found());
        let _ = outcome.value();
    }

    #[test]
    #[should_panic(expected = "ValueAccessOnFailure")]
    fn test_into_value_on_failure_panics() {
        let outcome: Outcome<String> = Outcome::failure(not_found());
        let _ = outcome.into_value();
    }

    #[test]
    fn test_map_short_circuits_on_failure() {
        let mut called = false;
        let outcome: Outcome<i32> = Outcome::failure(not_found());
        let mapped = outcome.map(|v| {
            called = true;
            v + 1
        });

        assert!(!called);
        assert!(mapped.is_failure_with("CFG_001"));
        assert_eq!(Outcome::success(1).map(|v| v + 1), Outcome::success(2));
    }

    #[test]
    fn test_try_map_wraps_error_as_new_failure() {
        let mapped = Outcome::success("x").try_map(|s| s.parse::<u32>());

        let message = mapped.message().unwrap();
        assert_eq!(message.code(), "GEN_001");
        assert_eq!(message.severity(), Severity::Error);
        assert!(message.render().starts_with("结果映射失败: "));
    }

    #[test]
    fn test_match_with_selects_branch() {
        let ok = Outcome::success(2).match_with(|v| v * 10, |_| 0);
        let failed = Outcome::<i32>::failure(not_found()).match_with(|v| v, |m| m.args().len() as i32);
        assert_eq!(ok, 20);
        assert_eq!(failed, 1);
    }

    #[test]
    fn test_map_failure_rewrites_only_failures() {
        let escalated = Outcome::<u8>::failure(not_found())
            .map_failure(|m| m.with_severity(Severity::Critical));
        assert_eq!(escalated.message().unwrap().severity(), Severity::Critical);
        assert!(escalated.is_failure_with("CFG_001"));

        let untouched = Outcome::success(7u8).map_failure(|_| unreachable!());
        assert_eq!(untouched, Outcome::success(7));
    }

    #[test]
    fn test_into_result_and_back() {
        let result = Outcome::<u8>::failure(not_found()).into_result();
        assert!(result.is_err());

        let outcome: Outcome<u8> = Ok(3).into();
        assert_eq!(outcome.ok(), Some(3));
    }
}
