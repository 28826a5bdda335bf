//! 统一错误处理模块
//!
//! 作业、提交与评分相关的所有失败都归入 `AssignmentError`，
//! 每个变体拥有稳定的错误代码与类型名称，路由层据此映射 HTTP 状态码。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_assignment_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AssignmentError {
            $($variant(String),)*
        }

        impl AssignmentError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(AssignmentError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AssignmentError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(AssignmentError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl AssignmentError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AssignmentError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_assignment_errors! {
    NotFound("E001", "Resource Not Found"),
    AccessDenied("E002", "Access Denied"),
    DuplicateSubmission("E003", "Duplicate Submission"),
    DeadlinePassed("E004", "Deadline Passed"),
    InvalidState("E005", "Invalid State"),
    Validation("E006", "Validation Error"),
    Unavailable("E007", "Storage Unavailable"),
    Authentication("E008", "Authentication Error"),
    Configuration("E009", "Configuration Error"),
    Serialization("E010", "Serialization Error"),
}

impl AssignmentError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            AssignmentError::NotFound(_) => 404,
            AssignmentError::AccessDenied(_) => 403,
            AssignmentError::DuplicateSubmission(_) | AssignmentError::InvalidState(_) => 409,
            AssignmentError::DeadlinePassed(_) | AssignmentError::Validation(_) => 400,
            AssignmentError::Unavailable(_) => 503,
            AssignmentError::Authentication(_) => 401,
            AssignmentError::Configuration(_) | AssignmentError::Serialization(_) => 500,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AssignmentError {}

impl From<sea_orm::DbErr> for AssignmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        AssignmentError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AssignmentError {
    fn from(err: serde_json::Error) -> Self {
        AssignmentError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AssignmentError {
    fn from(err: config::ConfigError) -> Self {
        AssignmentError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssignmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AssignmentError::not_found("test").code(), "E001");
        assert_eq!(AssignmentError::access_denied("test").code(), "E002");
        assert_eq!(AssignmentError::duplicate_submission("test").code(), "E003");
        assert_eq!(AssignmentError::deadline_passed("test").code(), "E004");
        assert_eq!(AssignmentError::invalid_state("test").code(), "E005");
        assert_eq!(AssignmentError::authentication("test").code(), "E008");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AssignmentError::not_found("x").status_code(), 404);
        assert_eq!(AssignmentError::access_denied("x").status_code(), 403);
        assert_eq!(AssignmentError::duplicate_submission("x").status_code(), 409);
        assert_eq!(AssignmentError::deadline_passed("x").status_code(), 400);
        assert_eq!(AssignmentError::invalid_state("x").status_code(), 409);
        assert_eq!(AssignmentError::validation("x").status_code(), 400);
        assert_eq!(AssignmentError::unavailable("x").status_code(), 503);
        assert_eq!(AssignmentError::authentication("x").status_code(), 401);
    }

    #[test]
    fn test_error_message() {
        let err = AssignmentError::validation("score out of range");
        assert_eq!(err.message(), "score out of range");
        assert_eq!(err.error_type(), "Validation Error");
    }

    #[test]
    fn test_db_error_is_unavailable() {
        let err: AssignmentError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert_eq!(err.code(), "E007");
        assert!(err.format_simple().contains("connection reset"));
    }
}
