//! 错误类型
//!
//! 库内所有可失败操作都返回 [`TranslationError`]，命令行入口再用 anyhow 附加上下文。

// 标准库导入
use std::fmt;

/// 翻译一篇HTML文档时可能出现的错误
///
/// 占位符恢复阶段的异常不会出现在这里：恢复失败只记录警告，永远不中断流程
#[derive(Debug)]
pub enum TranslationError {
    /// 连不上模型端点，或请求在传输层失败（超时、TLS、连接重置）
    Network {
        message: String,
        /// 传输层错误通常没有状态码
        status_code: Option<u16>,
    },

    /// 读取源HTML、写入结果文件、读取提示词文件或扫描输入目录失败
    FileOperation {
        path: String,
        /// 读取 / 写入 / 扫描
        operation: String,
        source: String,
    },

    /// chat/completions 端点返回了非2xx状态，`message` 是响应体原文
    TranslationApi {
        status_code: u16,
        message: String,
        api_url: String,
    },

    /// 端点返回成功，但某个分块的响应里取不到 `choices[0].message.content`
    ModelResponse {
        /// 出错分块在文档中的序号（从0开始）
        chunk_index: usize,
        details: String,
    },

    /// 命令行选项或 [`crate::config::TranslatorConfig`] 取值不合法，在翻译开始前报告
    Configuration {
        /// 出错的选项名，如 `max_len`、`api_key`
        field: String,
        reason: String,
    },

    /// 输入路径不存在或不是文件/目录
    InputValidation {
        input: String,
        reason: String,
    },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            TranslationError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            TranslationError::TranslationApi { status_code, message, api_url } => {
                write!(f, "翻译API错误 [{}] {}: {}", status_code, api_url, message)
            }
            TranslationError::ModelResponse { chunk_index, details } => {
                write!(f, "模型响应无效 [分块 {}]: {}", chunk_index, details)
            }
            TranslationError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            TranslationError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
        }
    }
}

impl std::error::Error for TranslationError {}

pub type Result<T> = std::result::Result<T, TranslationError>;

/// 构造 [`TranslationError`] 的简写
#[macro_export]
macro_rules! translation_error {
    (network, $msg:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (network, $msg:expr, $code:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (file_op, $path:expr, $op:expr, $source:expr) => {
        $crate::error::TranslationError::FileOperation {
            path: $path.to_string(),
            operation: $op.to_string(),
            source: $source.to_string(),
        }
    };
    (translation_api, $code:expr, $msg:expr, $url:expr) => {
        $crate::error::TranslationError::TranslationApi {
            status_code: $code,
            message: $msg.to_string(),
            api_url: $url.to_string(),
        }
    };
    (model_response, $chunk:expr, $details:expr) => {
        $crate::error::TranslationError::ModelResponse {
            chunk_index: $chunk,
            details: $details.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::TranslationError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::TranslationError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 发送请求或读取响应体时的传输层错误
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        TranslationError::Network {
            message: error.to_string(),
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranslationError::Network {
            message: "Connection failed".to_string(),
            status_code: Some(500),
        };
        assert_eq!(format!("{}", err), "网络请求失败 [500]: Connection failed");

        let err = translation_error!(network, "timed out");
        assert_eq!(format!("{}", err), "网络请求失败: timed out");
    }

    #[test]
    fn test_model_response_display() {
        let err = translation_error!(model_response, 3, "missing choices");
        assert_eq!(format!("{}", err), "模型响应无效 [分块 3]: missing choices");
    }

    #[test]
    fn test_file_op_display() {
        let err = translation_error!(file_op, "page.html", "读取", "No such file");
        assert_eq!(format!("{}", err), "文件读取操作失败 [page.html]: No such file");
    }

    #[test]
    fn test_error_macro() {
        let err = translation_error!(config, "max_len", "must be positive");
        match err {
            TranslationError::Configuration { field, reason } => {
                assert_eq!(field, "max_len");
                assert_eq!(reason, "must be positive");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_converts_into_anyhow_with_context() {
        use anyhow::Context;

        let result: Result<()> = Err(translation_error!(config, "api_key", "未设置"));
        let err = result.context("配置无效").unwrap_err();
        assert_eq!(format!("{:#}", err), "配置无效: 配置错误 [api_key]: 未设置");
    }
}
