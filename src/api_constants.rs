/// 模型API配置常量
///
/// 该文件定义了所有翻译服务相关的常量配置，方便统一管理和维护

/// 默认模型API配置
pub mod api_config {
    /// OpenAI兼容接口的默认地址（不含 /chat/completions）
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// 聊天补全接口路径
    pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

    /// 读取API密钥的环境变量名
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

    /// 默认模型
    pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

    /// 默认生成温度
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
}

/// 翻译服务配置
pub mod service_config {
    /// 默认源语言
    pub const DEFAULT_SOURCE_LANG: &str = "English";

    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "Traditional Chinese";

    /// 单个分块的最大字符数，同时作为默认的最大输出token数
    pub const DEFAULT_MAX_LEN: usize = 30000;

    /// 默认并发分块数量（1 表示逐块顺序翻译）
    pub const DEFAULT_CONCURRENCY: usize = 1;

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 300;
}

/// 占位符协议常量
pub mod placeholder_config {
    /// 占位符ID前缀
    pub const ID_PREFIX: &str = "ATTR_";

    /// 用于检测原文冲突的占位符起始片段
    pub const TOKEN_OPENING: &str = "{{ATTR_";

    /// 编号最小位数
    pub const ID_WIDTH: usize = 3;
}

/// 输出文件配置
pub mod output_config {
    /// 结果文件名中插入的标记: origin.html -> origin.result.html
    pub const RESULT_MARKER: &str = "result";

    /// 目录模式下识别的HTML扩展名
    pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
}

/// 获取API地址，自定义地址优先
pub fn get_api_base(custom_api: Option<&str>) -> &str {
    match custom_api {
        Some(custom) if !custom.trim().is_empty() => custom,
        _ => api_config::DEFAULT_API_BASE,
    }
}

/// 验证API地址是否有效
pub fn is_valid_api_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// 拼接聊天补全接口完整地址
pub fn chat_completions_url(api_base: &str) -> String {
    format!(
        "{}/{}",
        api_base.trim_end_matches('/'),
        api_config::CHAT_COMPLETIONS_PATH
    )
}

/// 判断是否为HTML扩展名（不区分大小写）
pub fn is_html_extension(ext: &str) -> bool {
    output_config::HTML_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_selection() {
        assert_eq!(get_api_base(None), api_config::DEFAULT_API_BASE);
        assert_eq!(get_api_base(Some("  ")), api_config::DEFAULT_API_BASE);
        assert_eq!(get_api_base(Some("http://custom.api/v1")), "http://custom.api/v1");
    }

    #[test]
    fn test_api_url_validation() {
        assert!(is_valid_api_url("https://example.com"));
        assert!(is_valid_api_url("http://localhost:8080/v1"));
        assert!(!is_valid_api_url("ftp://example.com"));
        assert!(!is_valid_api_url("invalid-url"));
    }

    #[test]
    fn test_chat_completions_url() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:1188/v1"),
            "http://localhost:1188/v1/chat/completions"
        );
    }

    #[test]
    fn test_html_extension() {
        assert!(is_html_extension("html"));
        assert!(is_html_extension("HTM"));
        assert!(!is_html_extension("txt"));
    }
}
