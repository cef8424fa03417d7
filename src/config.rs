//! 配置管理模块
//!
//! 提供CLI参数解析、翻译配置管理和API密钥加载功能

// 标准库导入
use std::path::PathBuf;

// 第三方crate导入
use clap::Parser;
use tracing::debug;

// 本地模块导入
use crate::api_constants::{self, api_config, service_config};
use crate::error::Result;
use crate::shield::ProtectionStrategy;
use crate::translation_error;

/// 翻译配置结构体
///
/// 模型、温度和最大输出长度原样传给每次模型调用，不会根据内容调整。
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use html_gpt_translator::config::TranslatorConfig;
///
/// let config = TranslatorConfig::new()
///     .with_languages("English", "Japanese")
///     .with_model("gpt-4.1-mini")
///     .with_max_len(8000)
///     .with_concurrency(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorConfig {
    /// 源语言（自由文本，直接写入提示词）
    source_lang: String,
    /// 目标语言（自由文本，直接写入提示词）
    target_lang: String,
    /// 模型名称
    model: String,
    /// 生成温度
    temperature: f32,
    /// 单个分块的最大字符数
    max_len: usize,
    /// 最大输出token数，未设置时等于 max_len
    max_tokens: Option<usize>,
    /// OpenAI兼容接口地址
    api_base: String,
    /// 同时翻译的分块数量
    concurrency: usize,
    /// 请求超时时间（秒）
    timeout_secs: u64,
    /// 属性保护策略
    strategy: ProtectionStrategy,
}

impl TranslatorConfig {
    /// 创建新的配置实例
    ///
    /// 返回具有默认值的配置实例：
    /// - 语言: English -> Traditional Chinese
    /// - 模型: gpt-4.1-nano, 温度 0.7
    /// - 分块上限: 30000 字符
    /// - 顺序翻译，请求超时 300 秒
    /// - 占位符保护策略
    pub fn new() -> Self {
        Self {
            source_lang: service_config::DEFAULT_SOURCE_LANG.to_string(),
            target_lang: service_config::DEFAULT_TARGET_LANG.to_string(),
            model: api_config::DEFAULT_MODEL.to_string(),
            temperature: api_config::DEFAULT_TEMPERATURE,
            max_len: service_config::DEFAULT_MAX_LEN,
            max_tokens: None,
            api_base: api_config::DEFAULT_API_BASE.to_string(),
            concurrency: service_config::DEFAULT_CONCURRENCY,
            timeout_secs: service_config::REQUEST_TIMEOUT_SECONDS,
            strategy: ProtectionStrategy::default(),
        }
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// 最大输出token数
    pub fn max_tokens(&self) -> usize {
        self.max_tokens.unwrap_or(self.max_len)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn strategy(&self) -> ProtectionStrategy {
        self.strategy
    }

    /// 设置源语言和目标语言
    pub fn with_languages(mut self, source: &str, target: &str) -> Self {
        self.source_lang = source.to_string();
        self.target_lang = target.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<usize>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_strategy(mut self, strategy: ProtectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 在任何处理开始之前校验配置
    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            return Err(translation_error!(config, "max_len", "分块长度上限必须大于0"));
        }
        if self.max_tokens == Some(0) {
            return Err(translation_error!(config, "max_tokens", "最大输出长度必须大于0"));
        }
        if self.concurrency == 0 {
            return Err(translation_error!(config, "concurrency", "并发数量必须大于0"));
        }
        if self.source_lang.trim().is_empty() {
            return Err(translation_error!(config, "source_lang", "源语言不能为空"));
        }
        if self.target_lang.trim().is_empty() {
            return Err(translation_error!(config, "target_lang", "目标语言不能为空"));
        }
        if self.model.trim().is_empty() {
            return Err(translation_error!(config, "model", "模型名称不能为空"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(translation_error!(
                config,
                "temperature",
                format!("温度必须在0到2之间: {}", self.temperature)
            ));
        }
        if !api_constants::is_valid_api_url(&self.api_base) {
            return Err(translation_error!(
                config,
                "api_base",
                format!("无效的API地址: {}", self.api_base)
            ));
        }
        Ok(())
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析API密钥：命令行参数优先，其次是环境变量（支持 .env 文件）
pub fn resolve_api_key(cli_key: Option<&str>) -> Result<String> {
    if let Some(key) = cli_key.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    if let Ok(path) = dotenvy::dotenv() {
        debug!("已加载环境文件: {}", path.display());
    }

    match std::env::var(api_config::API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(translation_error!(
            config,
            api_config::API_KEY_ENV,
            "请先在环境变量或 .env 文件中设置API密钥，或使用 --api-key 参数"
        )),
    }
}

/// CLI参数结构
#[derive(Parser, Debug)]
#[command(author, version, about = "基于大语言模型的HTML翻译工具 - 属性占位符保护标签结构", long_about = None)]
pub struct Cli {
    /// 输入HTML文件或包含HTML文件的目录
    #[arg(short, long, value_name = "FILE_OR_DIR")]
    pub input: PathBuf,

    /// 输出文件路径 (可选，默认为 <文件名>.result.html；目录模式下忽略)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// 源语言 (自由文本，如: English)
    #[arg(short, long, default_value = service_config::DEFAULT_SOURCE_LANG)]
    pub source_lang: String,

    /// 目标语言 (自由文本，如: Traditional Chinese)
    #[arg(short, long, default_value = service_config::DEFAULT_TARGET_LANG)]
    pub target_lang: String,

    /// 模型名称
    #[arg(short, long, default_value = api_config::DEFAULT_MODEL)]
    pub model: String,

    /// 单个分块的最大字符数
    #[arg(long, default_value_t = service_config::DEFAULT_MAX_LEN)]
    pub max_len: usize,

    /// 最大输出token数 (默认等于 --max-len)
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// 生成温度
    #[arg(long, default_value_t = api_config::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// OpenAI兼容接口地址
    #[arg(long, default_value = api_config::DEFAULT_API_BASE)]
    pub api_base: String,

    /// API密钥 (默认读取 OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// 自定义系统提示词文件
    #[arg(long, value_name = "FILE")]
    pub prompt_file: Option<PathBuf>,

    /// 属性保护策略
    #[arg(long, value_enum, default_value_t = ProtectionStrategy::Placeholder)]
    pub strategy: ProtectionStrategy,

    /// 同时翻译的分块数量
    #[arg(long, default_value_t = service_config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// 请求超时时间（秒）
    #[arg(long, default_value_t = service_config::REQUEST_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 演练模式：不调用模型，原样返回分块，用于检查占位符往返
    #[arg(long)]
    pub dry_run: bool,

    /// 详细输出模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    pub quiet: bool,

    /// 显示性能统计
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// 由命令行参数生成翻译配置
    pub fn to_config(&self) -> TranslatorConfig {
        TranslatorConfig::new()
            .with_languages(&self.source_lang, &self.target_lang)
            .with_model(&self.model)
            .with_temperature(self.temperature)
            .with_max_len(self.max_len)
            .with_max_tokens(self.max_tokens)
            .with_api_base(api_constants::get_api_base(Some(self.api_base.as_str())))
            .with_concurrency(self.concurrency)
            .with_timeout_secs(self.timeout)
            .with_strategy(self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;

    #[test]
    fn test_default_config() {
        let config = TranslatorConfig::default();
        assert_eq!(config.source_lang(), "English");
        assert_eq!(config.target_lang(), "Traditional Chinese");
        assert_eq!(config.model(), "gpt-4.1-nano");
        assert_eq!(config.max_len(), 30000);
        assert_eq!(config.max_tokens(), 30000);
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.strategy(), ProtectionStrategy::Placeholder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TranslatorConfig::new()
            .with_languages("German", "French")
            .with_max_len(500)
            .with_max_tokens(Some(2000))
            .with_strategy(ProtectionStrategy::Positional);

        assert_eq!(config.source_lang(), "German");
        assert_eq!(config.target_lang(), "French");
        assert_eq!(config.max_len(), 500);
        assert_eq!(config.max_tokens(), 2000);
        assert_eq!(config.strategy(), ProtectionStrategy::Positional);
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            (TranslatorConfig::new().with_max_len(0), "max_len"),
            (TranslatorConfig::new().with_max_tokens(Some(0)), "max_tokens"),
            (TranslatorConfig::new().with_concurrency(0), "concurrency"),
            (TranslatorConfig::new().with_languages("", "French"), "source_lang"),
            (TranslatorConfig::new().with_languages("English", " "), "target_lang"),
            (TranslatorConfig::new().with_temperature(3.5), "temperature"),
            (TranslatorConfig::new().with_api_base("not a url"), "api_base"),
        ];

        for (config, expected_field) in cases {
            match config.validate() {
                Err(TranslationError::Configuration { field, .. }) => {
                    assert_eq!(field, expected_field)
                }
                other => panic!("{} should fail, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn test_cli_key_takes_precedence() {
        assert_eq!(resolve_api_key(Some(" sk-test ")).unwrap(), "sk-test");
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "html-gpt-translator",
            "--input",
            "page.html",
            "--target-lang",
            "Japanese",
            "--strategy",
            "positional",
            "--max-len",
            "1200",
            "--dry-run",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.target_lang(), "Japanese");
        assert_eq!(config.source_lang(), "English");
        assert_eq!(config.max_len(), 1200);
        assert_eq!(config.strategy(), ProtectionStrategy::Positional);
        assert!(cli.dry_run);
    }
}
