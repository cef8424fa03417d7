//! 提示词模块
//!
//! 默认系统提示词、占位符保留规则以及每个分块的用户消息

// 标准库导入
use std::path::Path;

// 第三方crate导入
use tracing::{debug, info};

// 本地模块导入
use crate::api_constants::placeholder_config::TOKEN_OPENING;
use crate::error::Result;
use crate::translation_error;

/// 默认系统提示词
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"
You are a senior translator and copy editor specialized in blockchain and cryptocurrency. Your task is to translate HTML content into the requested language and rewrite it to sound natural and native.

TASK
1. Translate visible text in the HTML to the target language.
2. Rewrite it to sound fluent, idiomatic, and culturally natural, as if originally written by a native speaker.

FORMATTING RULES
- Do not add, remove or reorder any HTML tags or line breaks.
- Keep all tag structures, including <br/>, <img/>, <input/>, unchanged.
- Preserve all placeholders verbatim (e.g. {{ATTR_001}}, {{price}}, %s, :amount).
- Output final HTML only, without comments or extra text.

QUALITY
- Use native idioms and tone (formal or informal depending on source).
- No omissions, additions, or meaning changes.
- Maintain inline HTML entities (e.g. &nbsp;, &amp;).

CRYPTO-SPECIFIC
- Use standard translations for blockchain terms: NFT, DeFi, DAO, Web3, etc.
- Keep coin names (BTC, ETH, USDT) as-is unless local convention differs.
- Translate financial terms like APY, gas fee using community-accepted wording.
- Follow terminology from major exchanges in the target language.

FINAL NOTE
Translate, rewrite, then output the full HTML with structure and placeholders untouched.
"#;

/// 自定义提示词缺少占位符说明时追加的规则
pub const PLACEHOLDER_RULE: &str = "\n\nPLACEHOLDERS\n- Tokens of the form {{ATTR_001}} stand for tag attributes. Copy every such token verbatim, in place, exactly once. Never translate, renumber, reformat or drop them.\n";

/// 确保提示词向模型说明了占位符协议
pub fn ensure_placeholder_rule(prompt: &str) -> String {
    if prompt.contains(TOKEN_OPENING) {
        prompt.to_string()
    } else {
        debug!("提示词未提及占位符，追加占位符保留规则");
        format!("{}{}", prompt.trim_end(), PLACEHOLDER_RULE)
    }
}

/// 加载系统提示词
///
/// 未指定文件时使用默认提示词
pub fn load_system_prompt(path: Option<&Path>) -> Result<String> {
    let prompt = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                translation_error!(file_op, path.display(), "读取", e)
            })?;
            if content.trim().is_empty() {
                return Err(translation_error!(
                    input_validation,
                    path.display(),
                    "提示词文件为空"
                ));
            }
            info!("📜 使用自定义提示词: {}", path.display());
            content
        }
        None => DEFAULT_SYSTEM_PROMPT.to_string(),
    };

    Ok(ensure_placeholder_rule(&prompt))
}

/// 构造单个分块的用户消息
pub fn build_user_message(chunk: &str, source_language: &str, target_language: &str) -> String {
    format!(
        "translate this html from {} to {}:{}",
        source_language, target_language, chunk
    )
}
