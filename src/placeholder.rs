//! 属性占位符模块
//!
//! 把标签属性替换为 `{{ATTR_001}}` 形式的占位符，让模型只看到标签名、结构和可见文本，
//! 翻译完成后再按占位符把原始属性写回。
//!
//! 匹配基于正则而非完整的HTML解析器：引号内包含 `>` 的属性值目前无法正确处理。

// 标准库导入
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

// 第三方crate导入
use regex::{Captures, Regex};
use tracing::{debug, warn};

// 本地模块导入
use crate::api_constants::placeholder_config::{ID_PREFIX, ID_WIDTH};
use crate::shield::Restoration;

/// 属性表: 占位符ID -> 原始属性文本（已去除首尾空白）
pub type AttributeTable = BTreeMap<String, String>;

/// 开标签/自闭合标签: 标签名、含前导空白的属性文本、可选的自闭合标记
fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<(\w+)(\s+[^>]*?)(\s*/)?>").expect("标签正则表达式无效")
    })
}

/// 占位符，允许模型在大括号内插入空白
fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*(ATTR_\d+)\s*\}\}").expect("占位符正则表达式无效")
    })
}

/// 生成占位符文本: `ATTR_001` -> `{{ATTR_001}}`
pub fn placeholder_token(id: &str) -> String {
    format!("{{{{{}}}}}", id)
}

/// 属性提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHtml {
    /// 属性被替换为占位符后的精简HTML
    pub simplified: String,
    /// 占位符ID到原始属性的映射
    pub table: AttributeTable,
    /// 原文中是否已经出现过占位符格式
    pub collision_detected: bool,
}

impl ExtractedHtml {
    pub fn into_parts(self) -> (String, AttributeTable) {
        (self.simplified, self.table)
    }
}

/// 单次提取的上下文，每篇文档新建一个
#[derive(Debug, Default)]
struct AttributeExtractor {
    counter: usize,
    table: AttributeTable,
}

impl AttributeExtractor {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("{}{:0width$}", ID_PREFIX, self.counter, width = ID_WIDTH)
    }

    fn replace_tag(&mut self, caps: &Captures<'_>) -> String {
        let whole = &caps[0];
        let tag_name = &caps[1];
        let raw_attrs = caps.get(2).map_or("", |m| m.as_str());
        let self_closing = caps.get(3).map_or("", |m| m.as_str());

        let attrs = raw_attrs.trim();
        if attrs.is_empty() {
            return whole.to_string();
        }

        // 属性两侧的空白留在占位符外，提取后立即恢复可以逐字节还原
        let leading = &raw_attrs[..raw_attrs.len() - raw_attrs.trim_start().len()];
        let trailing = &raw_attrs[raw_attrs.trim_end().len()..];

        let id = self.next_id();
        let token = placeholder_token(&id);
        self.table.insert(id, attrs.to_string());

        format!("<{tag_name}{leading}{token}{trailing}{self_closing}>")
    }
}

/// 提取HTML中的标签属性，替换为占位符
///
/// 没有属性的标签和闭合标签原样保留，不分配占位符。
/// 如果原文已经包含占位符格式，只记录警告并继续处理。
pub fn extract_html(html: &str) -> ExtractedHtml {
    // 与恢复时使用同一个正则，大括号内带空白的写法同样算冲突
    let collision_detected = token_regex().is_match(html);
    if collision_detected {
        warn!("⚠️  原HTML中包含占位符格式 {{{{ATTR_...}}}}，恢复时可能发生冲突");
    }

    let mut extractor = AttributeExtractor::default();
    let simplified = tag_regex()
        .replace_all(html, |caps: &Captures<'_>| extractor.replace_tag(caps))
        .into_owned();

    debug!(
        "🔖 提取属性 {} 个: {} -> {} 字符",
        extractor.table.len(),
        html.chars().count(),
        simplified.chars().count()
    );

    ExtractedHtml {
        simplified,
        table: extractor.table,
        collision_detected,
    }
}

/// 把翻译结果中的占位符恢复为原始属性
///
/// 单次扫描完成替换，恢复出的属性文本不会被再次展开。
/// 同一占位符出现多次时每处都按同一条记录恢复；属性表中不存在的占位符原样保留并记录警告。
pub fn restore_html(translated_html: &str, table: &AttributeTable) -> Restoration {
    let mut restored = 0;
    let mut unresolved = Vec::new();
    let mut seen = HashSet::new();

    let html = token_regex()
        .replace_all(translated_html, |caps: &Captures<'_>| {
            let id = &caps[1];
            match table.get(id) {
                Some(attrs) => {
                    restored += 1;
                    seen.insert(id.to_string());
                    attrs.clone()
                }
                None => {
                    warn!("⚠️  未找到占位符 {} 对应的属性，保留原文", id);
                    unresolved.push(id.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    let missing: Vec<String> = table
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();
    for id in &missing {
        warn!("⚠️  占位符 {} 在翻译结果中丢失，对应属性无法恢复", id);
    }

    Restoration {
        html,
        restored,
        unresolved,
        missing,
    }
}
