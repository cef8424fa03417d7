//! 按位置对应的属性剥离策略
//!
//! 去掉所有标签的属性，翻译后按标签出现顺序逐个对应回去：
//! 只有闭合类型和标签名都与下一条记录一致时才还原原始标签，模型新增的标签原样保留。
//! 模型调整标签顺序后后续标签都会错位，因此只作为可选策略提供。

// 标准库导入
use std::sync::OnceLock;

// 第三方crate导入
use regex::Regex;
use tracing::{debug, warn};

// 本地模块导入
use crate::shield::Restoration;

/// 原文中一个标签的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// 是否为闭合标签 `</name>`
    pub closing: bool,
    /// 标签名
    pub name: String,
    /// 原始标签全文
    pub original: String,
}

fn tag_token_regex() -> &'static Regex {
    static TAG_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_TOKEN_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").expect("标签切分正则表达式无效"))
}

fn tag_parts_regex() -> &'static Regex {
    static TAG_PARTS_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_PARTS_REGEX.get_or_init(|| {
        Regex::new(r"^<\s*(/?)([^\s/>]+)([^>]*)>$").expect("标签解析正则表达式无效")
    })
}

/// 解析标签: (是否闭合, 标签名, 属性部分)
///
/// 注释、DOCTYPE和处理指令不算标签
fn parse_tag(token: &str) -> Option<(bool, &str, &str)> {
    if token.starts_with("<!") || token.starts_with("<?") {
        return None;
    }
    let caps = tag_parts_regex().captures(token)?;
    let closing = !caps.get(1)?.as_str().is_empty();
    let name = caps.get(2)?.as_str();
    let rest = caps.get(3).map_or("", |m| m.as_str());
    Some((closing, name, rest))
}

/// 生成去掉属性后的标签
fn stripped_tag(closing: bool, name: &str, rest: &str) -> String {
    let slash = if closing { "/" } else { "" };
    let tail = if rest.trim().ends_with('/') { " /" } else { "" };
    format!("<{slash}{name}{tail}>")
}

/// 拆解：去掉所有标签属性，返回精简HTML和按顺序排列的标签记录
pub fn decompose(html: &str) -> (String, Vec<TagRecord>) {
    let mut stripped = String::with_capacity(html.len());
    let mut records = Vec::new();
    let mut last_end = 0;

    for token in tag_token_regex().find_iter(html) {
        stripped.push_str(&html[last_end..token.start()]);
        last_end = token.end();

        match parse_tag(token.as_str()) {
            Some((closing, name, rest)) => {
                stripped.push_str(&stripped_tag(closing, name, rest));
                records.push(TagRecord {
                    closing,
                    name: name.to_string(),
                    original: token.as_str().to_string(),
                });
            }
            None => stripped.push_str(token.as_str()),
        }
    }
    stripped.push_str(&html[last_end..]);

    debug!("🏷️  拆解标签 {} 个", records.len());
    (stripped, records)
}

/// 重组：按顺序把原始标签对应回翻译结果
///
/// 对不上号的标签视为模型新增或修改的标签，原样保留，不报错。
pub fn recompose(translated_html: &str, records: &[TagRecord]) -> Restoration {
    let mut html = String::with_capacity(translated_html.len());
    let mut unresolved = Vec::new();
    let mut next = 0;
    let mut last_end = 0;

    for token in tag_token_regex().find_iter(translated_html) {
        html.push_str(&translated_html[last_end..token.start()]);
        last_end = token.end();

        let matched = match (parse_tag(token.as_str()), records.get(next)) {
            (Some((closing, name, _)), Some(record)) => {
                closing == record.closing && name == record.name
            }
            _ => false,
        };

        if matched {
            html.push_str(&records[next].original);
            next += 1;
        } else {
            if parse_tag(token.as_str()).is_some() {
                unresolved.push(token.as_str().to_string());
            }
            html.push_str(token.as_str());
        }
    }
    html.push_str(&translated_html[last_end..]);

    let missing: Vec<String> = records[next..].iter().map(|r| r.original.clone()).collect();
    if !unresolved.is_empty() {
        warn!("⚠️  {} 个标签无法与原文对应，已原样保留", unresolved.len());
    }
    if !missing.is_empty() {
        warn!("⚠️  {} 个原始标签未在翻译结果中找到对应位置", missing.len());
    }

    Restoration {
        html,
        restored: next,
        unresolved,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_strips_attributes() {
        let (stripped, records) =
            decompose(r#"<p class="lead">Hi <img src="a.png" alt="cat"/></p>"#);

        assert_eq!(stripped, "<p>Hi <img /></p>");
        assert_eq!(records.len(), 3);
        assert!(!records[0].closing);
        assert_eq!(records[1].name, "img");
        assert!(records[2].closing);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let html = "<!DOCTYPE html>\n<html lang=\"en\"><!-- note --><body>\n<a href=\"/x\">go</a><br/></body></html>";
        let (stripped, records) = decompose(html);
        assert!(stripped.contains("<!-- note -->"));
        assert!(stripped.contains("<!DOCTYPE html>"));

        let restoration = recompose(&stripped, &records);
        assert_eq!(restoration.html, html);
        assert!(restoration.is_clean());
    }

    #[test]
    fn test_model_inserted_tag_is_kept() {
        let html = r#"<p class="a">Hello <b id="x">world</b></p>"#;
        let (_, records) = decompose(html);
        let translated = "<p>你好 <em>美丽的</em><b>世界</b></p>";

        let restoration = recompose(translated, &records);
        assert_eq!(
            restoration.html,
            r#"<p class="a">你好 <em>美丽的</em><b id="x">世界</b></p>"#
        );
        assert_eq!(restoration.unresolved, vec!["<em>", "</em>"]);
        assert!(restoration.missing.is_empty());
    }

    #[test]
    fn test_reordered_tags_lose_attributes() {
        let html = r#"<i class="a">x</i><b class="b">y</b>"#;
        let (_, records) = decompose(html);

        let restoration = recompose("<b>y</b><i>x</i>", &records);
        assert_eq!(restoration.html, r#"<b>y</b><i class="a">x</i>"#);
        assert_eq!(restoration.restored, 2);
        assert_eq!(restoration.unresolved, vec!["<b>", "</b>"]);
        assert_eq!(restoration.missing.len(), 2);
    }
}
