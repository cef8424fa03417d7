//! 属性保护策略
//!
//! 在翻译前把标签属性从HTML中剥离，翻译后再写回。默认使用占位符策略，
//! 按位置对应的策略只能通过配置选择。

// 第三方crate导入
use clap::ValueEnum;

// 本地模块导入
use crate::placeholder::{self, AttributeTable};
use crate::positional::{self, TagRecord};

/// 属性保护策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProtectionStrategy {
    /// 属性替换为 `{{ATTR_001}}` 占位符，按占位符恢复
    #[default]
    Placeholder,
    /// 属性全部剥离，按标签顺序恢复
    Positional,
}

impl ProtectionStrategy {
    /// 剥离属性，返回精简HTML及恢复所需的旁路表
    pub fn shield(self, html: &str) -> ShieldedHtml {
        match self {
            ProtectionStrategy::Placeholder => {
                let extracted = placeholder::extract_html(html);
                ShieldedHtml {
                    simplified: extracted.simplified,
                    side_table: SideTable::Placeholders(extracted.table),
                    collision_detected: extracted.collision_detected,
                }
            }
            ProtectionStrategy::Positional => {
                let (simplified, records) = positional::decompose(html);
                ShieldedHtml {
                    simplified,
                    side_table: SideTable::Tags(records),
                    collision_detected: false,
                }
            }
        }
    }
}

/// 恢复属性所需的旁路表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideTable {
    Placeholders(AttributeTable),
    Tags(Vec<TagRecord>),
}

/// 已剥离属性的文档
///
/// 只在一次翻译任务内存在，恢复后即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldedHtml {
    simplified: String,
    side_table: SideTable,
    collision_detected: bool,
}

impl ShieldedHtml {
    /// 发送给模型的精简HTML
    pub fn simplified(&self) -> &str {
        &self.simplified
    }

    pub fn side_table(&self) -> &SideTable {
        &self.side_table
    }

    /// 被保护的条目数（占位符或标签）
    pub fn protected_items(&self) -> usize {
        match &self.side_table {
            SideTable::Placeholders(table) => table.len(),
            SideTable::Tags(records) => records.len(),
        }
    }

    pub fn collision_detected(&self) -> bool {
        self.collision_detected
    }

    /// 把属性写回翻译结果
    pub fn restore(&self, translated_html: &str) -> Restoration {
        match &self.side_table {
            SideTable::Placeholders(table) => placeholder::restore_html(translated_html, table),
            SideTable::Tags(records) => positional::recompose(translated_html, records),
        }
    }
}

/// 恢复结果
///
/// 恢复过程从不失败，无法对应的内容原样保留并在这里报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restoration {
    /// 恢复后的HTML
    pub html: String,
    /// 成功恢复的次数
    pub restored: usize,
    /// 翻译结果中无法对应的内容（每次出现记录一次）
    pub unresolved: Vec<String>,
    /// 旁路表中未在翻译结果里出现的条目
    pub missing: Vec<String>,
}

impl Restoration {
    /// 所有条目都已恢复且没有无法对应的内容
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.missing.is_empty()
    }
}
