//! HTML GPT Translator - 基于大语言模型的HTML翻译库
//!
//! 翻译前把标签属性替换为占位符，按模型输入上限切分文档，逐块翻译后再恢复原始属性。

pub mod api_constants;
pub mod chunker;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod placeholder;
pub mod positional;
pub mod prompt;
pub mod shield;
pub mod stats;
pub mod translator;
pub mod utils;

pub use config::TranslatorConfig;
pub use error::{Result, TranslationError};
pub use pipeline::{HtmlTranslationPipeline, PipelineOutput};
pub use shield::{ProtectionStrategy, Restoration, ShieldedHtml};
pub use translator::{ChunkTranslator, IdentityTranslator, OpenAiTranslator};
