//! 翻译流水线
//!
//! 原始HTML -> 剥离属性 -> 分块 -> 逐块翻译 -> 拼接 -> 恢复属性 -> 最终HTML

// 标准库导入
use std::path::Path;
use std::time::Instant;

// 第三方crate导入
use tracing::{info, warn};

// 本地模块导入
use crate::chunker::chunk_html;
use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::stats::TranslationStats;
use crate::translation_error;
use crate::translator::{translate_chunks, ChunkTranslator, TranslationRequest};

/// 流水线输出
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// 恢复属性后的最终HTML
    pub html: String,
    pub stats: TranslationStats,
}

/// HTML翻译流水线
///
/// 每篇文档单独剥离属性，旁路表只在一次 `translate_html` 调用内存在。
pub struct HtmlTranslationPipeline<T> {
    translator: T,
    config: TranslatorConfig,
    system_prompt: String,
}

impl<T: ChunkTranslator> HtmlTranslationPipeline<T> {
    /// 创建流水线，配置无效时立即返回错误
    pub fn new(translator: T, config: TranslatorConfig, system_prompt: String) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            translator,
            config,
            system_prompt,
        })
    }

    /// 翻译一篇HTML文档
    pub async fn translate_html(&self, html: &str) -> Result<PipelineOutput> {
        let mut stats = TranslationStats {
            input_size: html.chars().count(),
            ..Default::default()
        };

        // 1. 剥离属性
        let shield_start = Instant::now();
        let shielded = self.config.strategy().shield(html);
        stats.shield_time = shield_start.elapsed();
        stats.simplified_size = shielded.simplified().chars().count();
        stats.protected_items = shielded.protected_items();
        stats.collision_detected = shielded.collision_detected();

        info!(
            "🔖 精简后HTML大小: {} 字符 ({:.1}%), 保护条目 {} 个",
            stats.simplified_size,
            stats.simplified_ratio(),
            stats.protected_items
        );

        // 2. 分块
        let chunks = chunk_html(shielded.simplified(), self.config.max_len())?;
        stats.chunks_created = chunks.len();

        // 3. 翻译
        let translate_start = Instant::now();
        let request = TranslationRequest {
            system_prompt: &self.system_prompt,
            source_language: self.config.source_lang(),
            target_language: self.config.target_lang(),
        };
        let translated =
            translate_chunks(&self.translator, &chunks, &request, self.config.concurrency())
                .await?;
        stats.translation_time = translate_start.elapsed();

        // 4. 恢复属性
        let restore_start = Instant::now();
        let restoration = shielded.restore(&translated.concat());
        stats.restore_time = restore_start.elapsed();
        stats.restored_items = restoration.restored;
        stats.unresolved_items = restoration.unresolved.len();
        stats.missing_items = restoration.missing.len();
        stats.output_size = restoration.html.chars().count();

        if !restoration.is_clean() {
            warn!(
                "⚠️  属性恢复不完整: {} 处无法对应, {} 个条目丢失",
                stats.unresolved_items, stats.missing_items
            );
        }
        info!("📄 最终HTML大小: {} 字符", stats.output_size);

        Ok(PipelineOutput {
            html: restoration.html,
            stats,
        })
    }

    /// 翻译单个文件并写入结果文件
    ///
    /// 翻译失败时不会写入任何输出
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<PipelineOutput> {
        info!("=== 开始翻译 {} ===", input.display());

        let read_start = Instant::now();
        let html = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| translation_error!(file_op, input.display(), "读取", e))?;
        let read_time = read_start.elapsed();

        let mut result = self.translate_html(&html).await?;
        result.stats.file_read_time = read_time;

        let write_start = Instant::now();
        tokio::fs::write(output, &result.html)
            .await
            .map_err(|e| translation_error!(file_op, output.display(), "写入", e))?;
        result.stats.file_write_time = write_start.elapsed();

        info!("✅ 翻译完成，结果已保存到: {}", output.display());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;
    use crate::prompt::DEFAULT_SYSTEM_PROMPT;
    use crate::shield::ProtectionStrategy;
    use crate::translator::IdentityTranslator;

    const PAGE: &str = concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>Wallet</title>",
        "<meta name=\"viewport\" content=\"width=device-width\"/></head>\n",
        "<body>\n<img src=\"a.png\" alt=\"cat\"> <p>Hello</p>\n",
        "<a class=\"btn\"\n   href=\"https://example.com/buy?coin=BTC&amp;x=1\">Buy BTC</a>\n",
        "</body>\n</html>\n"
    );

    /// 模拟模型：翻译文本，并把占位符内部加上空格
    struct FakeModel;

    impl ChunkTranslator for FakeModel {
        async fn translate_chunk(
            &self,
            _index: usize,
            chunk: &str,
            _request: &TranslationRequest<'_>,
        ) -> Result<String> {
            Ok(chunk
                .replace("Hello", "你好")
                .replace("Buy BTC", "購買 BTC")
                .replace("{{ATTR_002}}", "{{ ATTR_002 }}"))
        }
    }

    /// 模拟模型：丢掉第一个占位符，并编造一个不存在的占位符
    struct CarelessModel;

    impl ChunkTranslator for CarelessModel {
        async fn translate_chunk(
            &self,
            _index: usize,
            chunk: &str,
            _request: &TranslationRequest<'_>,
        ) -> Result<String> {
            Ok(chunk
                .replace(" {{ATTR_001}}", "")
                .replace("Hello", "你好 {{ATTR_777}}"))
        }
    }

    fn pipeline<T: ChunkTranslator>(translator: T, config: TranslatorConfig) -> HtmlTranslationPipeline<T> {
        HtmlTranslationPipeline::new(translator, config, DEFAULT_SYSTEM_PROMPT.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_identity_round_trip_with_small_chunks() {
        for strategy in [ProtectionStrategy::Placeholder, ProtectionStrategy::Positional] {
            let config = TranslatorConfig::new().with_max_len(16).with_strategy(strategy);
            let output = pipeline(IdentityTranslator, config).translate_html(PAGE).await.unwrap();

            assert_eq!(output.html, PAGE, "strategy {:?}", strategy);
            assert!(output.stats.chunks_created > 1);
            assert!(!output.stats.has_restore_issues());
        }
    }

    #[tokio::test]
    async fn test_scenario_single_chunk() {
        let html = r#"<img src="a.png" alt="cat"> <p>Hello</p>"#;
        let config = TranslatorConfig::new().with_max_len(1000);
        let output = pipeline(IdentityTranslator, config).translate_html(html).await.unwrap();

        assert_eq!(output.html, html);
        assert_eq!(output.stats.chunks_created, 1);
        assert_eq!(output.stats.protected_items, 1);
    }

    #[tokio::test]
    async fn test_translated_text_with_restored_attributes() {
        let output = pipeline(FakeModel, TranslatorConfig::new())
            .translate_html(PAGE)
            .await
            .unwrap();

        assert!(output.html.contains(r#"<img src="a.png" alt="cat"> <p>你好</p>"#));
        assert!(output.html.contains("href=\"https://example.com/buy?coin=BTC&amp;x=1\">購買 BTC</a>"));
        assert!(output.html.contains(r#"<meta name="viewport" content="width=device-width"/>"#));
        assert_eq!(output.stats.restored_items, 4);
    }

    #[tokio::test]
    async fn test_careless_model_degrades_gracefully() {
        let output = pipeline(CarelessModel, TranslatorConfig::new())
            .translate_html(PAGE)
            .await
            .unwrap();

        assert!(output.html.starts_with("<!DOCTYPE html>\n<html>\n"));
        assert!(output.html.contains("<p>你好 {{ATTR_777}}</p>"));
        assert_eq!(output.stats.unresolved_items, 1);
        assert_eq!(output.stats.missing_items, 1);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = HtmlTranslationPipeline::new(
            IdentityTranslator,
            TranslatorConfig::new().with_max_len(0),
            String::new(),
        );
        assert!(matches!(result, Err(TranslationError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_translate_file_writes_result() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("origin.html");
        let output = dir.path().join("origin.result.html");
        std::fs::write(&input, PAGE).unwrap();

        let result = pipeline(IdentityTranslator, TranslatorConfig::new())
            .translate_file(&input, &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), PAGE);
        assert_eq!(result.stats.output_size, PAGE.chars().count());
    }

    #[tokio::test]
    async fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.html");
        let output = dir.path().join("absent.result.html");

        let result = pipeline(IdentityTranslator, TranslatorConfig::new())
            .translate_file(&input, &output)
            .await;

        assert!(matches!(result, Err(TranslationError::FileOperation { .. })));
        assert!(!output.exists());
    }
}
