//! 模型翻译模块
//!
//! 把精简HTML分块发送给OpenAI兼容的聊天补全接口。失败的分块直接返回错误，
//! 不做重试，由调用方决定放弃整篇文档还是重新执行。

// 标准库导入
use std::future::Future;
use std::time::Duration;

// 第三方crate导入
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

// 本地模块导入
use crate::api_constants::chat_completions_url;
use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::prompt::build_user_message;
use crate::translation_error;

/// 单次翻译任务共享的只读参数
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    pub system_prompt: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
}

/// 分块翻译接口
///
/// 输入一个精简HTML分块，返回翻译后的文本。实现方应尽量保留占位符，
/// 但恢复阶段不依赖这一点。
pub trait ChunkTranslator {
    fn translate_chunk(
        &self,
        index: usize,
        chunk: &str,
        request: &TranslationRequest<'_>,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// 原样返回分块，用于演练模式和测试
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl ChunkTranslator for IdentityTranslator {
    async fn translate_chunk(
        &self,
        _index: usize,
        chunk: &str,
        _request: &TranslationRequest<'_>,
    ) -> Result<String> {
        Ok(chunk.to_string())
    }
}

/// OpenAI兼容的聊天补全客户端
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl OpenAiTranslator {
    /// 创建客户端
    pub fn new(config: &TranslatorConfig, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(translation_error!(config, "api_key", "API密钥不能为空"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(config.api_base()),
            api_key: api_key.to_string(),
            model: config.model().to_string(),
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        })
    }

    fn request_body(&self, chunk: &str, request: &TranslationRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                {
                    "role": "user",
                    "content": build_user_message(chunk, request.source_language, request.target_language)
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        })
    }
}

impl ChunkTranslator for OpenAiTranslator {
    async fn translate_chunk(
        &self,
        index: usize,
        chunk: &str,
        request: &TranslationRequest<'_>,
    ) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(chunk, request))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(translation_error!(
                translation_api,
                status.as_u16(),
                format!("分块 {} 翻译失败: {}", index, response_text),
                self.endpoint
            ));
        }

        let json_val: Value = serde_json::from_str(&response_text)
            .map_err(|e| translation_error!(model_response, index, format!("JSON解析失败: {}", e)))?;

        let content = json_val
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                translation_error!(model_response, index, "响应中缺少 choices[0].message.content")
            })?;

        if let Some(reason) = json_val.pointer("/choices/0/finish_reason").and_then(Value::as_str) {
            if reason == "length" {
                warn!("⚠️  分块 {} 的输出因长度限制被截断", index);
            }
        }

        Ok(content.to_string())
    }
}

/// 翻译所有分块，结果按原始顺序返回
///
/// 最多同时进行 `concurrency` 个请求；任一分块失败时整体返回该错误。
pub async fn translate_chunks<T: ChunkTranslator>(
    translator: &T,
    chunks: &[String],
    request: &TranslationRequest<'_>,
    concurrency: usize,
) -> Result<Vec<String>> {
    let total = chunks.len();
    if total == 0 {
        return Ok(vec![]);
    }

    info!("🚀 开始翻译: {} 个分块，并发 {}", total, concurrency.max(1));

    stream::iter(chunks.iter().enumerate())
        .map(|(index, chunk)| async move {
            debug!("处理分块 {}/{}: {} 字符", index + 1, total, chunk.chars().count());
            let result = translator.translate_chunk(index, chunk, request).await;
            match &result {
                Ok(translated) => {
                    info!("✅ 分块 {}/{} 完成: {} 字符", index + 1, total, translated.chars().count())
                }
                Err(e) => warn!("❌ 分块 {}/{} 失败: {}", index + 1, total, e),
            }
            result
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
