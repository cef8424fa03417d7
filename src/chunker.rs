//! HTML分块模块
//!
//! 在 `>` 之后切分精简HTML，贪心地把片段装进不超过上限的分块中。
//! 所有分块按顺序拼接后与输入完全一致。

use tracing::debug;

use crate::error::Result;
use crate::translation_error;

/// 按标签边界切分HTML
///
/// 长度按字符（Unicode标量值）计算。单个片段本身超过上限时单独成块，不会在标签中间截断。
/// `max_len` 为0时返回配置错误。
pub fn chunk_html(text: &str, max_len: usize) -> Result<Vec<String>> {
    if max_len == 0 {
        return Err(translation_error!(config, "max_len", "分块长度上限必须大于0"));
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for fragment in text.split_inclusive('>') {
        let fragment_len = fragment.chars().count();
        if !buffer.is_empty() && buffer_len + fragment_len > max_len {
            chunks.push(std::mem::take(&mut buffer));
            buffer_len = 0;
        }
        buffer.push_str(fragment);
        buffer_len += fragment_len;
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    debug!("✂️  分块完成: {} 个分块 (上限 {} 字符)", chunks.len(), max_len);
    Ok(chunks)
}
