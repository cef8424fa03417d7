use std::time::Duration;

use tracing::warn;

/// 单个文件的翻译统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TranslationStats {
    pub file_read_time: Duration,
    pub shield_time: Duration,
    pub translation_time: Duration,
    pub restore_time: Duration,
    pub file_write_time: Duration,
    pub input_size: usize,
    pub simplified_size: usize,
    pub output_size: usize,
    pub protected_items: usize,
    pub chunks_created: usize,
    pub restored_items: usize,
    pub unresolved_items: usize,
    pub missing_items: usize,
    pub collision_detected: bool,
}

impl TranslationStats {
    /// 精简HTML占原文的比例（百分比）
    pub fn simplified_ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 100.0;
        }
        self.simplified_size as f64 / self.input_size as f64 * 100.0
    }

    /// 是否存在恢复异常
    pub fn has_restore_issues(&self) -> bool {
        self.unresolved_items > 0 || self.missing_items > 0
    }
}

/// 打印性能统计
pub fn print_performance_stats(stats: &TranslationStats, total_duration: Duration) {
    println!("\n📊 翻译统计报告:");
    println!("═══════════════════════════════════════");

    // 时间分解
    println!("⏱️  时间分解:");
    println!("   文件读取: {}", format_duration(stats.file_read_time));
    println!("   属性提取: {}", format_duration(stats.shield_time));
    println!("   模型翻译: {}", format_duration(stats.translation_time));
    println!("   属性恢复: {}", format_duration(stats.restore_time));
    println!("   文件写入: {}", format_duration(stats.file_write_time));
    println!("   总耗时: {}", format_duration(total_duration));

    // 文件统计
    println!("\n📏 文件统计:");
    println!(
        "   原始HTML: {} 字符 ({:.1} KB)",
        stats.input_size,
        stats.input_size as f64 / 1024.0
    );
    println!(
        "   精简HTML: {} 字符 ({:.1}%)",
        stats.simplified_size,
        stats.simplified_ratio()
    );
    println!(
        "   最终HTML: {} 字符 ({:.1} KB)",
        stats.output_size,
        stats.output_size as f64 / 1024.0
    );

    // 占位符统计
    println!("\n🔖 属性统计:");
    println!("   保护条目: {} 个", stats.protected_items);
    println!("   创建分块: {} 个", stats.chunks_created);
    println!("   成功恢复: {} 次", stats.restored_items);
    if stats.has_restore_issues() {
        println!("   无法对应: {} 处", stats.unresolved_items);
        println!("   丢失条目: {} 个", stats.missing_items);
    }
    if stats.collision_detected {
        warn!("⚠️  原文包含占位符格式，恢复结果可能不准确");
    }

    // 性能指标
    let secs = total_duration.as_secs_f64();
    if secs > 0.0 {
        println!("\n🚀 性能指标:");
        println!(
            "   处理速度: {:.1} KB/s",
            stats.input_size as f64 / 1024.0 / secs
        );
    }
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
    }

    #[test]
    fn test_simplified_ratio() {
        let stats = TranslationStats {
            input_size: 200,
            simplified_size: 50,
            ..Default::default()
        };
        assert!((stats.simplified_ratio() - 25.0).abs() < f64::EPSILON);
        assert_eq!(TranslationStats::default().simplified_ratio(), 100.0);
    }

    #[test]
    fn test_restore_issues() {
        let mut stats = TranslationStats::default();
        assert!(!stats.has_restore_issues());
        stats.missing_items = 1;
        assert!(stats.has_restore_issues());
    }
}
