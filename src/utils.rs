// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use tracing::{debug, warn};
use walkdir::WalkDir;

// 本地模块导入
use crate::api_constants::{is_html_extension, output_config::RESULT_MARKER};
use crate::error::Result;
use crate::translation_error;

/// 输入源类型枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// 单个HTML文件
    File(PathBuf),
    /// 包含HTML文件的目录
    Directory(PathBuf),
}

/// 根据命令行开关选择日志级别，静默模式仍保留错误输出
pub fn log_level(verbose: bool, quiet: bool) -> tracing::Level {
    if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 验证输入源
/// 判断输入是文件还是目录，路径不存在时返回错误
pub fn validate_input_source(path: &Path) -> Result<InputSource> {
    if !path.exists() {
        return Err(translation_error!(input_validation, path.display(), "输入路径不存在"));
    }

    if path.is_dir() {
        return Ok(InputSource::Directory(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(translation_error!(input_validation, path.display(), "输入路径不是文件"));
    }

    match path.extension() {
        Some(ext) if is_html_extension(&ext.to_string_lossy()) => {}
        Some(ext) => warn!("⚠️  文件扩展名不是HTML: {}", ext.to_string_lossy()),
        None => warn!("⚠️  文件没有扩展名: {}", path.display()),
    }

    Ok(InputSource::File(path.to_path_buf()))
}

/// 是否为本工具生成的结果文件（如 page.result.html）
pub fn is_result_file(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| Path::new(stem).extension().map_or(false, |ext| ext == RESULT_MARKER))
        .unwrap_or(false)
}

/// 收集目录下所有待翻译的HTML文件，跳过已有的结果文件
pub fn collect_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| translation_error!(file_op, dir.display(), "扫描", e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || is_result_file(path) {
            continue;
        }
        if path
            .extension()
            .map_or(false, |ext| is_html_extension(&ext.to_string_lossy()))
        {
            debug!("发现HTML文件: {}", path.display());
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// 生成输出文件路径: origin.html -> origin.result.html
pub fn generate_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    if let Some(output_path) = output {
        return output_path.to_path_buf();
    }

    let stem = input.file_stem().unwrap_or_default();
    let output_name = match input.extension() {
        Some(ext) => format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            RESULT_MARKER,
            ext.to_string_lossy()
        ),
        None => format!("{}.{}.html", stem.to_string_lossy(), RESULT_MARKER),
    };

    match input.parent() {
        Some(parent) => parent.join(output_name),
        None => PathBuf::from(output_name),
    }
}
