use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use html_gpt_translator::config::{resolve_api_key, Cli};
use html_gpt_translator::prompt::load_system_prompt;
use html_gpt_translator::stats::{format_duration, print_performance_stats};
use html_gpt_translator::utils::{
    collect_html_files, generate_output_path, init_logging, validate_input_source, InputSource,
};
use html_gpt_translator::{ChunkTranslator, HtmlTranslationPipeline, IdentityTranslator, OpenAiTranslator};

/// 一个待翻译文件及其输出路径
struct Job {
    input: PathBuf,
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let total_start = Instant::now();

    if let Err(e) = run(&cli).await {
        error!("❌ 翻译失败: {:#}", e);
        std::process::exit(1);
    }

    if !cli.quiet {
        info!("🏁 全部完成，总耗时: {}", format_duration(total_start.elapsed()));
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    // 配置错误在任何处理开始之前报告
    let config = cli.to_config();
    config.validate().context("配置无效")?;
    let system_prompt = load_system_prompt(cli.prompt_file.as_deref()).context("加载提示词失败")?;

    let jobs = plan_jobs(cli)?;
    if jobs.is_empty() {
        warn!("⚠️  没有找到需要翻译的HTML文件: {}", cli.input.display());
        return Ok(());
    }

    if !cli.quiet {
        info!("🚀 启动HTML翻译: {} 个文件", jobs.len());
        info!(
            "🌐 {} -> {} (模型: {}, 策略: {:?})",
            config.source_lang(),
            config.target_lang(),
            config.model(),
            config.strategy()
        );
    }

    if cli.dry_run {
        info!("🧪 演练模式: 不调用模型，分块原样返回");
        let pipeline = HtmlTranslationPipeline::new(IdentityTranslator, config, system_prompt)?;
        run_jobs(&pipeline, &jobs, cli).await
    } else {
        let api_key = resolve_api_key(cli.api_key.as_deref())?;
        let translator = OpenAiTranslator::new(&config, &api_key).context("创建模型客户端失败")?;
        let pipeline = HtmlTranslationPipeline::new(translator, config, system_prompt)?;
        run_jobs(&pipeline, &jobs, cli).await
    }
}

/// 根据输入源生成翻译任务列表
fn plan_jobs(cli: &Cli) -> Result<Vec<Job>> {
    let jobs = match validate_input_source(&cli.input)? {
        InputSource::File(input) => {
            let output = generate_output_path(&input, cli.output.as_deref());
            vec![Job { input, output }]
        }
        InputSource::Directory(dir) => {
            if cli.output.is_some() {
                warn!("⚠️  目录模式下忽略 --output 参数");
            }
            collect_html_files(&dir)?
                .into_iter()
                .map(|input| {
                    let output = generate_output_path(&input, None);
                    Job { input, output }
                })
                .collect()
        }
    };
    Ok(jobs)
}

/// 依次翻译所有文件，单个文件失败不影响其他文件
async fn run_jobs<T: ChunkTranslator>(
    pipeline: &HtmlTranslationPipeline<T>,
    jobs: &[Job],
    cli: &Cli,
) -> Result<()> {
    let mut failed = 0;

    for job in jobs {
        if !cli.quiet {
            info!("📂 输入文件: {}", job.input.display());
            info!("📄 输出文件: {}", job.output.display());
        }

        let file_start = Instant::now();
        match pipeline.translate_file(&job.input, &job.output).await {
            Ok(result) => {
                if result.stats.has_restore_issues() {
                    warn!(
                        "⚠️  {} 的属性恢复不完整，请检查输出",
                        job.input.display()
                    );
                }
                if cli.stats || cli.verbose {
                    print_performance_stats(&result.stats, file_start.elapsed());
                }
            }
            Err(e) => {
                error!("❌ {} 翻译失败: {}", job.input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{}/{} 个文件翻译失败", failed, jobs.len());
    }
    Ok(())
}
