// 中文说明：
// codeguard 命令行入口。模式按优先级选择：--cli 交互式会话，--web 启动 Web 服务，
// 否则对给定路径（文件或目录）做并行批量分析；都未指定时打印用法提示。
// 全局参数支持 verbose/quiet、配置文件以及规则、模型、输出目录、线程数等覆盖项。
use clap::{Parser, ValueEnum};
use colored::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use codeguard::analyzer::{BatchRunner, Scanner};
use codeguard::cli::InteractiveSession;
use codeguard::reporter::{JsonFormatter, PdfReportRenderer, TextFormatter};
use codeguard::utils::config::{load_config_with_overrides, ConfigOverrides, ScannerConfig};
use codeguard::utils::constants::NO_INPUT_HINT;
use codeguard::utils::error::Result;
use codeguard::utils::file_utils::{ensure_directory, expand_inputs};
use codeguard::utils::logger::{init_logging, LogLevel};
use codeguard::web::{self, AppState};

#[derive(Parser)]
#[command(name = "codeguard")]
#[command(about = "Rule and model based source code vulnerability scanner")]
#[command(version)]
struct Cli {
    /// Files or directories to analyze
    paths: Vec<PathBuf>,

    /// Start the interactive prompt
    #[arg(long)]
    cli: bool,

    /// Start the web interface
    #[arg(long)]
    web: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML configuration file
    #[arg(long, env = "CODEGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Rule table to use instead of the built-in one
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Model backend (lexical, onnx)
    #[arg(long)]
    backend: Option<String>,

    /// Model weights file (lexical) or exported model directory (onnx)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory for PDF reports
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Worker threads for batch analysis (0 = one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Batch output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip PDF reports in batch mode
    #[arg(long)]
    no_report: bool,

    /// Address for the web interface
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database for web results
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LogLevel::from_flags(cli.verbose, cli.quiet));

    let overrides = ConfigOverrides {
        rules_file: cli.rules.clone(),
        backend: cli.backend.clone(),
        model_path: cli.model.clone(),
        output_dir: cli.output_dir.clone(),
        threads: cli.threads,
        no_report: cli.no_report,
        bind: cli.bind.clone(),
        database_url: cli.database_url.clone(),
    };
    let config = load_config_with_overrides(cli.config.as_deref(), &overrides)?;

    if !cli.cli && !cli.web && cli.paths.is_empty() {
        println!("{}", NO_INPUT_HINT);
        return Ok(());
    }

    let scanner = Arc::new(Scanner::from_config(&config)?);
    info!(
        "{} ({} rules, {} model)",
        "codeguard ready".bright_green().bold(),
        scanner.rules().len(),
        scanner.classifier_name()
    );

    if cli.cli {
        interactive_command(&scanner, &config)
    } else if cli.web {
        web_command(scanner, &config).await
    } else {
        batch_command(scanner, &config, &cli.paths, cli.format)
    }
}

fn interactive_command(scanner: &Scanner, config: &ScannerConfig) -> Result<()> {
    let reports = report_renderer(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    InteractiveSession::new(scanner, reports.as_ref(), stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

async fn web_command(scanner: Arc<Scanner>, config: &ScannerConfig) -> Result<()> {
    let state = AppState::from_config(scanner, config).await?;
    web::serve(state).await
}

fn batch_command(
    scanner: Arc<Scanner>,
    config: &ScannerConfig,
    paths: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    let files = expand_inputs(paths);
    if files.is_empty() {
        warn!("No supported source files found under the given paths");
        return Ok(());
    }
    info!("Analyzing {} files...", files.len());

    let mut runner = BatchRunner::new(scanner, config.batch_threads());
    if let Some(renderer) = report_renderer(config)? {
        runner = runner.with_reports(renderer);
    }
    let results = runner.run(&files);

    match format {
        OutputFormat::Json => println!("{}", JsonFormatter::new().format(&results)?),
        OutputFormat::Text => print!("{}", TextFormatter::new().format_batch(&results)),
    }
    Ok(())
}

fn report_renderer(config: &ScannerConfig) -> Result<Option<PdfReportRenderer>> {
    if !config.report.enabled {
        return Ok(None);
    }
    ensure_directory(&config.report.output_dir)?;
    Ok(Some(PdfReportRenderer::new(&config.report.output_dir)))
}
