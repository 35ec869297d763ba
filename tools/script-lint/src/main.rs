//! # Script Lint
//!
//! 脚本静态检查工具 - 不运行引擎，逐行检查脚本并输出问题清单。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p script-lint
//! cargo run -p script-lint -- assets/scripts/start.txt
//! cargo run -p script-lint -- --scripts-dir assets/scripts --catalog assets/catalog.json
//! cargo run -p script-lint -- --min-level warn
//! ```
//!
//! 检查内容：
//!   - 参数不足（按操作码的最小参数数）
//!   - GOTO 目标越界或不是行号
//!   - WAIT 时长、续行号、横向位置解析失败
//!   - 背景/音乐/音效/角色引用在名册中解析不到
//!   - LOAD_SCRIPT 目标文件是否存在
//!
//! 发现 ERROR 级诊断时退出码非零，供 CI 做门禁。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use walkdir::WalkDir;

use shiori_runtime::{
    Catalog, DiagnosticLevel, DiagnosticResult, DirSource, SCRIPT_EXTENSION, ScriptSource,
    analyze,
};

#[derive(Parser)]
#[command(name = "script-lint")]
#[command(about = "脚本静态检查工具 - 检查参数、跳转目标与名册引用")]
#[command(version, author)]
struct Cli {
    /// 要检查的脚本文件或目录（默认：检查 --scripts-dir）
    path: Option<PathBuf>,

    /// 脚本目录（默认：assets/scripts）
    #[arg(short, long, default_value = "assets/scripts")]
    scripts_dir: PathBuf,

    /// 名册 JSON 文件（默认：assets/catalog.json）
    #[arg(short, long, default_value = "assets/catalog.json")]
    catalog: PathBuf,

    /// 只输出不低于该级别的诊断：info、warn、error（默认：info）
    #[arg(long, default_value = "info")]
    min_level: String,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("script-lint error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let min_level = parse_level(&cli.min_level)?;

    let catalog_text = std::fs::read_to_string(&cli.catalog)
        .with_context(|| format!("读取名册失败: {}", cli.catalog.display()))?;
    let catalog = Catalog::from_json(&catalog_text)
        .with_context(|| format!("解析名册失败: {}", cli.catalog.display()))?;

    // 确定要检查的文件
    let files = match &cli.path {
        Some(path) if path.is_file() => vec![path.clone()],
        Some(path) if path.is_dir() => collect_script_files(path),
        Some(path) => anyhow::bail!("路径不存在: {}", path.display()),
        None => {
            if !cli.scripts_dir.exists() {
                anyhow::bail!(
                    "默认脚本目录不存在: {}\n请在项目根目录运行，或指定脚本路径",
                    cli.scripts_dir.display()
                );
            }
            collect_script_files(&cli.scripts_dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.{SCRIPT_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut checked = 0usize;
    let mut unreadable = 0usize;
    let mut all = DiagnosticResult::new();

    for file in &files {
        match check_script_file(file, &catalog) {
            Ok(result) => {
                checked += 1;
                all.merge(result);
            }
            Err(e) => {
                eprintln!("[ERROR] {}: {e:#}", file.display());
                unreadable += 1;
            }
        }
    }

    print_result(checked, unreadable, &all, min_level);

    if unreadable > 0 || all.has_errors() {
        anyhow::bail!("脚本检查发现错误");
    }
    Ok(())
}

fn parse_level(name: &str) -> anyhow::Result<DiagnosticLevel> {
    match name {
        "info" => Ok(DiagnosticLevel::Info),
        "warn" => Ok(DiagnosticLevel::Warn),
        "error" => Ok(DiagnosticLevel::Error),
        other => anyhow::bail!("未知诊断级别: {other}（可用：info、warn、error）"),
    }
}

/// 收集目录树下的所有脚本文件，按路径排序
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == SCRIPT_EXTENSION)
        })
        .collect();
    files.sort();
    files
}

/// 检查单个脚本文件
///
/// LOAD_SCRIPT 的目标按同目录约定检查存在性。
fn check_script_file(file: &Path, catalog: &Catalog) -> anyhow::Result<DiagnosticResult> {
    let content = std::fs::read_to_string(file).context("无法读取文件")?;
    let lines: Vec<String> = content.lines().map(str::to_owned).collect();

    let script = file.display().to_string();
    let source = file.parent().map(DirSource::new);
    let source = source.as_ref().map(|s| s as &dyn ScriptSource);

    Ok(analyze(&script, &lines, catalog, source))
}

/// 输出检查结果
fn print_result(
    checked: usize,
    unreadable: usize,
    all: &DiagnosticResult,
    min_level: DiagnosticLevel,
) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {checked} 个脚本");
    eprintln!();

    for diag in all.filter_by_level(min_level) {
        eprintln!("{diag}");
    }

    let error_count = unreadable + all.error_count();
    let warn_count = all.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
