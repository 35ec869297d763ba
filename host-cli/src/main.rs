//! # Shiori Host（控制台前端）
//!
//! 驱动 shiori-runtime 的无渲染宿主：呈现效果落成 tracing 事件，
//! 对白打印到标准输出，输入从标准输入读取。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p host-cli
//! cargo run -p host-cli -- chapter2 --scripts-dir assets/scripts
//! cargo run -p host-cli -- --auto --skip --max-ticks 500
//! cargo run -p host-cli -- --lua 'shiori_execute_command("NEW_MUSIC", "morning")' --lua-only
//!
//! # 日志级别由 RUST_LOG 控制（默认 info）
//! RUST_LOG=shiori_runtime=debug cargo run -p host-cli
//! ```

mod console;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use console::{ConsoleMixer, ConsoleStage};
use shiori_runtime::{
    Catalog, DirSource, Engine, ExitRequest, LuaBridge, PlayerInput, Waiting,
};

#[derive(Parser)]
#[command(name = "shiori")]
#[command(about = "视觉小说脚本引擎 - 控制台宿主")]
#[command(version, author)]
struct Cli {
    /// 入口脚本逻辑名（默认：start）
    #[arg(default_value = "start")]
    script: String,

    /// 脚本目录（默认：assets/scripts）
    #[arg(short, long, default_value = "assets/scripts")]
    scripts_dir: PathBuf,

    /// 名册 JSON 文件（默认：assets/catalog.json）
    #[arg(short, long, default_value = "assets/catalog.json")]
    catalog: PathBuf,

    /// 跳过模式：对白每帧自动放行
    #[arg(long)]
    skip: bool,

    /// 无头自动模式：不读输入，对白自动放行，计时等待不真实睡眠
    #[arg(long)]
    auto: bool,

    /// 非交互运行的最大帧数（默认：10000）
    #[arg(long, default_value_t = 10_000)]
    max_ticks: usize,

    /// 进主循环前对引擎求值的 Lua 代码
    #[arg(long)]
    lua: Option<String>,

    /// 只求值 --lua 给的代码，不进脚本主循环
    #[arg(long, requires = "lua")]
    lua_only: bool,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("host-cli error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let catalog_text = std::fs::read_to_string(&cli.catalog)
        .with_context(|| format!("读取名册失败: {}", cli.catalog.display()))?;
    let catalog = Catalog::from_json(&catalog_text)
        .with_context(|| format!("解析名册失败: {}", cli.catalog.display()))?;

    let mut engine = Engine::new(
        catalog,
        Box::new(DirSource::new(&cli.scripts_dir)),
        Box::new(ConsoleStage),
        Box::new(ConsoleMixer),
    );

    if let Some(chunk) = &cli.lua {
        let bridge = LuaBridge::new();
        bridge
            .eval(&mut engine, chunk)
            .map_err(|e| anyhow::anyhow!("Lua 求值失败: {e}"))?;
        if cli.lua_only {
            return Ok(());
        }
    }

    engine
        .load_script(&cli.script, 0)
        .with_context(|| format!("载入入口脚本 '{}' 失败", cli.script))?;

    run_loop(&mut engine, &cli)
}

/// 主循环：把脚本推进到下一个停驻点，按停驻类型采集输入或睡眠
fn run_loop(engine: &mut Engine, cli: &Cli) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut pending = cli.skip.then_some(PlayerInput::SetSkip(true));
    let mut dt = Duration::ZERO;
    let mut ticks = 0usize;

    loop {
        let tick = engine.tick(pending.take(), dt);
        dt = Duration::ZERO;
        ticks += 1;

        if let Some(exit) = tick.exit {
            match exit {
                ExitRequest::Game => println!("(退出游戏)"),
                ExitRequest::MainMenu => println!("(返回主菜单)"),
            }
            break;
        }
        if tick.ended {
            println!("(脚本结束: {})", engine.script_name());
            break;
        }

        // 非交互运行防住循环脚本
        let headless = cli.auto || engine.state().skipping;
        if headless && ticks >= cli.max_ticks {
            tracing::warn!(ticks, "达到最大帧数，停止");
            break;
        }

        match tick.waiting {
            Waiting::Dialogue => {
                if tick.executed > 0 {
                    print_dialogue(engine);
                }
                // 跳过模式下引擎每帧自己放行，宿主不用喂输入
                if !engine.state().skipping {
                    if cli.auto {
                        pending = Some(PlayerInput::Advance);
                    } else if let Some(input) = read_advance(&stdin)? {
                        pending = Some(input);
                    } else {
                        println!("(输入结束)");
                        break;
                    }
                }
            }
            Waiting::Timer { remaining } => {
                if !headless {
                    std::thread::sleep(remaining);
                }
                dt = remaining;
            }
            Waiting::None => {}
        }
    }
    Ok(())
}

fn print_dialogue(engine: &Engine) {
    if let Some(dialogue) = &engine.state().dialogue {
        match &dialogue.name {
            Some(name) => println!("【{name}】{}", dialogue.text),
            None => println!("{}", dialogue.text),
        }
    }
}

/// 读一行标准输入作为推进信号，EOF 返回 None
fn read_advance(stdin: &io::Stdin) -> anyhow::Result<Option<PlayerInput>> {
    print!("▸ ");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = stdin.lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(PlayerInput::Advance))
}
