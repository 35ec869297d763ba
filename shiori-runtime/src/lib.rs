//! # Shiori Runtime
//!
//! 视觉小说引擎的脚本解释核心库。
//!
//! ## 架构概述
//!
//! `shiori-runtime` 是纯逻辑核心，不依赖任何渲染或音频引擎。
//! 脚本是逐行的命令文本：存储给出当前原始行，分词拆出字段，
//! 归类定出操作码，执行器消费命令并把呈现效果外送给协作方
//! trait（[`Stage`] / [`Mixer`]），宿主提供具体实现：
//!
//! ```text
//! Host                                Runtime
//!   │                                    │
//!   │── PlayerInput, dt ───────────────►│ tick()
//!   │                                    │  取行 → 分词 → 归类 → 执行
//!   │◄── Stage / Mixer 效果调用 ────────│
//!   │◄── Tick { waiting, exit, .. } ────│
//!   │                                    │
//! ```
//!
//! ## 核心类型
//!
//! - [`Engine`]：按帧推进的驱动器，宿主唯一需要持有的对象
//! - [`Status`]：命令执行状态码（跨 Lua 边界时为整数）
//! - [`Waiting`]：等待状态（对白停驻 / 计时等待）
//! - [`Catalog`]：名册，名称到索引的解析表
//!
//! ## 使用示例
//!
//! ```ignore
//! use shiori_runtime::{Catalog, DirSource, Engine, PlayerInput};
//!
//! let catalog = Catalog::from_json(&std::fs::read_to_string("catalog.json")?)?;
//! let mut engine = Engine::new(catalog, Box::new(DirSource::new("scripts")), stage, mixer);
//! engine.load_script("start", 0)?;
//!
//! // 主循环
//! loop {
//!     let tick = engine.tick(input.take(), dt);
//!     if tick.exit.is_some() || tick.ended {
//!         break;
//!     }
//!     // 根据 tick.waiting 决定如何采集输入
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`command`]：操作码、命令值、状态码、过渡效果表
//! - [`script`]：分词、归类、脚本存储
//! - [`runtime`]：上下文、执行器、引擎
//! - [`backend`]：呈现协作方接口（Stage/Mixer）
//! - [`catalog`]：名册
//! - [`source`]：脚本来源抽象
//! - [`state`]：引擎状态与等待模型
//! - [`diagnostic`]：脚本静态检查
//! - [`error`]：错误类型定义
//! - [`lua`]：嵌入式脚本桥（feature `lua`）

pub mod backend;
pub mod catalog;
pub mod command;
pub mod diagnostic;
pub mod error;
pub mod input;
#[cfg(feature = "lua")]
pub mod lua;
pub mod runtime;
pub mod script;
pub mod source;
pub mod state;

// 重导出核心类型
pub use backend::{DARKEN_OVERLAY_OPACITY, Mixer, NullMixer, NullStage, Stage};
pub use catalog::{Catalog, CharacterDef, NARRATOR_INDEX};
pub use command::{Command, LineType, Status, Transition};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze};
pub use error::{ScriptError, ScriptResult};
pub use input::PlayerInput;
#[cfg(feature = "lua")]
pub use lua::{CHANGE_BACKGROUND_FN, EXECUTE_COMMAND_FN, LuaBridge};
pub use runtime::{Context, Engine, Executor, FANCY_FADE_HOLD, Tick};
pub use script::{
    COMMENT_MARKERS, FIELD_DELIMITER, ScriptStore, classify, has_speaker_mark, speaker_name,
    split_line,
};
pub use source::{DirSource, MemorySource, SCRIPT_EXTENSION, ScriptSource};
pub use state::{DialogueLine, EngineState, ExitRequest, Waiting};
