//! # Engine 模块
//!
//! 引擎：按帧推进脚本的驱动器。宿主每帧调用一次 [`Engine::tick`]，
//! 传入本帧输入与流逝时间，引擎把脚本推进到下一个停驻点。
//!
//! ## 帧推进模型
//!
//! 单线程协作式：一次 tick 内先结算输入与计时，然后连续执行脚本行，
//! 直到进入等待、收到退出请求或脚本走到尽头。立即完成的命令（切背景、
//! 换音乐、跳转）在同一帧内连续消化，宿主只在停驻点看到引擎。
//!
//! ```text
//!   输入结算 -> 计时递减 -> 跳过模式放行 -> 逐行执行直到停驻
//! ```
//!
//! ## 两个入口
//!
//! - [`Engine::tick`]：原生脚本推进
//! - [`Engine::dispatch`]：外部（Lua 桥、宿主调试台）直接派发一条命令，
//!   与脚本行走同一个执行器
use std::time::Duration;

use crate::backend::{Mixer, Stage};
use crate::catalog::Catalog;
use crate::command::{Command, LineType, Status};
use crate::error::ScriptError;
use crate::input::PlayerInput;
use crate::script::{FIELD_DELIMITER, classify, split_line};
use crate::source::ScriptSource;
use crate::state::{EngineState, ExitRequest, Waiting};

use super::context::Context;
use super::executor::Executor;

/// 一次 tick 的结果摘要，供宿主决定下一帧做什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 本帧执行的命令条数
    pub executed: usize,
    /// tick 结束时的等待状态
    pub waiting: Waiting,
    /// 退出请求（若有）
    pub exit: Option<ExitRequest>,
    /// 脚本是否已走到尽头
    pub ended: bool,
}

/// 脚本引擎
///
/// 持有上下文与两个呈现协作方。协作方以 trait 对象注入，
/// 宿主给真实现，无头场景给空实现。
pub struct Engine {
    ctx: Context,
    executor: Executor,
    stage: Box<dyn Stage>,
    mixer: Box<dyn Mixer>,
    /// 脚本走到尽头后置位，直到载入新脚本
    ended: bool,
}

impl Engine {
    /// 创建引擎，脚本存储为空，需要先 [`Engine::load_script`]
    pub fn new(
        catalog: Catalog,
        source: Box<dyn ScriptSource>,
        stage: Box<dyn Stage>,
        mixer: Box<dyn Mixer>,
    ) -> Self {
        Self {
            ctx: Context::new(catalog, source),
            executor: Executor::new(),
            stage,
            mixer,
            ended: false,
        }
    }

    /// 从来源载入脚本并把游标放到 `start`
    ///
    /// 成功后清除等待与对白残留。失败时引擎维持原状。
    pub fn load_script(&mut self, name: &str, start: usize) -> Result<(), ScriptError> {
        let Context { store, source, .. } = &mut self.ctx;
        store.load(source.as_ref(), name, start)?;
        self.reset_after_load();
        tracing::info!(script = name, start, "脚本已载入");
        Ok(())
    }

    /// 直接挂载整份脚本行（测试与嵌入场景）
    pub fn load_lines(&mut self, name: &str, lines: Vec<String>, start: usize) {
        self.ctx.store.replace(name, lines, start);
        self.reset_after_load();
    }

    fn reset_after_load(&mut self) {
        self.ctx.state.clear_wait();
        self.ctx.state.dialogue = None;
        self.ended = false;
    }

    /// 推进一帧
    ///
    /// `input` 是本帧的玩家输入（若有），`dt` 是上一帧以来的流逝时间。
    pub fn tick(&mut self, input: Option<PlayerInput>, dt: Duration) -> Tick {
        if let Some(input) = input {
            self.handle_input(input);
        }

        // 退出请求终结一切推进
        if self.ctx.state.exit.is_some() {
            return self.summary(0);
        }

        // 计时等待按流逝时间递减，没走完本帧就到此为止
        if let Waiting::Timer { remaining } = self.ctx.state.waiting {
            match remaining.checked_sub(dt) {
                Some(rest) if !rest.is_zero() => {
                    self.ctx.state.wait(Waiting::timer(rest));
                    return self.summary(0);
                }
                _ => self.ctx.state.clear_wait(),
            }
        }

        // 跳过模式：对白停驻每帧自动放行一条
        if self.ctx.state.skipping && self.ctx.state.waiting == Waiting::Dialogue {
            self.release_dialogue();
        }

        let mut executed = 0;
        while !self.ctx.state.waiting.is_waiting() && self.ctx.state.exit.is_none() && !self.ended
        {
            let line = match self.ctx.store.current_line() {
                Ok(line) => line.to_owned(),
                Err(error) => {
                    self.note_end(&error);
                    break;
                }
            };
            let tokens = split_line(&line, FIELD_DELIMITER);
            let kind = classify(&tokens[0]);
            let command = Command::new(kind, tokens, self.ctx.store.cursor());
            self.executor
                .execute(&command, &mut self.ctx, self.stage.as_mut(), self.mixer.as_mut());
            executed += 1;
        }

        self.summary(executed)
    }

    /// 外部派发一条命令（Lua 桥与宿主调试台的前门）
    ///
    /// 与脚本行共用执行器，游标约定同样生效：派发 `GOTO` 会改写
    /// 游标，派发对白会停驻。
    pub fn dispatch(&mut self, kind: LineType, args: Vec<String>) -> Status {
        let command = Command::new(kind, args, self.ctx.store.cursor());
        self.executor
            .execute(&command, &mut self.ctx, self.stage.as_mut(), self.mixer.as_mut())
    }

    fn handle_input(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Advance => {
                if self.ctx.state.waiting == Waiting::Dialogue {
                    self.release_dialogue();
                }
            }
            PlayerInput::SetSkip(on) => {
                self.ctx.state.skipping = on;
            }
        }
    }

    /// 放行当前对白：清除停驻并把游标挪过这条对白行
    fn release_dialogue(&mut self) {
        self.ctx.state.clear_wait();
        self.ctx.state.dialogue = None;
        self.ctx.store.advance();
    }

    fn note_end(&mut self, error: &ScriptError) {
        let natural = matches!(
            error,
            ScriptError::CursorOutOfRange { index, len } if index == len
        );
        if natural {
            tracing::debug!(script = %self.ctx.store.name(), "脚本执行到末尾");
        } else {
            tracing::warn!(
                script = %self.ctx.store.name(),
                error = %error,
                "游标越界，停止推进"
            );
        }
        self.ended = true;
    }

    fn summary(&self, executed: usize) -> Tick {
        Tick {
            executed,
            waiting: self.ctx.state.waiting,
            exit: self.ctx.state.exit,
            ended: self.ended,
        }
    }

    /// 引擎状态快照
    pub fn state(&self) -> &EngineState {
        &self.ctx.state
    }

    /// 当前脚本逻辑名
    pub fn script_name(&self) -> &str {
        self.ctx.store.name()
    }

    /// 当前游标位置
    pub fn cursor(&self) -> usize {
        self.ctx.store.cursor()
    }

    /// 脚本是否已走到尽头
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}
