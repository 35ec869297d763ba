//! # State 模块
//!
//! 定义引擎的运行时状态与等待模型。
//!
//! ## 设计原则
//!
//! - 所有解释器状态集中在一个显式的状态对象里，不允许隐式全局状态
//! - 挂起（WAIT、华丽淡出、对白停顿）建模为**数据**而非阻塞调用，
//!   主循环始终保持响应
//! - 所有字段可序列化，宿主可以随时以 JSON 快照观察引擎

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::NARRATOR_INDEX;
use crate::command::Transition;

/// 等待状态
///
/// 引擎在执行过程中可能停驻，需要特定条件才能继续。
/// 宿主根据此状态决定如何采集输入。
///
/// # 状态转换
///
/// ```text
/// None      -> 继续执行，不等待
/// Dialogue  -> 对白停驻，收到 Advance 输入（或跳过模式）后继续
/// Timer     -> 计时等待，由每帧传入的流逝时间递减，归零后继续
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waiting {
    /// 不等待，继续执行
    None,

    /// 对白停驻，游标停在当前行
    Dialogue,

    /// 计时等待（WAIT 命令或华丽淡出）
    Timer {
        /// 剩余时长
        remaining: Duration,
    },
}

impl Waiting {
    /// 是否处于等待状态
    pub fn is_waiting(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// 创建对白停驻状态
    pub fn dialogue() -> Self {
        Self::Dialogue
    }

    /// 创建计时等待状态
    pub fn timer(remaining: Duration) -> Self {
        Self::Timer { remaining }
    }
}

impl Default for Waiting {
    fn default() -> Self {
        Self::None
    }
}

/// 退出请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitRequest {
    /// 退出游戏
    Game,
    /// 返回主菜单
    MainMenu,
}

/// 当前对白行（供宿主渲染）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// 说话人索引（0 = 旁白，不显示名字框）
    pub speaker: usize,
    /// 说话人显示名（旁白为 None）
    pub name: Option<String>,
    /// 对白文本
    pub text: String,
}

/// 引擎状态
///
/// 这是解释器的**唯一可变状态**。每个引擎实例持有一份，
/// 测试可以用全新状态起步，互不干扰。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// 当前激活的过渡效果，仅由 SET_ACTIVE_TRANSITION 修改
    pub active_transition: Transition,

    /// 当前说话人索引，每执行一条对白更新一次
    pub active_speaker: usize,

    /// 当前对白行（停驻期间供宿主重绘）
    pub dialogue: Option<DialogueLine>,

    /// 跳过模式：对白停驻每帧自动放行
    pub skipping: bool,

    /// 当前等待状态
    pub waiting: Waiting,

    /// 退出请求，置位后不再执行任何命令
    pub exit: Option<ExitRequest>,

    /// 当前背景索引
    pub current_background: Option<usize>,

    /// 压暗层是否生效
    pub darkened: bool,
}

impl EngineState {
    /// 创建初始状态
    pub fn new() -> Self {
        Self {
            active_transition: Transition::default(),
            active_speaker: NARRATOR_INDEX,
            dialogue: None,
            skipping: false,
            waiting: Waiting::None,
            exit: None,
            current_background: None,
            darkened: false,
        }
    }

    /// 进入等待状态
    pub fn wait(&mut self, waiting: Waiting) {
        self.waiting = waiting;
    }

    /// 清除等待状态
    pub fn clear_wait(&mut self) {
        self.waiting = Waiting::None;
    }

    /// 置退出请求（只记录第一个）
    pub fn request_exit(&mut self, request: ExitRequest) {
        if self.exit.is_none() {
            self.exit = Some(request);
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
