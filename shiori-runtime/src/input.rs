//! # Input 模块
//!
//! 定义宿主向引擎传递的玩家输入。

use serde::{Deserialize, Serialize};

/// 玩家输入
///
/// 每帧至多传入一个。引擎只在对应的等待状态下消费它，
/// 其余情况静默忽略（点穿计时等待是不允许的）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// 推进对白（点击/回车）
    Advance,
    /// 开关跳过模式
    SetSkip(bool),
}
