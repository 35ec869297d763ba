//! # Error 模块
//!
//! 定义脚本载入/读取的错误类型。
//!
//! ## 设计原则
//!
//! - 错误只覆盖**可失败的资源操作**（载入、按游标读行）
//! - 命令执行的结果用 `command::Status` 表达，从不抛错
//! - 错误信息面向脚本作者，包含定位所需的上下文

use thiserror::Error;

/// 脚本载入/读取错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// 脚本资源无法打开，之前的脚本与游标保持不变
    #[error("脚本资源 '{name}' 无法打开：{reason}")]
    ResourceNotFound {
        /// 脚本逻辑名（不含目录与扩展名）
        name: String,
        /// 底层失败原因
        reason: String,
    },

    /// 游标越界（脚本写错了跳转目标，或脚本自然走到了末尾）
    #[error("游标 {index} 超出脚本范围（共 {len} 行）")]
    CursorOutOfRange {
        /// 当前游标值
        index: usize,
        /// 脚本总行数
        len: usize,
    },
}

/// 本 crate 的 Result 别名
pub type ScriptResult<T> = Result<T, ScriptError>;
