//! # Store 模块
//!
//! 脚本存储：持有当前脚本的原始行与游标。
//!
//! ## 契约
//!
//! - 脚本只能整体替换（载入新脚本丢弃旧脚本）
//! - `jump` 不做越界检查；越界在下一次 `current_line` 时以
//!   `CursorOutOfRange` 暴露，绝不读越界内容
//! - 载入失败时之前的脚本与游标原样保留

use crate::error::ScriptError;
use crate::source::ScriptSource;

/// 脚本存储
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptStore {
    /// 当前脚本的逻辑名
    name: String,
    /// 原始行
    lines: Vec<String>,
    /// 游标（当前行索引，0 起）
    cursor: usize,
}

impl ScriptStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接用行数组替换脚本（测试与嵌入场景用），游标归到 `start`
    pub fn replace(&mut self, name: impl Into<String>, lines: Vec<String>, start: usize) {
        self.name = name.into();
        self.lines = lines;
        self.cursor = start;
    }

    /// 从来源按逻辑名载入脚本，游标归到 `start`
    ///
    /// 失败时之前的脚本与游标不变。
    pub fn load(
        &mut self,
        source: &dyn ScriptSource,
        name: &str,
        start: usize,
    ) -> Result<(), ScriptError> {
        let text = source.read_script(name)?;
        self.replace(name, text.lines().map(str::to_owned).collect(), start);
        Ok(())
    }

    /// 当前行的原始文本
    pub fn current_line(&self) -> Result<&str, ScriptError> {
        self.lines
            .get(self.cursor)
            .map(String::as_str)
            .ok_or(ScriptError::CursorOutOfRange {
                index: self.cursor,
                len: self.lines.len(),
            })
    }

    /// 游标前进一行
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// 游标跳转到指定行（不检查越界）
    pub fn jump(&mut self, target: usize) {
        self.cursor = target;
    }

    /// 当前游标
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 脚本行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 是否未载入任何脚本
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 当前脚本的逻辑名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 只读访问全部行（诊断用）
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
