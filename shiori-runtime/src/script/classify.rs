//! # Classify 模块
//!
//! 行归类器：由首 token 决定操作码。
//!
//! ## 归类顺序
//!
//! 1. 空 token（空行或行首分隔符）→ 注释
//! 2. 注释标记开头 → 注释
//! 3. 保留关键字精确匹配 → 对应操作码
//! 4. token 含冒号 → 对白
//! 5. 其余 → 旁白
//!
//! 对白回退规则是整个语法的核心：普通对白不需要任何标记，
//! 只有控制命令才需要关键字。

use crate::command::LineType;

/// 注释标记（前缀匹配）
pub const COMMENT_MARKERS: [&str; 2] = ["//", "--"];

/// 由首 token 归类操作码
pub fn classify(first_token: &str) -> LineType {
    if first_token.is_empty() {
        return LineType::Comment;
    }
    if COMMENT_MARKERS.iter().any(|m| first_token.starts_with(m)) {
        return LineType::Comment;
    }
    if let Some(kind) = LineType::from_keyword(first_token) {
        return kind;
    }
    if has_speaker_mark(first_token) {
        LineType::Speech
    } else {
        LineType::Narrative
    }
}

/// 首 token 是否带说话人标记（含冒号）
pub fn has_speaker_mark(token: &str) -> bool {
    token.contains(':')
}

/// 从说话人 token 提取名字：取第一个冒号之前的部分
///
/// `"Yuuji:"` → `Some("Yuuji")`；没有冒号时返回 `None`。
pub fn speaker_name(token: &str) -> Option<&str> {
    token.split_once(':').map(|(name, _)| name)
}
