//! # 诊断模块
//!
//! 脚本静态检查 API：不执行脚本，逐行给出问题清单。
//! 供 `script-lint` 工具与宿主的调试路径使用。
//!
//! ## 设计原则
//!
//! - 纯函数 API，不依赖 IO（LOAD_SCRIPT 目标存在性检查除外，
//!   需要调用方传入来源）
//! - 诊断分级：Error（该行永远无法正确执行）、Warn（名册解析不到，
//!   换一份名册可能就好）、Info（说话人回退为旁白）
//! - 复用归类器与名册，不重复解析逻辑

use std::fmt;

use crate::catalog::Catalog;
use crate::command::{LineType, Transition};
use crate::script::{FIELD_DELIMITER, classify, speaker_name, split_line};
use crate::source::ScriptSource;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
///
/// `line` 是 0 起的行索引，与 GOTO 目标和引擎日志一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 脚本逻辑名
    pub script: String,
    /// 行索引（0 起）
    pub line: usize,
    /// 诊断消息
    pub message: String,
    /// 原始行内容（可选）
    pub detail: Option<String>,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(script: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            script: script.into(),
            line,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建警告诊断
    pub fn warn(script: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            script: script.into(),
            line,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建信息诊断
    pub fn info(script: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            script: script.into(),
            line,
            message: message.into(),
            detail: None,
        }
    }

    /// 附上原始行内容
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}:{}: {}",
            self.level, self.script, self.line, self.message
        )?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {detail}")?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .count()
    }

    /// 警告数量
    pub fn warn_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
            .count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤（不低于 `min_level` 的条目）
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 静态检查整份脚本
///
/// 执行以下检查：
/// - 参数不足（按操作码的最小参数数）
/// - GOTO 目标越界或不是行号
/// - WAIT 时长、LOAD_SCRIPT 续行号、角色横向位置解析失败
/// - 过渡名不在固定表里
/// - 背景/音乐/音效/角色/服装/表情在名册中解析不到
/// - 说话人将回退为旁白
///
/// `source` 给出时额外检查 LOAD_SCRIPT 的目标脚本是否存在。
pub fn analyze(
    script: &str,
    lines: &[String],
    catalog: &Catalog,
    source: Option<&dyn ScriptSource>,
) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    for (index, line) in lines.iter().enumerate() {
        check_line(script, index, line, lines.len(), catalog, source, &mut result);
    }
    result
}

fn check_line(
    script: &str,
    line: usize,
    raw: &str,
    total_lines: usize,
    catalog: &Catalog,
    source: Option<&dyn ScriptSource>,
    result: &mut DiagnosticResult,
) {
    let tokens = split_line(raw, FIELD_DELIMITER);
    let kind = classify(&tokens[0]);

    if kind == LineType::Comment {
        return;
    }

    if tokens.len() < kind.min_args() {
        if let Some(keyword) = kind.keyword() {
            result.push(
                Diagnostic::error(
                    script,
                    line,
                    format!(
                        "{keyword} 参数不足：需要 {} 个字段，只有 {} 个",
                        kind.min_args(),
                        tokens.len()
                    ),
                )
                .with_detail(raw),
            );
        }
        return;
    }

    match kind {
        LineType::NewBackground => {
            if catalog.background_index(&tokens[1]).is_none() {
                result.push(
                    Diagnostic::warn(script, line, format!("背景名解析不到：{}", tokens[1]))
                        .with_detail(raw),
                );
            }
        }
        LineType::NewMusic => {
            if catalog.music_index(&tokens[1]).is_none() {
                result.push(
                    Diagnostic::warn(script, line, format!("音乐名解析不到：{}", tokens[1]))
                        .with_detail(raw),
                );
            }
        }
        LineType::PlaySting | LineType::PlayStingLooped => {
            if catalog.sting_index(&tokens[1]).is_none() {
                result.push(
                    Diagnostic::warn(script, line, format!("音效名解析不到：{}", tokens[1]))
                        .with_detail(raw),
                );
            }
        }
        LineType::Goto => match tokens[1].parse::<usize>() {
            Ok(target) if target >= total_lines => {
                result.push(
                    Diagnostic::error(
                        script,
                        line,
                        format!("GOTO 目标越界：{target}（脚本共 {total_lines} 行）"),
                    )
                    .with_detail(raw),
                );
            }
            Ok(_) => {}
            Err(_) => {
                result.push(
                    Diagnostic::error(script, line, format!("GOTO 目标不是行号：{}", tokens[1]))
                        .with_detail(raw),
                );
            }
        },
        LineType::Wait => {
            if tokens[1].parse::<u64>().is_err() {
                result.push(
                    Diagnostic::error(script, line, format!("WAIT 时长不是毫秒数：{}", tokens[1]))
                        .with_detail(raw),
                );
            }
        }
        LineType::SetActiveTransition => {
            if Transition::from_name(&tokens[1]).is_none() {
                result.push(
                    Diagnostic::error(
                        script,
                        line,
                        format!(
                            "过渡名不在固定表里：{}（可用：{}）",
                            tokens[1],
                            Transition::NAMES.join(", ")
                        ),
                    )
                    .with_detail(raw),
                );
            }
        }
        LineType::DrawCharacter | LineType::DrawCharacterBrutal => {
            check_draw_character(script, line, raw, &tokens, catalog, result);
        }
        LineType::LoadScript => {
            if let Some(resume) = tokens.get(2) {
                if resume.parse::<usize>().is_err() {
                    result.push(
                        Diagnostic::error(
                            script,
                            line,
                            format!("LOAD_SCRIPT 续行号不是行号：{resume}"),
                        )
                        .with_detail(raw),
                    );
                }
            }
            if let Some(source) = source {
                if !source.exists(&tokens[1]) {
                    result.push(
                        Diagnostic::warn(
                            script,
                            line,
                            format!("脚本不在来源中：{}", source.describe(&tokens[1])),
                        )
                        .with_detail(raw),
                    );
                }
            }
        }
        LineType::Speech => {
            if let Some(name) = speaker_name(&tokens[0]) {
                if catalog.character_index(name).is_none() {
                    result.push(
                        Diagnostic::info(
                            script,
                            line,
                            format!("说话人 {name} 不在名册中，将回退为旁白"),
                        )
                        .with_detail(raw),
                    );
                }
            }
        }
        _ => {}
    }
}

/// 角色、服装、表情逐级检查，位置字段单独检查
fn check_draw_character(
    script: &str,
    line: usize,
    raw: &str,
    tokens: &[String],
    catalog: &Catalog,
    result: &mut DiagnosticResult,
) {
    if tokens[4].parse::<i32>().is_err() {
        result.push(
            Diagnostic::error(script, line, format!("横向位置不是整数：{}", tokens[4]))
                .with_detail(raw),
        );
    }
    let Some(character) = catalog.character_index(&tokens[1]) else {
        result.push(
            Diagnostic::warn(script, line, format!("角色名解析不到：{}", tokens[1]))
                .with_detail(raw),
        );
        return;
    };
    if catalog.outfit_index(character, &tokens[2]).is_none() {
        result.push(
            Diagnostic::warn(
                script,
                line,
                format!("角色 {} 没有服装：{}", tokens[1], tokens[2]),
            )
            .with_detail(raw),
        );
    }
    if catalog.emotion_index(character, &tokens[3]).is_none() {
        result.push(
            Diagnostic::warn(
                script,
                line,
                format!("角色 {} 没有表情：{}", tokens[1], tokens[3]),
            )
            .with_detail(raw),
        );
    }
}
