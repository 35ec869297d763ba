//! # Script 模块
//!
//! 脚本侧的三个叶子组件：分词（[`tokenize`]）、归类（[`classify`]）、
//! 存储与游标（[`store`]）。
//!
//! 数据流：存储给出当前原始行 → 分词拆字段 → 归类定操作码 →
//! 执行器（`runtime::Executor`）消费。

pub mod classify;
pub mod store;
pub mod tokenize;

pub use classify::{COMMENT_MARKERS, classify, has_speaker_mark, speaker_name};
pub use store::ScriptStore;
pub use tokenize::{FIELD_DELIMITER, split_line};
