//! # Tokenize 模块
//!
//! 行分词器：把一行脚本按分隔符拆成字段。
//!
//! ## 契约
//!
//! - 字段数恒等于分隔符出现次数 + 1
//! - 连续分隔符产生空字段，行尾没有分隔符也补一个尾字段
//! - 不做任何空白修剪
//! - 纯函数，无副作用

/// 脚本行的字段分隔符
pub const FIELD_DELIMITER: char = ' ';

/// 按分隔符拆分一行
///
/// 没有分隔符时整行作为唯一字段返回。
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(str::to_owned).collect()
}
