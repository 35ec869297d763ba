//! # Source 模块
//!
//! 脚本来源抽象层：按逻辑名读取脚本全文。
//!
//! ## 路径约定
//!
//! 逻辑名不含目录与扩展名；文件系统实现按
//! `<脚本目录>/<名字>.txt` 解析。存储层（`ScriptStore`）只通过
//! 本抽象读取，自己不碰文件系统。

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::ScriptError;

/// 脚本文件扩展名
pub const SCRIPT_EXTENSION: &str = "txt";

/// 脚本来源
pub trait ScriptSource {
    /// 按逻辑名读取脚本全文
    fn read_script(&self, name: &str) -> Result<String, ScriptError>;

    /// 判断脚本是否存在
    fn exists(&self, name: &str) -> bool;

    /// 该逻辑名的完整位置描述（用于日志）
    fn describe(&self, name: &str) -> String;
}

/// 文件系统脚本来源
///
/// 从脚本目录按约定读取，用于正常运行。
#[derive(Debug, Clone)]
pub struct DirSource {
    /// 脚本根目录
    root: PathBuf,
}

impl DirSource {
    /// 创建文件系统脚本来源
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 解析逻辑名到完整路径
    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{SCRIPT_EXTENSION}"))
    }
}

impl ScriptSource for DirSource {
    fn read_script(&self, name: &str) -> Result<String, ScriptError> {
        let path = self.resolve(name);
        fs::read_to_string(&path).map_err(|e| ScriptError::ResourceNotFound {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn describe(&self, name: &str) -> String {
        self.resolve(name).to_string_lossy().to_string()
    }
}

/// 内存脚本来源
///
/// 用于测试与嵌入场景：脚本直接挂在名字上，不经过文件系统。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: HashMap<String, String>,
}

impl MemorySource {
    /// 创建空的内存来源
    pub fn new() -> Self {
        Self::default()
    }

    /// 挂载一份脚本
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(name.into(), text.into());
    }

    /// 链式挂载
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl ScriptSource for MemorySource {
    fn read_script(&self, name: &str) -> Result<String, ScriptError> {
        self.scripts
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::ResourceNotFound {
                name: name.to_string(),
                reason: "不在内存来源中".to_string(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    fn describe(&self, name: &str) -> String {
        format!("mem://{name}")
    }
}
