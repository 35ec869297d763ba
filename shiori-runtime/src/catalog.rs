//! # Catalog 模块
//!
//! 名册：角色（含服装/表情表）、背景、音乐、音效的名称表，
//! 供执行器做名称到索引的解析。
//!
//! ## 设计原则
//!
//! - 解析一律是**线性查找、首个大小写敏感的精确匹配**
//! - 查不到就是 `BadArgumentValue`，由调用方决定后果
//! - 名册从 JSON 反序列化（宿主的 `catalog.json`），按约定
//!   0 号角色是旁白

use serde::{Deserialize, Serialize};

/// 旁白的角色索引
///
/// 对白的说话人解析失败时回退到此索引，渲染时不显示名字框。
pub const NARRATOR_INDEX: usize = 0;

/// 角色定义
///
/// 立绘按网格组织：服装选行，表情选列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDef {
    /// 角色名（脚本中的说话人标记）
    pub name: String,
    /// 服装名表
    #[serde(default)]
    pub outfits: Vec<String>,
    /// 表情名表
    #[serde(default)]
    pub emotions: Vec<String>,
}

impl CharacterDef {
    /// 创建只有名字的角色
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outfits: Vec::new(),
            emotions: Vec::new(),
        }
    }
}

/// 名册
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// 角色表（0 号为旁白）
    #[serde(default)]
    pub characters: Vec<CharacterDef>,
    /// 背景名表
    #[serde(default)]
    pub backgrounds: Vec<String>,
    /// 音乐名表
    #[serde(default)]
    pub music: Vec<String>,
    /// 音效名表
    #[serde(default)]
    pub stings: Vec<String>,
}

impl Catalog {
    /// 从 JSON 文本反序列化名册
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// 解析角色名到索引
    pub fn character_index(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|c| c.name == name)
    }

    /// 解析说话人名到索引，查不到回退为旁白
    pub fn speaker_index(&self, name: &str) -> usize {
        self.character_index(name).unwrap_or(NARRATOR_INDEX)
    }

    /// 解析某角色的服装名到索引
    pub fn outfit_index(&self, character: usize, name: &str) -> Option<usize> {
        self.characters
            .get(character)?
            .outfits
            .iter()
            .position(|o| o == name)
    }

    /// 解析某角色的表情名到索引
    pub fn emotion_index(&self, character: usize, name: &str) -> Option<usize> {
        self.characters
            .get(character)?
            .emotions
            .iter()
            .position(|e| e == name)
    }

    /// 解析背景名到索引
    pub fn background_index(&self, name: &str) -> Option<usize> {
        self.backgrounds.iter().position(|b| b == name)
    }

    /// 解析音乐名到索引
    pub fn music_index(&self, name: &str) -> Option<usize> {
        self.music.iter().position(|m| m == name)
    }

    /// 解析音效名到索引
    pub fn sting_index(&self, name: &str) -> Option<usize> {
        self.stings.iter().position(|s| s == name)
    }
}
