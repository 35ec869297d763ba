//! # Context 模块
//!
//! 解释器上下文：脚本存储、引擎状态、名册、脚本来源，
//! 集中在一个显式对象里。
//!
//! ## 设计说明
//!
//! 引擎启动时构造一份，贯穿整个生命周期；测试每个用例
//! 构造全新的一份。除此之外不存在任何进程级可变状态。

use crate::catalog::Catalog;
use crate::script::ScriptStore;
use crate::source::ScriptSource;
use crate::state::EngineState;

/// 解释器上下文
pub struct Context {
    /// 脚本存储（原始行 + 游标）
    pub store: ScriptStore,
    /// 引擎状态
    pub state: EngineState,
    /// 名册
    pub catalog: Catalog,
    /// 脚本来源（LOAD_SCRIPT 链式载入用）
    pub source: Box<dyn ScriptSource>,
}

impl Context {
    /// 创建上下文，脚本存储与状态均为初始值
    pub fn new(catalog: Catalog, source: Box<dyn ScriptSource>) -> Self {
        Self {
            store: ScriptStore::new(),
            state: EngineState::new(),
            catalog,
            source,
        }
    }
}
