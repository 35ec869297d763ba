//! # Lua 模块
//!
//! 嵌入式脚本桥：把命令执行器暴露给 Lua。桥上只有两个入口，
//! 与原生脚本行共用同一套执行语义，状态码以整数跨边界返回。
//!
//! ```lua
//! local ok = shiori_change_background("park")
//! shiori_execute_command("NEW_MUSIC", "morning")
//! shiori_execute_command("GOTO", 12)
//! ```
//!
//! ## 借用模型
//!
//! 桥不持有引擎。每次 [`LuaBridge::eval`] 在一个 scope 里注册
//! 全局函数，函数借用引擎到本次求值结束为止；求值返回后这些
//! 函数随 scope 失效。桥必须和引擎在同一线程使用。

use std::cell::RefCell;

use mlua::{Lua, Variadic};

use crate::command::{LineType, Status};
use crate::runtime::Engine;
use crate::script::classify;

/// 背景切换入口的全局名
pub const CHANGE_BACKGROUND_FN: &str = "shiori_change_background";
/// 通用命令入口的全局名
pub const EXECUTE_COMMAND_FN: &str = "shiori_execute_command";

/// Lua 桥
///
/// 持有一个 Lua 解释器实例。标准库按 mlua 默认加载，
/// 不额外开放文件或系统访问。
pub struct LuaBridge {
    lua: Lua,
}

impl LuaBridge {
    /// 创建桥与内部解释器
    pub fn new() -> Self {
        Self { lua: Lua::new() }
    }

    /// 对引擎求值一段 Lua 代码
    ///
    /// 求值期间 `shiori_change_background` / `shiori_execute_command`
    /// 可用，返回整数状态码（见 [`Status::code`]）。
    pub fn eval(&self, engine: &mut Engine, chunk: &str) -> mlua::Result<()> {
        let engine = RefCell::new(engine);
        self.lua.scope(|scope| {
            let change_background = scope.create_function_mut(|_, name: String| {
                let status = engine.borrow_mut().dispatch(
                    LineType::NewBackground,
                    vec![" ".to_string(), name],
                );
                Ok(status.code())
            })?;
            self.lua.globals().set(CHANGE_BACKGROUND_FN, change_background)?;

            let execute_command = scope.create_function_mut(|_, args: Variadic<String>| {
                let args: Vec<String> = args.into_iter().collect();
                let status = match args.first() {
                    Some(first) => {
                        let kind = classify(first);
                        engine.borrow_mut().dispatch(kind, args)
                    }
                    // 空调用无从归类，按未知命令返回
                    None => Status::UnknownCommand,
                };
                Ok(status.code())
            })?;
            self.lua.globals().set(EXECUTE_COMMAND_FN, execute_command)?;

            self.lua.load(chunk).exec()
        })
    }
}

impl Default for LuaBridge {
    fn default() -> Self {
        Self::new()
    }
}
