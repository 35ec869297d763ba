//! # Runtime 模块
//!
//! 执行侧三件套：
//!
//! - [`Context`]：脚本存储、状态、名册、脚本来源的集合体
//! - [`Executor`]：单条命令的表驱动执行器
//! - [`Engine`]：按帧推进的驱动器，宿主唯一需要持有的对象

pub mod context;
pub mod engine;
pub mod executor;

pub use context::Context;
pub use engine::{Engine, Tick};
pub use executor::{Executor, FANCY_FADE_HOLD};
