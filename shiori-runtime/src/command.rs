//! # Command 模块
//!
//! 定义脚本行的操作码（[`LineType`]）、一次派发的命令值（[`Command`]）、
//! 执行状态码（[`Status`]）以及背景过渡效果表（[`Transition`]）。
//!
//! ## 设计原则
//!
//! - **封闭枚举**：操作码集合是封闭的，每个非空非注释行必须归入其中一员，
//!   否则按对白回退规则处理（见 `script::classify`）
//! - **表驱动**：每个操作码声明自己的最小参数数，由执行器统一校验
//! - **状态码非异常**：执行路径一律返回 [`Status`]，不走错误类型

use serde::{Deserialize, Serialize};

/// 脚本行操作码
///
/// 关键字与操作码一一对应（见 [`LineType::from_keyword`]）；
/// `Speech`/`Narrative`/`Comment` 三员没有关键字，由回退规则产生。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineType {
    /// 切换背景（使用当前激活的过渡效果）
    NewBackground,
    /// 淡入黑屏
    FadeToBlack,
    /// 淡入黑屏并挂起脚本一段固定时长
    FadeToBlackFancy,
    /// 切换背景音乐
    NewMusic,
    /// 停止背景音乐
    StopMusic,
    /// 播放一次性音效
    PlaySting,
    /// 循环播放音效
    PlayStingLooped,
    /// 停止所有循环音效
    StopStingLooped,
    /// 叠加固定不透明度的压暗层
    DarkScreen,
    /// 移除压暗层
    BrightScreen,
    /// 跳转到指定行（0 起）
    Goto,
    /// 上场角色立绘（渐入）
    DrawCharacter,
    /// 上场角色立绘（瞬时，无过渡）
    DrawCharacterBrutal,
    /// 清除所有角色立绘（渐出）
    ClearCharacters,
    /// 清除所有角色立绘（瞬时）
    ClearCharactersBrutal,
    /// 载入新脚本，替换当前脚本
    LoadScript,
    /// 角色对白（`说话人: 文本`）
    Speech,
    /// 旁白
    Narrative,
    /// 注释/空行，无操作
    Comment,
    /// 挂起脚本指定毫秒数
    Wait,
    /// 请求退出游戏
    ExitGame,
    /// 请求返回主菜单
    ExitToMainMenu,
    /// 切换激活的过渡效果
    SetActiveTransition,
}

impl LineType {
    /// 按关键字精确匹配操作码（大小写敏感）
    ///
    /// 返回 `None` 表示该 token 不是保留关键字，
    /// 应继续走注释/对白回退规则。
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "NEW_BACKGROUND" => Some(Self::NewBackground),
            "FADE_TO_BLACK" => Some(Self::FadeToBlack),
            "FADE_TO_BLACK_FANCY" => Some(Self::FadeToBlackFancy),
            "NEW_MUSIC" => Some(Self::NewMusic),
            "STOP_MUSIC" => Some(Self::StopMusic),
            "PLAY_STING" => Some(Self::PlaySting),
            "PLAY_STING_LOOPED" => Some(Self::PlayStingLooped),
            "STOP_STING_LOOPED" => Some(Self::StopStingLooped),
            "DARK_SCREEN" => Some(Self::DarkScreen),
            "BRIGHT_SCREEN" => Some(Self::BrightScreen),
            "GOTO" => Some(Self::Goto),
            "DRAW_CHARACTER" => Some(Self::DrawCharacter),
            "DRAW_CHARACTER_BRUTAL" => Some(Self::DrawCharacterBrutal),
            "CLEAR_CHARACTERS" => Some(Self::ClearCharacters),
            "CLEAR_CHARACTERS_BRUTAL" => Some(Self::ClearCharactersBrutal),
            "LOAD_SCRIPT" => Some(Self::LoadScript),
            "WAIT" => Some(Self::Wait),
            "EXITGAME" => Some(Self::ExitGame),
            "EXITTOMAINMENU" => Some(Self::ExitToMainMenu),
            "SET_ACTIVE_TRANSITION" => Some(Self::SetActiveTransition),
            _ => None,
        }
    }

    /// 操作码对应的脚本关键字（回退产生的操作码没有关键字）
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::NewBackground => Some("NEW_BACKGROUND"),
            Self::FadeToBlack => Some("FADE_TO_BLACK"),
            Self::FadeToBlackFancy => Some("FADE_TO_BLACK_FANCY"),
            Self::NewMusic => Some("NEW_MUSIC"),
            Self::StopMusic => Some("STOP_MUSIC"),
            Self::PlaySting => Some("PLAY_STING"),
            Self::PlayStingLooped => Some("PLAY_STING_LOOPED"),
            Self::StopStingLooped => Some("STOP_STING_LOOPED"),
            Self::DarkScreen => Some("DARK_SCREEN"),
            Self::BrightScreen => Some("BRIGHT_SCREEN"),
            Self::Goto => Some("GOTO"),
            Self::DrawCharacter => Some("DRAW_CHARACTER"),
            Self::DrawCharacterBrutal => Some("DRAW_CHARACTER_BRUTAL"),
            Self::ClearCharacters => Some("CLEAR_CHARACTERS"),
            Self::ClearCharactersBrutal => Some("CLEAR_CHARACTERS_BRUTAL"),
            Self::LoadScript => Some("LOAD_SCRIPT"),
            Self::Wait => Some("WAIT"),
            Self::ExitGame => Some("EXITGAME"),
            Self::ExitToMainMenu => Some("EXITTOMAINMENU"),
            Self::SetActiveTransition => Some("SET_ACTIVE_TRANSITION"),
            Self::Speech | Self::Narrative | Self::Comment => None,
        }
    }

    /// 最小参数数（含首 token 本身）
    ///
    /// 参数向量包含关键字 token，因此 `NEW_BACKGROUND park` 的参数数是 2。
    /// 执行器在派发前统一用此表做参数数校验。
    pub fn min_args(self) -> usize {
        match self {
            Self::NewBackground
            | Self::NewMusic
            | Self::PlaySting
            | Self::PlayStingLooped
            | Self::Goto
            | Self::LoadScript
            | Self::Wait
            | Self::SetActiveTransition => 2,
            Self::DrawCharacter | Self::DrawCharacterBrutal => 5,
            Self::FadeToBlack
            | Self::FadeToBlackFancy
            | Self::StopMusic
            | Self::StopStingLooped
            | Self::DarkScreen
            | Self::BrightScreen
            | Self::ClearCharacters
            | Self::ClearCharactersBrutal
            | Self::ExitGame
            | Self::ExitToMainMenu
            | Self::Speech
            | Self::Narrative => 1,
            Self::Comment => 0,
        }
    }
}

/// 一次派发的命令值
///
/// 每次派发都重新构造，从不持久化。两个前端（原生脚本行与 Lua 桥）
/// 都以此形状进入执行器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// 操作码
    pub kind: LineType,
    /// 参数 token 向量（含首 token）
    pub args: Vec<String>,
    /// 来源行号（0 起），用于日志定位
    pub line: usize,
}

impl Command {
    /// 构造命令
    pub fn new(kind: LineType, args: Vec<String>, line: usize) -> Self {
        Self { kind, args, line }
    }

    /// 取第 `index` 个参数
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// 执行状态码
///
/// 跨 Lua 边界时以整数返回（`code()`），含义固定：
/// OK=0，UnknownCommand=1，BadArgumentCount=2，BadArgumentValue=3。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// 执行成功
    Ok = 0,
    /// 无法归类的命令（例如空参数列表），按注释处理
    UnknownCommand = 1,
    /// 参数数不足，命令被跳过
    BadArgumentCount = 2,
    /// 参数值非法（名称查不到、数字解析失败等），命令被跳过
    BadArgumentValue = 3,
}

impl Status {
    /// 是否执行成功
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// 整数状态码（Lua 边界用）
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// 背景过渡效果（固定表）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// 向右扫过
    SwipeRight,
    /// 向下扫过
    SwipeDown,
    /// 向左扫过
    SwipeLeft,
    /// 淡入
    FadeIn,
}

impl Transition {
    /// 过渡效果名称表，与 [`Transition::from_name`] 一一对应
    pub const NAMES: [&'static str; 4] = ["swipe_right", "swipe_down", "swipe_left", "fade_in"];

    /// 按名称精确匹配过渡效果（大小写敏感）
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "swipe_right" => Some(Self::SwipeRight),
            "swipe_down" => Some(Self::SwipeDown),
            "swipe_left" => Some(Self::SwipeLeft),
            "fade_in" => Some(Self::FadeIn),
            _ => None,
        }
    }

    /// 过渡效果的名称
    pub fn name(self) -> &'static str {
        match self {
            Self::SwipeRight => "swipe_right",
            Self::SwipeDown => "swipe_down",
            Self::SwipeLeft => "swipe_left",
            Self::FadeIn => "fade_in",
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::FadeIn
    }
}
