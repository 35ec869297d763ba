//! # Backend 模块
//!
//! 执行器消费的协作方接口：画面（[`Stage`]）与声音（[`Mixer`]）。
//!
//! ## 设计原则
//!
//! - 执行器先把名称解析成索引，接口只接**索引**，不接名称
//! - 接口方法都是即发即忘的效果触发；时序（计时等待）由引擎自己持有，
//!   接口上不存在阻塞调用
//! - 具体实现不在本 crate 范围内：宿主提供真实现，测试提供记录桩

use crate::command::Transition;

/// 压暗层固定不透明度（0–255）
pub const DARKEN_OVERLAY_OPACITY: u8 = 100;

/// 画面协作方
pub trait Stage {
    /// 排队一次背景切换，使用给定的过渡效果
    fn queue_background_change(&mut self, slot: usize, transition: Transition);

    /// 触发淡入黑屏效果
    fn fade_to_black(&mut self);

    /// 上场一名角色立绘
    ///
    /// # 参数
    /// - `character`/`outfit`/`emotion`: 名册索引
    /// - `x_pos`: 舞台横向位置
    /// - `brutal`: 瞬时上场，跳过渐入
    fn add_character(&mut self, character: usize, outfit: usize, emotion: usize, x_pos: i32, brutal: bool);

    /// 清除所有角色立绘，`brutal` 为瞬时清除
    fn clear_characters(&mut self, brutal: bool);

    /// 开关压暗层（不透明度固定为 [`DARKEN_OVERLAY_OPACITY`]）
    fn set_darken_overlay(&mut self, darkened: bool);
}

/// 声音协作方
pub trait Mixer {
    /// 切换背景音乐到指定曲目
    fn change_track(&mut self, track: usize);

    /// 停止背景音乐
    fn stop_music(&mut self);

    /// 播放一次性音效，`force` 表示打断同名音效重新播放
    fn play_sting(&mut self, sting: usize, force: bool);

    /// 循环播放音效
    fn play_looped_sting(&mut self, sting: usize);

    /// 停止所有循环音效
    fn stop_looped_stings(&mut self);
}

/// 空画面实现：吞掉所有效果
///
/// 用于无头运行与不关心画面效果的测试。
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStage;

impl Stage for NullStage {
    fn queue_background_change(&mut self, _slot: usize, _transition: Transition) {}
    fn fade_to_black(&mut self) {}
    fn add_character(&mut self, _character: usize, _outfit: usize, _emotion: usize, _x_pos: i32, _brutal: bool) {}
    fn clear_characters(&mut self, _brutal: bool) {}
    fn set_darken_overlay(&mut self, _darkened: bool) {}
}

/// 空声音实现：吞掉所有效果
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMixer;

impl Mixer for NullMixer {
    fn change_track(&mut self, _track: usize) {}
    fn stop_music(&mut self) {}
    fn play_sting(&mut self, _sting: usize, _force: bool) {}
    fn play_looped_sting(&mut self, _sting: usize) {}
    fn stop_looped_stings(&mut self) {}
}
