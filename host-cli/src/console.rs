//! 控制台协作方：把呈现效果落成 tracing 事件。
//!
//! 对白不在这里打印。对白由主循环从引擎状态读取并写到标准输出，
//! 这里只承接"效果"类调用（背景、立绘、音频）。

use shiori_runtime::{DARKEN_OVERLAY_OPACITY, Mixer, Stage, Transition};

/// 控制台画面
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleStage;

impl Stage for ConsoleStage {
    fn queue_background_change(&mut self, slot: usize, transition: Transition) {
        tracing::info!(slot, transition = transition.name(), "背景切换");
    }

    fn fade_to_black(&mut self) {
        tracing::info!("淡入黑屏");
    }

    fn add_character(
        &mut self,
        character: usize,
        outfit: usize,
        emotion: usize,
        x_pos: i32,
        brutal: bool,
    ) {
        tracing::info!(character, outfit, emotion, x_pos, brutal, "角色上场");
    }

    fn clear_characters(&mut self, brutal: bool) {
        tracing::info!(brutal, "清除立绘");
    }

    fn set_darken_overlay(&mut self, darkened: bool) {
        tracing::info!(darkened, opacity = DARKEN_OVERLAY_OPACITY, "压暗层开关");
    }
}

/// 控制台声音
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMixer;

impl Mixer for ConsoleMixer {
    fn change_track(&mut self, track: usize) {
        tracing::info!(track, "切换音乐");
    }

    fn stop_music(&mut self) {
        tracing::info!("停止音乐");
    }

    fn play_sting(&mut self, sting: usize, force: bool) {
        tracing::info!(sting, force, "播放音效");
    }

    fn play_looped_sting(&mut self, sting: usize) {
        tracing::info!(sting, "循环音效");
    }

    fn stop_looped_stings(&mut self) {
        tracing::info!("停止循环音效");
    }
}
