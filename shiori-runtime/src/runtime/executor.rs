//! # Executor 模块
//!
//! 命令执行器：接收一条已归类的命令，完成参数校验、名册解析，
//! 并驱动上下文与呈现后端产生效果。
//!
//! ## 设计原则
//!
//! - 执行器本身无状态，所有可变数据都在 [`Context`] 里
//! - 操作码到处理函数的映射是一张静态表，最小参数数由
//!   [`LineType::min_args`] 声明，参数不足在进表之前统一拦截
//! - 状态码（[`Status`]）表达脚本内容的问题，不是宿主错误；
//!   任何一条打错的脚本行都不会让执行器返回 `Err`
//!
//! ## 游标约定
//!
//! - 普通命令执行后游标前进一行，参数有误时同样前进（整行按
//!   惰性行跳过），确保脚本不会卡死在坏行上
//! - `GOTO` / `LOAD_SCRIPT` 成功时自己改写游标，不再前进
//! - 台词与旁白保持游标停在当前行，等待玩家放行
//! - 退出命令不动游标，当帧停止执行

use std::time::Duration;

use crate::backend::{Mixer, Stage};
use crate::catalog::NARRATOR_INDEX;
use crate::command::{Command, LineType, Status, Transition};
use crate::script::{FIELD_DELIMITER, speaker_name};
use crate::state::{DialogueLine, ExitRequest, Waiting};

use super::context::Context;

/// 华丽淡出后的黑屏停留时长
pub const FANCY_FADE_HOLD: Duration = Duration::from_millis(600);

/// 处理函数签名：参数数量已由执行器校验过
type Handler = fn(&Command, &mut Context, &mut dyn Stage, &mut dyn Mixer) -> Status;

/// 命令执行器
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    /// 执行一条命令，返回状态码
    ///
    /// 参数不足时直接返回 [`Status::BadArgumentCount`] 并把该行
    /// 按惰性行跳过，处理函数不会被调用。非 OK 状态在此统一记录
    /// 日志，调用方无需重复上报。
    pub fn execute(
        &self,
        command: &Command,
        ctx: &mut Context,
        stage: &mut dyn Stage,
        mixer: &mut dyn Mixer,
    ) -> Status {
        let status = if command.args.len() < command.kind.min_args() {
            ctx.store.advance();
            Status::BadArgumentCount
        } else {
            handler_of(command.kind)(command, ctx, stage, mixer)
        };

        if !status.is_ok() {
            tracing::warn!(
                script = %ctx.store.name(),
                line = command.line,
                opcode = ?command.kind,
                status = ?status,
                raw = %join_fields(&command.args),
                "脚本命令未正常执行"
            );
        }
        status
    }
}

/// 操作码到处理函数的映射，对 [`LineType`] 全覆盖
fn handler_of(kind: LineType) -> Handler {
    match kind {
        LineType::NewBackground => new_background,
        LineType::FadeToBlack => fade_to_black,
        LineType::FadeToBlackFancy => fade_to_black_fancy,
        LineType::NewMusic => new_music,
        LineType::StopMusic => stop_music,
        LineType::PlaySting => play_sting,
        LineType::PlayStingLooped => play_sting_looped,
        LineType::StopStingLooped => stop_sting_looped,
        LineType::DarkScreen => dark_screen,
        LineType::BrightScreen => bright_screen,
        LineType::Goto => goto,
        LineType::DrawCharacter => draw_character,
        LineType::DrawCharacterBrutal => draw_character_brutal,
        LineType::ClearCharacters => clear_characters,
        LineType::ClearCharactersBrutal => clear_characters_brutal,
        LineType::LoadScript => load_script,
        LineType::Wait => wait,
        LineType::ExitGame => exit_game,
        LineType::ExitToMainMenu => exit_to_main_menu,
        LineType::SetActiveTransition => set_active_transition,
        LineType::Speech => speech,
        LineType::Narrative => narrative,
        LineType::Comment => comment,
    }
}

/// 参数值有误：整行按惰性行跳过
fn skip_bad_value(ctx: &mut Context) -> Status {
    ctx.store.advance();
    Status::BadArgumentValue
}

/// 用字段分隔符把字段拼回整行文本
fn join_fields(fields: &[String]) -> String {
    fields.join(&FIELD_DELIMITER.to_string())
}

fn new_background(
    cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let Some(slot) = ctx.catalog.background_index(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    stage.queue_background_change(slot, ctx.state.active_transition);
    ctx.state.current_background = Some(slot);
    ctx.store.advance();
    Status::Ok
}

fn fade_to_black(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.fade_to_black();
    ctx.store.advance();
    Status::Ok
}

/// 华丽版淡出：淡出之后停留一段固定时长再继续
fn fade_to_black_fancy(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.fade_to_black();
    ctx.store.advance();
    ctx.state.wait(Waiting::timer(FANCY_FADE_HOLD));
    Status::Ok
}

fn new_music(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    mixer: &mut dyn Mixer,
) -> Status {
    let Some(track) = ctx.catalog.music_index(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    mixer.change_track(track);
    ctx.store.advance();
    Status::Ok
}

fn stop_music(
    _cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    mixer: &mut dyn Mixer,
) -> Status {
    mixer.stop_music();
    ctx.store.advance();
    Status::Ok
}

fn play_sting(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    mixer: &mut dyn Mixer,
) -> Status {
    let Some(sting) = ctx.catalog.sting_index(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    mixer.play_sting(sting, true);
    ctx.store.advance();
    Status::Ok
}

fn play_sting_looped(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    mixer: &mut dyn Mixer,
) -> Status {
    let Some(sting) = ctx.catalog.sting_index(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    mixer.play_looped_sting(sting);
    ctx.store.advance();
    Status::Ok
}

fn stop_sting_looped(
    _cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    mixer: &mut dyn Mixer,
) -> Status {
    mixer.stop_looped_stings();
    ctx.store.advance();
    Status::Ok
}

fn dark_screen(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.set_darken_overlay(true);
    ctx.state.darkened = true;
    ctx.store.advance();
    Status::Ok
}

fn bright_screen(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.set_darken_overlay(false);
    ctx.state.darkened = false;
    ctx.store.advance();
    Status::Ok
}

/// 无条件跳转：目标是否越界在下一次取行时才暴露
fn goto(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let Ok(target) = cmd.args[1].parse::<usize>() else {
        return skip_bad_value(ctx);
    };
    ctx.store.jump(target);
    Status::Ok
}

fn draw_character(
    cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    draw_character_inner(cmd, ctx, stage, false)
}

fn draw_character_brutal(
    cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    draw_character_inner(cmd, ctx, stage, true)
}

/// 角色、服装、表情逐级解析，任何一级查不到都不上场
fn draw_character_inner(
    cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    brutal: bool,
) -> Status {
    let Some(character) = ctx.catalog.character_index(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    let Some(outfit) = ctx.catalog.outfit_index(character, &cmd.args[2]) else {
        return skip_bad_value(ctx);
    };
    let Some(emotion) = ctx.catalog.emotion_index(character, &cmd.args[3]) else {
        return skip_bad_value(ctx);
    };
    let Ok(x_pos) = cmd.args[4].parse::<i32>() else {
        return skip_bad_value(ctx);
    };
    stage.add_character(character, outfit, emotion, x_pos, brutal);
    ctx.store.advance();
    Status::Ok
}

fn clear_characters(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.clear_characters(false);
    ctx.store.advance();
    Status::Ok
}

fn clear_characters_brutal(
    _cmd: &Command,
    ctx: &mut Context,
    stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    stage.clear_characters(true);
    ctx.store.advance();
    Status::Ok
}

/// 链式载入：成功则整体替换脚本并把游标放到起始行，
/// 失败保留当前脚本照常前进
fn load_script(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let start = match cmd.arg(2) {
        Some(token) => match token.parse::<usize>() {
            Ok(index) => index,
            Err(_) => return skip_bad_value(ctx),
        },
        None => 0,
    };
    let name = cmd.args[1].clone();
    let Context { store, source, .. } = ctx;
    match store.load(source.as_ref(), &name, start) {
        Ok(()) => Status::Ok,
        Err(error) => {
            tracing::warn!(
                script = %name,
                path = %source.describe(&name),
                error = %error,
                "脚本载入失败，保留当前脚本"
            );
            skip_bad_value(ctx)
        }
    }
}

fn wait(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let Ok(millis) = cmd.args[1].parse::<u64>() else {
        return skip_bad_value(ctx);
    };
    ctx.store.advance();
    ctx.state.wait(Waiting::timer(Duration::from_millis(millis)));
    Status::Ok
}

fn exit_game(
    _cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    ctx.state.request_exit(ExitRequest::Game);
    Status::Ok
}

fn exit_to_main_menu(
    _cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    ctx.state.request_exit(ExitRequest::MainMenu);
    Status::Ok
}

/// 切换激活过渡效果，重复设置同一效果不算错
fn set_active_transition(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let Some(transition) = Transition::from_name(&cmd.args[1]) else {
        return skip_bad_value(ctx);
    };
    ctx.state.active_transition = transition;
    ctx.store.advance();
    Status::Ok
}

/// 台词：首字段冒号前是说话人，其余字段拼回正文。
/// 说话人查不到按旁白处理，正文照常显示。
fn speech(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let mark = &cmd.args[0];
    let speaker = match speaker_name(mark) {
        Some(name) => ctx.catalog.speaker_index(name),
        None => NARRATOR_INDEX,
    };
    let name = if speaker == NARRATOR_INDEX {
        None
    } else {
        Some(ctx.catalog.characters[speaker].name.clone())
    };
    let text = join_fields(&cmd.args[1..]);
    present_dialogue(ctx, speaker, name, text);
    Status::Ok
}

/// 旁白：整行原样作为正文，归属旁白位
fn narrative(
    cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    let text = join_fields(&cmd.args);
    present_dialogue(ctx, NARRATOR_INDEX, None, text);
    Status::Ok
}

/// 展示一条对白并保持游标停在当前行，等待放行
fn present_dialogue(ctx: &mut Context, speaker: usize, name: Option<String>, text: String) {
    ctx.state.active_speaker = speaker;
    ctx.state.dialogue = Some(DialogueLine {
        speaker,
        name,
        text,
    });
    ctx.state.wait(Waiting::dialogue());
}

fn comment(
    _cmd: &Command,
    ctx: &mut Context,
    _stage: &mut dyn Stage,
    _mixer: &mut dyn Mixer,
) -> Status {
    ctx.store.advance();
    Status::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::probe::{RecordingMixer, RecordingStage};
    use crate::catalog::{Catalog, CharacterDef};
    use crate::command::Transition;
    use crate::script::{classify, split_line};
    use crate::source::MemorySource;

    fn test_catalog() -> Catalog {
        Catalog {
            characters: vec![
                CharacterDef::named("旁白"),
                CharacterDef {
                    name: "Yuuji".to_owned(),
                    outfits: vec!["school".to_owned(), "casual".to_owned()],
                    emotions: vec!["normal".to_owned(), "smile".to_owned()],
                },
            ],
            backgrounds: vec!["park".to_owned(), "classroom".to_owned()],
            music: vec!["morning".to_owned(), "dusk".to_owned()],
            stings: vec!["door".to_owned(), "rain".to_owned()],
        }
    }

    fn test_context(lines: &[&str]) -> Context {
        let mut ctx = Context::new(test_catalog(), Box::new(MemorySource::new()));
        let lines: Vec<String> = lines.iter().map(|line| (*line).to_owned()).collect();
        ctx.store.replace("test", lines, 0);
        ctx
    }

    /// 按引擎的方式走一遍：分词、归类、执行
    fn exec_line(
        ctx: &mut Context,
        stage: &mut RecordingStage,
        mixer: &mut RecordingMixer,
        line: &str,
    ) -> Status {
        let tokens = split_line(line, FIELD_DELIMITER);
        let kind = classify(&tokens[0]);
        let command = Command::new(kind, tokens, ctx.store.cursor());
        Executor::new().execute(&command, ctx, stage, mixer)
    }

    #[test]
    fn test_new_background_uses_active_transition() {
        let mut ctx = test_context(&["a", "b", "c"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "NEW_BACKGROUND park");
        assert_eq!(status, Status::Ok);
        assert_eq!(stage.backgrounds, vec![(0, Transition::FadeIn)]);
        assert_eq!(ctx.state.current_background, Some(0));
        assert_eq!(ctx.store.cursor(), 1);

        exec_line(&mut ctx, &mut stage, &mut mixer, "SET_ACTIVE_TRANSITION swipe_left");
        exec_line(&mut ctx, &mut stage, &mut mixer, "NEW_BACKGROUND classroom");
        assert_eq!(stage.backgrounds[1], (1, Transition::SwipeLeft));
    }

    #[test]
    fn test_unknown_background_is_bad_value() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "NEW_BACKGROUND beach");
        assert_eq!(status, Status::BadArgumentValue);
        assert!(stage.backgrounds.is_empty());
        assert_eq!(ctx.state.current_background, None);
        // 坏行照常跳过
        assert_eq!(ctx.store.cursor(), 1);
    }

    #[test]
    fn test_missing_argument_is_bad_count() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "NEW_MUSIC");
        assert_eq!(status, Status::BadArgumentCount);
        assert_eq!(mixer.track, None);
        assert_eq!(ctx.store.cursor(), 1);
    }

    #[test]
    fn test_new_music_switches_track() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        assert_eq!(
            exec_line(&mut ctx, &mut stage, &mut mixer, "NEW_MUSIC dusk"),
            Status::Ok
        );
        assert_eq!(mixer.track, Some(1));
    }

    #[test]
    fn test_stop_music() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "STOP_MUSIC");
        assert_eq!(mixer.music_stops, 1);
    }

    #[test]
    fn test_stings_force_restart_and_loop() {
        let mut ctx = test_context(&["a", "b", "c"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "PLAY_STING door");
        exec_line(&mut ctx, &mut stage, &mut mixer, "PLAY_STING_LOOPED rain");
        exec_line(&mut ctx, &mut stage, &mut mixer, "STOP_STING_LOOPED");

        assert_eq!(mixer.stings, vec![(0, true)]);
        assert_eq!(mixer.looped_stings, vec![1]);
        assert_eq!(mixer.looped_stops, 1);
    }

    #[test]
    fn test_unknown_sting_is_bad_value() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "PLAY_STING thunder");
        assert_eq!(status, Status::BadArgumentValue);
        assert!(mixer.stings.is_empty());
    }

    #[test]
    fn test_set_active_transition_is_idempotent() {
        let mut ctx = test_context(&["a", "b", "c"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let first = exec_line(&mut ctx, &mut stage, &mut mixer, "SET_ACTIVE_TRANSITION swipe_down");
        let second = exec_line(&mut ctx, &mut stage, &mut mixer, "SET_ACTIVE_TRANSITION swipe_down");
        assert_eq!(first, Status::Ok);
        assert_eq!(second, Status::Ok);
        assert_eq!(ctx.state.active_transition, Transition::SwipeDown);
    }

    #[test]
    fn test_unknown_transition_keeps_previous() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "SET_ACTIVE_TRANSITION swipe_right");
        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "SET_ACTIVE_TRANSITION spiral");
        assert_eq!(status, Status::BadArgumentValue);
        assert_eq!(ctx.state.active_transition, Transition::SwipeRight);
    }

    #[test]
    fn test_goto_rewrites_cursor_without_advance() {
        let mut ctx = test_context(&["a", "b", "c", "d", "e"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "GOTO 3");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.store.cursor(), 3);
    }

    #[test]
    fn test_malformed_goto_is_inert() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "GOTO chapter2");
        assert_eq!(status, Status::BadArgumentValue);
        // 跳转没有发生，游标按坏行前进一格
        assert_eq!(ctx.store.cursor(), 1);
    }

    #[test]
    fn test_draw_character_resolves_all_levels() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(
            &mut ctx,
            &mut stage,
            &mut mixer,
            "DRAW_CHARACTER Yuuji school smile -2",
        );
        assert_eq!(status, Status::Ok);
        assert_eq!(stage.characters, vec![(1, 0, 1, -2, false)]);

        exec_line(
            &mut ctx,
            &mut stage,
            &mut mixer,
            "DRAW_CHARACTER_BRUTAL Yuuji casual normal 0",
        );
        assert_eq!(stage.characters[1], (1, 1, 0, 0, true));
    }

    #[test]
    fn test_unknown_character_adds_nothing() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(
            &mut ctx,
            &mut stage,
            &mut mixer,
            "DRAW_CHARACTER Stranger school smile 0",
        );
        assert_eq!(status, Status::BadArgumentValue);
        assert!(stage.characters.is_empty());
        assert_eq!(ctx.store.cursor(), 1);
    }

    #[test]
    fn test_bad_x_position_adds_nothing() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(
            &mut ctx,
            &mut stage,
            &mut mixer,
            "DRAW_CHARACTER Yuuji school smile middle",
        );
        assert_eq!(status, Status::BadArgumentValue);
        assert!(stage.characters.is_empty());
    }

    #[test]
    fn test_clear_characters_variants() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "CLEAR_CHARACTERS");
        exec_line(&mut ctx, &mut stage, &mut mixer, "CLEAR_CHARACTERS_BRUTAL");
        assert_eq!(stage.clears, vec![false, true]);
    }

    #[test]
    fn test_darken_and_brighten_overlay() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "DARK_SCREEN");
        assert!(ctx.state.darkened);
        exec_line(&mut ctx, &mut stage, &mut mixer, "BRIGHT_SCREEN");
        assert!(!ctx.state.darkened);
        assert_eq!(stage.darken_calls, vec![true, false]);
    }

    #[test]
    fn test_fade_to_black_fancy_holds_after_fade() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "FADE_TO_BLACK");
        assert_eq!(ctx.state.waiting, Waiting::None);

        exec_line(&mut ctx, &mut stage, &mut mixer, "FADE_TO_BLACK_FANCY");
        assert_eq!(stage.fades, 2);
        assert_eq!(ctx.state.waiting, Waiting::timer(FANCY_FADE_HOLD));
        assert_eq!(ctx.store.cursor(), 2);
    }

    #[test]
    fn test_wait_installs_timer_and_advances() {
        let mut ctx = test_context(&["a", "b"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "WAIT 1500");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.store.cursor(), 1);
        assert_eq!(
            ctx.state.waiting,
            Waiting::timer(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_wait_rejects_non_numeric_duration() {
        let mut ctx = test_context(&["a"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "WAIT soon");
        assert_eq!(status, Status::BadArgumentValue);
        assert_eq!(ctx.state.waiting, Waiting::None);
    }

    #[test]
    fn test_speech_holds_cursor_on_line() {
        let mut ctx = test_context(&["Yuuji: Hi there."]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "Yuuji: Hi there.");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.store.cursor(), 0);
        assert_eq!(ctx.state.waiting, Waiting::Dialogue);
        assert_eq!(ctx.state.active_speaker, 1);

        let dialogue = ctx.state.dialogue.as_ref().unwrap();
        assert_eq!(dialogue.name.as_deref(), Some("Yuuji"));
        assert_eq!(dialogue.text, "Hi there.");
    }

    #[test]
    fn test_unknown_speaker_falls_back_to_narrator() {
        let mut ctx = test_context(&["Stranger: who?"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "Stranger: who?");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.state.active_speaker, NARRATOR_INDEX);
        let dialogue = ctx.state.dialogue.as_ref().unwrap();
        assert_eq!(dialogue.name, None);
        assert_eq!(dialogue.text, "who?");
    }

    #[test]
    fn test_narrative_keeps_whole_line() {
        let mut ctx = test_context(&["雨停了。 风也停了。"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "雨停了。 风也停了。");
        assert_eq!(status, Status::Ok);
        let dialogue = ctx.state.dialogue.as_ref().unwrap();
        assert_eq!(dialogue.speaker, NARRATOR_INDEX);
        assert_eq!(dialogue.text, "雨停了。 风也停了。");
        assert_eq!(ctx.store.cursor(), 0);
    }

    #[test]
    fn test_load_script_swaps_and_resumes() {
        let source = MemorySource::new()
            .with("chapter2", "// 第二章\nYuuji: again");
        let mut ctx = Context::new(test_catalog(), Box::new(source));
        ctx.store.replace("start", vec!["LOAD_SCRIPT chapter2 1".to_owned()], 0);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "LOAD_SCRIPT chapter2 1");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.store.name(), "chapter2");
        assert_eq!(ctx.store.cursor(), 1);
        assert_eq!(ctx.store.current_line().unwrap(), "Yuuji: again");
    }

    #[test]
    fn test_load_script_failure_keeps_current() {
        let mut ctx = test_context(&["LOAD_SCRIPT nowhere", "next"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "LOAD_SCRIPT nowhere");
        assert_eq!(status, Status::BadArgumentValue);
        assert_eq!(ctx.store.name(), "test");
        assert_eq!(ctx.store.cursor(), 1);
    }

    #[test]
    fn test_load_script_rejects_bad_start_index() {
        let source = MemorySource::new().with("chapter2", "a\nb");
        let mut ctx = Context::new(test_catalog(), Box::new(source));
        ctx.store.replace("start", vec!["x".to_owned(), "y".to_owned()], 0);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "LOAD_SCRIPT chapter2 later");
        assert_eq!(status, Status::BadArgumentValue);
        assert_eq!(ctx.store.name(), "start");
    }

    #[test]
    fn test_exit_commands_do_not_advance() {
        let mut ctx = test_context(&["EXITGAME", "never"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        let status = exec_line(&mut ctx, &mut stage, &mut mixer, "EXITGAME");
        assert_eq!(status, Status::Ok);
        assert_eq!(ctx.state.exit, Some(ExitRequest::Game));
        assert_eq!(ctx.store.cursor(), 0);
    }

    #[test]
    fn test_first_exit_request_wins() {
        let mut ctx = test_context(&["EXITTOMAINMENU", "EXITGAME"]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        exec_line(&mut ctx, &mut stage, &mut mixer, "EXITTOMAINMENU");
        exec_line(&mut ctx, &mut stage, &mut mixer, "EXITGAME");
        assert_eq!(ctx.state.exit, Some(ExitRequest::MainMenu));
    }

    #[test]
    fn test_comment_line_advances_silently() {
        let mut ctx = test_context(&["// 注释", "-- 注释", ""]);
        let mut stage = RecordingStage::default();
        let mut mixer = RecordingMixer::default();

        assert_eq!(exec_line(&mut ctx, &mut stage, &mut mixer, "// 注释"), Status::Ok);
        assert_eq!(exec_line(&mut ctx, &mut stage, &mut mixer, "-- 注释"), Status::Ok);
        assert_eq!(exec_line(&mut ctx, &mut stage, &mut mixer, ""), Status::Ok);
        assert_eq!(ctx.store.cursor(), 3);
        assert_eq!(ctx.state.waiting, Waiting::None);
    }
}
