//! Recorded landmark streams.
//!
//! One plist per line:
//!
//! ```text
//! ; comment
//! (:t 0 :landmarks ((0.5 0.9) (0.42 0.85) ...))   ; 21 normalized points
//! (:t 33)                                          ; no hand
//! (:t 66 :command :skip-step)                      ; also :restart, :stop
//! (:t 99 :command :start :template "letter:a")
//! ```

use std::path::Path;

use lexpr::Value;
use tracing::{debug, info, warn};

use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::practice::catalog::{parse_reference, TemplateKind};
use crate::sexp::{as_f64, get_float, get_keyword, get_string, get_value, list_items};

/// Control command embedded in a replay.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayCommand {
    Start { kind: TemplateKind, key: String },
    SkipStep,
    Restart,
    Stop,
}

/// What happened at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayInput {
    /// Raw detector output.  Sets that are not exactly 21 points are
    /// treated as no hand when replayed.
    Hand(Vec<(f64, f64)>),
    NoHand,
    Command(ReplayCommand),
}

/// One timestamped replay entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub t_ms: f64,
    pub input: ReplayInput,
}

/// Parse one line.  Blank lines and comments yield `None`.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ReplayFrame>> {
    parse_line_at(line, line_no, None)
}

/// Parse one line, using `now_ms` when the line carries no `:t`.
pub fn parse_line_at(line: &str, line_no: usize, now_ms: Option<f64>) -> Result<Option<ReplayFrame>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') {
        return Ok(None);
    }
    let parse_err = |reason: String| Error::Parse {
        line: line_no,
        reason,
    };

    let value = lexpr::from_str(trimmed).map_err(|e| parse_err(format!("malformed s-expression: {e}")))?;
    let t_ms = match get_value(&value, "t") {
        Some(_) => get_float(&value, "t")
            .filter(|t| t.is_finite())
            .ok_or_else(|| parse_err(":t must be a finite number".to_string()))?,
        None => now_ms.ok_or_else(|| parse_err("missing numeric :t".to_string()))?,
    };

    let input = if let Some(command) = get_keyword(&value, "command") {
        ReplayInput::Command(parse_command(&value, &command).map_err(parse_err)?)
    } else if let Some(points) = get_value(&value, "landmarks") {
        ReplayInput::Hand(parse_points(points).map_err(parse_err)?)
    } else {
        ReplayInput::NoHand
    };
    Ok(Some(ReplayFrame { t_ms, input }))
}

fn parse_command(value: &Value, command: &str) -> std::result::Result<ReplayCommand, String> {
    match command {
        "skip-step" => Ok(ReplayCommand::SkipStep),
        "restart" => Ok(ReplayCommand::Restart),
        "stop" => Ok(ReplayCommand::Stop),
        "start" => {
            let reference = get_string(value, "template")
                .ok_or_else(|| ":start needs :template \"kind:key\"".to_string())?;
            let (kind, key) = parse_reference(&reference)
                .ok_or_else(|| format!("bad template reference {reference:?}"))?;
            Ok(ReplayCommand::Start { kind, key })
        }
        other => Err(format!("unknown command :{other}")),
    }
}

fn parse_points(value: &Value) -> std::result::Result<Vec<(f64, f64)>, String> {
    list_items(value)
        .into_iter()
        .enumerate()
        .map(|(i, item)| match list_items(item).as_slice() {
            [x, y] => match (as_f64(x), as_f64(y)) {
                (Some(x), Some(y)) => Ok((x, y)),
                _ => Err(format!("landmark {i} is not numeric")),
            },
            _ => Err(format!("landmark {i} is not an (x y) pair")),
        })
        .collect()
}

/// Parse a whole replay, in file order.
pub fn parse_replay(text: &str) -> Result<Vec<ReplayFrame>> {
    let mut frames = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(frame) = parse_line(line, i + 1)? {
            frames.push(frame);
        }
    }
    Ok(frames)
}

pub fn load(path: &Path) -> Result<Vec<ReplayFrame>> {
    let text = std::fs::read_to_string(path)?;
    let frames = parse_replay(&text)?;
    info!("Loaded {} replay entries from {}", frames.len(), path.display());
    Ok(frames)
}

/// Apply one replay entry, returning the resulting events.
///
/// A failed `:start` is logged and otherwise ignored so a replay keeps
/// going with the previous session.
pub fn apply(controller: &mut Controller, frame: &ReplayFrame) -> Vec<Event> {
    match &frame.input {
        ReplayInput::Hand(points) => controller.process_landmarks(Some(points.as_slice()), frame.t_ms),
        ReplayInput::NoHand => controller.process_landmarks(None, frame.t_ms),
        ReplayInput::Command(command) => {
            debug!("Replay command at {:.0} ms: {:?}", frame.t_ms, command);
            match command {
                ReplayCommand::Start { kind, key } => {
                    if let Err(e) = controller.start_template(*kind, key) {
                        warn!("Replay start failed: {}", e);
                    }
                    Vec::new()
                }
                ReplayCommand::SkipStep => controller.skip_step(),
                ReplayCommand::Restart => {
                    controller.restart_template();
                    Vec::new()
                }
                ReplayCommand::Stop => {
                    controller.stop_template();
                    Vec::new()
                }
            }
        }
    }
}

/// Outcome of one line of live input.
#[derive(Debug)]
pub struct LiveStep {
    /// Timestamp the line was applied at; `None` for blank lines and comments.
    pub t_ms: Option<f64>,
    pub events: Vec<Event>,
    /// Set when the line failed to parse.
    pub error: Option<Error>,
}

/// Parse and apply one line of live input.
///
/// A line that fails to parse still counts as a frame at `now_ms` with no
/// hand, so an active stroke ends instead of bridging the bad frame.
pub fn apply_live_line(controller: &mut Controller, line: &str, line_no: usize, now_ms: f64) -> LiveStep {
    match parse_line_at(line, line_no, Some(now_ms)) {
        Ok(Some(frame)) => LiveStep {
            t_ms: Some(frame.t_ms),
            events: apply(controller, &frame),
            error: None,
        },
        Ok(None) => LiveStep {
            t_ms: None,
            events: Vec::new(),
            error: None,
        },
        Err(e) => {
            warn!("{}", e);
            LiveStep {
                t_ms: Some(now_ms),
                events: controller.process_landmarks(None, now_ms),
                error: Some(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SketchConfig;
    use crate::hand::features::test_pointing_hand;
    use crate::hand::CanvasSize;

    fn hand_line(t: f64) -> String {
        let pairs: Vec<String> = test_pointing_hand()
            .points()
            .iter()
            .map(|p| format!("({} {})", p.x, p.y))
            .collect();
        format!("(:t {} :landmarks ({}))", t, pairs.join(" "))
    }

    #[test]
    fn test_skip_blank_and_comments() {
        assert_eq!(parse_line("", 1).expect("ok"), None);
        assert_eq!(parse_line("   ; recorded 2024", 2).expect("ok"), None);
    }

    #[test]
    fn test_no_hand_line() {
        let frame = parse_line("(:t 33.5)", 1).expect("ok").expect("frame");
        assert_eq!(frame.t_ms, 33.5);
        assert_eq!(frame.input, ReplayInput::NoHand);
    }

    #[test]
    fn test_landmark_line() {
        let frame = parse_line(&hand_line(0.0), 1).expect("ok").expect("frame");
        match frame.input {
            ReplayInput::Hand(points) => {
                assert_eq!(points.len(), 21);
                assert_eq!(points[8], (0.44, 0.40));
            }
            other => panic!("expected hand, got {:?}", other),
        }
    }

    #[test]
    fn test_live_clock_fallback() {
        let frame = parse_line_at("(:command :stop)", 1, Some(1234.0)).expect("ok").expect("frame");
        assert_eq!(frame.t_ms, 1234.0);
        let frame = parse_line_at("(:t 5)", 1, Some(1234.0)).expect("ok").expect("frame");
        assert_eq!(frame.t_ms, 5.0);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        assert!(matches!(parse_line("(:t nan)", 3), Err(Error::Parse { line: 3, .. })));
        assert!(matches!(parse_line("(:t inf :command :stop)", 4), Err(Error::Parse { line: 4, .. })));
        // A present but bad :t does not fall back to the live clock.
        assert!(parse_line_at("(:t nan)", 1, Some(50.0)).is_err());
        assert!(parse_replay(&format!("{}\n(:t nan)\n", hand_line(0.0))).is_err());
    }

    #[test]
    fn test_live_bad_line_ends_stroke() {
        let mut controller = Controller::new(SketchConfig::default(), CanvasSize::new(1000.0, 1000.0));
        let step = apply_live_line(&mut controller, &hand_line(0.0), 1, 0.0);
        assert_eq!(step.events, vec![Event::BeginStroke { x: 560.0, y: 400.0 }]);
        assert!(step.error.is_none());

        let step = apply_live_line(&mut controller, "(:t 33 :landmarks ((1 x)))", 2, 33.0);
        assert!(matches!(step.error, Some(Error::Parse { line: 2, .. })));
        assert_eq!(step.t_ms, Some(33.0));
        assert_eq!(step.events, vec![Event::EndStroke]);
        assert!(!controller.gesture().is_drawing());

        let step = apply_live_line(&mut controller, "; note", 3, 40.0);
        assert_eq!(step.t_ms, None);
        assert!(step.events.is_empty());
    }

    #[test]
    fn test_commands() {
        let cmd = |s: &str| parse_line(s, 1).expect("ok").expect("frame").input;
        assert_eq!(cmd("(:t 1 :command :skip-step)"), ReplayInput::Command(ReplayCommand::SkipStep));
        assert_eq!(cmd("(:t 1 :command :restart)"), ReplayInput::Command(ReplayCommand::Restart));
        assert_eq!(cmd("(:t 1 :command :stop)"), ReplayInput::Command(ReplayCommand::Stop));
        assert_eq!(
            cmd("(:t 1 :command :start :template \"sketch:cat\")"),
            ReplayInput::Command(ReplayCommand::Start {
                kind: TemplateKind::Sketch,
                key: "cat".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_replay("(:t 0)\n\n(:landmarks ())").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        assert!(matches!(parse_line("(:t 0 :command :dance)", 4), Err(Error::Parse { line: 4, .. })));
        assert!(matches!(parse_line("(:t 0 :landmarks ((1 x)))", 5), Err(Error::Parse { line: 5, .. })));
        assert!(matches!(parse_line("(:t 0 :landmarks (1 2))", 6), Err(Error::Parse { .. })));
        assert!(matches!(parse_line("(:t", 7), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_apply_drives_controller() {
        let text = format!(
            "(:t 0 :command :start :template \"letter:i\")\n{}\n(:t 33)\n(:t 66 :command :skip-step)\n",
            hand_line(10.0)
        );
        let frames = parse_replay(&text).expect("valid replay");
        let mut controller = Controller::new(SketchConfig::default(), CanvasSize::new(1000.0, 1000.0));
        let events: Vec<Event> = frames.iter().flat_map(|f| apply(&mut controller, f)).collect();
        assert_eq!(
            events,
            vec![
                Event::BeginStroke { x: 560.0, y: 400.0 },
                Event::EndStroke,
                Event::StepCompleted { step: 0, total: 3 },
            ]
        );
    }

    #[test]
    fn test_demo_replay_traces_stem_then_skips_bar() {
        let frames = parse_replay(include_str!("../demos/trace_letter_l.sexp")).expect("demo parses");
        let mut controller = Controller::new(SketchConfig::default(), CanvasSize::new(1280.0, 720.0));
        let (last, drawn) = frames.split_last().expect("demo has frames");
        assert_eq!(last.input, ReplayInput::Command(ReplayCommand::SkipStep));

        let events: Vec<Event> = drawn.iter().flat_map(|f| apply(&mut controller, f)).collect();
        assert_eq!(events.iter().filter(|e| matches!(e, Event::SpawnEffect { .. })).count(), 1);
        assert!(events.contains(&Event::AdvanceColor { index: 1 }));
        assert!(events.contains(&Event::StepCompleted { step: 0, total: 2 }));
        assert!(!events.contains(&Event::TemplateCompleted));

        assert_eq!(
            apply(&mut controller, last),
            vec![Event::StepCompleted { step: 1, total: 2 }, Event::TemplateCompleted]
        );
    }

    #[test]
    fn test_short_landmark_set_is_no_hand() {
        let frame = parse_line("(:t 0 :landmarks ((0.1 0.2) (0.3 0.4)))", 1)
            .expect("ok")
            .expect("frame");
        let mut controller = Controller::new(SketchConfig::default(), CanvasSize::default());
        assert!(apply(&mut controller, &frame).is_empty());
    }
}
