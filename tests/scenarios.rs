// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// tests/scenarios.rs - 端到端手势场景
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::io::Write;

use shoushi::{
  FromUrl,
  config::GestureConfig,
  control::ControlMapper,
  engine::GestureEngine,
  hand::{HandLandmarks, PixelPoint},
  input::InputWrapper,
  model::ReplayLandmarks,
  output::OutputList,
  palm::{HandSide, PalmState},
  task::{ContinuousTask, GesturePipeline, Task},
};
use url::Url;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

// 所有关键点重合：质心确定，张开比例无定义（视为合拢）
fn closed_hand(x: u32, y: u32) -> HandLandmarks {
  let point = (x as f32 / WIDTH as f32, y as f32 / HEIGHT as f32);
  std::iter::repeat_n(point, 21).collect()
}

// 关键点沿水平方向排开，张开比例为 1.5
fn open_hand(x: u32, y: u32) -> HandLandmarks {
  let cx = x as f32 / WIDTH as f32;
  let cy = y as f32 / HEIGHT as f32;
  [(cx - 0.05, cy), (cx, cy), (cx + 0.05, cy)]
    .into_iter()
    .collect()
}

#[test]
fn horizontal_hands_300px_apart() {
  let mut engine = GestureEngine::new(GestureConfig::default());
  let hands = [closed_hand(400, 300), closed_hand(100, 300)];
  let signals = engine.process(&hands, WIDTH, HEIGHT);

  assert_eq!(signals.hand_count, 2);
  assert_eq!(
    signals.centroids,
    Some([PixelPoint::new(100, 300), PixelPoint::new(400, 300)])
  );
  assert!((signals.distance - 300.0).abs() < 1e-9);
  assert!(signals.angle.abs() < 1e-9);
}

#[test]
fn single_hand_keeps_committed_palm_state() {
  let mut engine = GestureEngine::new(GestureConfig::default());
  let both_open = [open_hand(150, 240), open_hand(450, 240)];
  for _ in 0..6 {
    engine.process(&both_open, WIDTH, HEIGHT);
  }
  assert_eq!(engine.palms().left(), PalmState::Open);
  assert_eq!(engine.palms().right(), PalmState::Open);

  let signals = engine.process(&[open_hand(150, 240)], WIDTH, HEIGHT);
  assert_eq!(signals.hand_count, 1);
  assert_eq!(signals.centroids, None);
  assert_eq!(signals.distance, 0.0);
  assert_eq!(signals.angle, 0.0);
  assert_eq!(signals.left_palm, PalmState::Open);
  assert_eq!(signals.right_palm, PalmState::Open);
  assert_eq!(engine.palms().side(HandSide::Left).frames_closed(), 1);
}

#[test]
fn left_palm_commits_on_sixth_open_frame() {
  let mut engine = GestureEngine::new(GestureConfig::default());
  // 未镜像画面中用户的左手在右侧
  let hands = [closed_hand(150, 240), open_hand(450, 240)];

  for frame in 1..=5 {
    let signals = engine.process(&hands, WIDTH, HEIGHT);
    assert_eq!(signals.left_palm, PalmState::Closed, "frame {frame}");
  }
  assert_eq!(engine.palms().side(HandSide::Left).frames_opened(), 5);

  let signals = engine.process(&hands, WIDTH, HEIGHT);
  assert_eq!(signals.left_palm, PalmState::Open);
  assert_eq!(signals.right_palm, PalmState::Closed);
  let left = engine.palms().side(HandSide::Left);
  assert_eq!(left.frames_opened(), 0);
  assert_eq!(left.frames_closed(), 0);
}

#[test]
fn alternating_palm_never_commits() {
  let mut engine = GestureEngine::new(GestureConfig::default());
  let open = [closed_hand(150, 240), open_hand(450, 240)];
  let closed = [closed_hand(150, 240), closed_hand(450, 240)];

  for frame in 0..40 {
    let hands = if frame % 2 == 0 { &open } else { &closed };
    let signals = engine.process(hands, WIDTH, HEIGHT);
    assert_eq!(signals.left_palm, PalmState::Closed);
  }
}

#[test]
fn held_open_palm_fires_action_once() {
  let config = GestureConfig::default();
  let mut engine = GestureEngine::new(config.clone());
  let mut mapper = ControlMapper::new(config);
  let open = [closed_hand(150, 240), open_hand(450, 240)];
  let closed = [closed_hand(150, 240), closed_hand(450, 240)];

  let mut fired = Vec::new();
  for _ in 0..40 {
    let signals = engine.process(&open, WIDTH, HEIGHT);
    let control = mapper.map(&signals, WIDTH);
    assert!(control.accelerate);
    assert!(control.steering.abs() < 1e-9);
    fired.push(control.action_fired);
  }
  assert_eq!(fired.iter().filter(|f| **f).count(), 1);

  // 手掌合上后锁定解除
  for _ in 0..6 {
    let signals = engine.process(&closed, WIDTH, HEIGHT);
    let control = mapper.map(&signals, WIDTH);
    assert!(!control.action_fired);
  }
  assert_eq!(engine.palms().left(), PalmState::Closed);
  let signals = engine.process(&closed, WIDTH, HEIGHT);
  assert!(!mapper.map(&signals, WIDTH).action_pressed);
}

#[test]
fn replay_to_record_pipeline() {
  let dir = std::env::temp_dir().join(format!("shoushi-scenario-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();

  let recording = dir.join("hands.jsonl");
  let mut file = std::fs::File::create(&recording).unwrap();
  for _ in 0..3 {
    let frame = serde_json::json!({
      "width": WIDTH,
      "height": HEIGHT,
      "hands": [closed_hand(100, 300), closed_hand(400, 150)],
    });
    writeln!(file, "{}", frame).unwrap();
  }
  drop(file);

  let mut input_url = Url::parse("replay:///").unwrap();
  input_url.set_path(recording.to_str().unwrap());
  let mut record_url = Url::parse("record:///").unwrap();
  record_url.set_path(dir.join("pad.jsonl").to_str().unwrap());

  let input = InputWrapper::from_url(&input_url).unwrap();
  let model = ReplayLandmarks::from_url(&Url::parse("recorded:").unwrap()).unwrap();
  let output = OutputList::from_urls(&[record_url, Url::parse("log:").unwrap()]).unwrap();
  assert_eq!(output.len(), 2);

  ContinuousTask::default()
    .run_task(input, GesturePipeline::new(model, GestureConfig::default()), output)
    .unwrap();

  let content = std::fs::read_to_string(dir.join("pad.jsonl")).unwrap();
  let lines: Vec<serde_json::Value> = content
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();
  assert_eq!(lines.len(), 3);
  for line in &lines {
    assert_eq!(line["accelerate"], true);
    assert_eq!(line["action"], false);
    // 右手高于左手，方向为正
    assert!(line["joystick_x"].as_f64().unwrap() > 0.0);
  }

  std::fs::remove_dir_all(dir).unwrap();
}
