// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/output/record_gamepad.rs - 记录手柄状态到文件
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

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::gamepad::{GamepadButton, GamepadState, VirtualGamepad},
};

#[derive(Error, Debug)]
pub enum RecordGamepadError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct RecordLine<'a> {
  sequence: u64,
  #[serde(flatten)]
  state: &'a GamepadState,
}

/// 每次 `update` 写入一行 JSON，记录提交到手柄的状态
pub struct RecordGamepad {
  writer: BufWriter<File>,
  pending: GamepadState,
  sequence: u64,
}

impl FromUrlWithScheme for RecordGamepad {
  const SCHEME: &'static str = "record";
}

impl FromUrl for RecordGamepad {
  type Error = RecordGamepadError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(RecordGamepadError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }
    Self::create(url.path())
  }
}

impl RecordGamepad {
  pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordGamepadError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }
    let file = File::create(path)?;
    info!("记录手柄状态到文件: {}", path.display());

    Ok(RecordGamepad {
      writer: BufWriter::new(file),
      pending: GamepadState::default(),
      sequence: 0,
    })
  }
}

impl VirtualGamepad for RecordGamepad {
  type Error = RecordGamepadError;

  fn press_button(&mut self, button: GamepadButton) -> Result<(), Self::Error> {
    self.pending.set_button(button, true);
    Ok(())
  }

  fn release_button(&mut self, button: GamepadButton) -> Result<(), Self::Error> {
    self.pending.set_button(button, false);
    Ok(())
  }

  fn left_joystick(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
    self.pending.set_joystick(x, y);
    Ok(())
  }

  fn update(&mut self) -> Result<(), Self::Error> {
    let line = RecordLine {
      sequence: self.sequence,
      state: &self.pending,
    };
    serde_json::to_writer(&mut self.writer, &line)?;
    self.writer.write_all(b"\n")?;
    self.writer.flush()?;
    self.sequence += 1;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn writes_one_line_per_update() {
    let path = std::env::temp_dir().join(format!(
      "shoushi-record-{}/gamepad.jsonl",
      std::process::id()
    ));
    let mut url = Url::parse("record:///").unwrap();
    url.set_path(path.to_str().unwrap());

    let mut gamepad = RecordGamepad::from_url(&url).unwrap();
    gamepad.press_button(GamepadButton::Accelerate).unwrap();
    gamepad.left_joystick(0.5, 0.0).unwrap();
    gamepad.update().unwrap();
    gamepad.release_button(GamepadButton::Accelerate).unwrap();
    gamepad.update().unwrap();
    drop(gamepad);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content
      .lines()
      .map(|line| serde_json::from_str(line).unwrap())
      .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["sequence"], 0);
    assert_eq!(lines[0]["accelerate"], true);
    assert_eq!(lines[0]["joystick_x"], 0.5);
    assert_eq!(lines[1]["sequence"], 1);
    assert_eq!(lines[1]["accelerate"], false);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
  }
}
