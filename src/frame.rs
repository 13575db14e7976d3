// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/frame.rs - 帧定义
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

use serde::{Deserialize, Serialize};

use crate::hand::HandLandmarks;

pub trait FrameMeta {
  fn index(&self) -> u64;
  fn width(&self) -> u32;
  fn height(&self) -> u32;
}

/// 录制的一帧：图像尺寸以及当时检测到的手部关键点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
  #[serde(default)]
  pub index: u64,
  pub width: u32,
  pub height: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timestamp_ms: Option<u64>,
  #[serde(default)]
  pub hands: Vec<HandLandmarks>,
}

impl FrameMeta for RecordedFrame {
  fn index(&self) -> u64 {
    self.index
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_record() {
    let frame: RecordedFrame = serde_json::from_str(r#"{"width":640,"height":480}"#).unwrap();
    assert_eq!(frame.width(), 640);
    assert_eq!(frame.height(), 480);
    assert_eq!(frame.timestamp_ms, None);
    assert!(frame.hands.is_empty());
  }

  #[test]
  fn parses_hands() {
    let frame: RecordedFrame = serde_json::from_str(
      r#"{"width":640,"height":480,"timestamp_ms":33,
          "hands":[[{"x":0.1,"y":0.2},{"x":0.2,"y":0.3}],[{"x":0.7,"y":0.2}]]}"#,
    )
    .unwrap();
    assert_eq!(frame.timestamp_ms, Some(33));
    assert_eq!(frame.hands.len(), 2);
    assert_eq!(frame.hands[0].len(), 2);
  }
}
