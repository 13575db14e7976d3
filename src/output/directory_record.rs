// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use chrono::{Datelike, Utc};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{
    Render,
    draw::{Overlay, OverlayError, ToRgbImage},
  },
  task::FrameReport,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("叠加层错误: {0}")]
  OverlayError(#[from] OverlayError),
}

/// 按日期分目录保存每帧的调试画面。
///
/// URL 形如 `folder:///var/log/shoushi?always&record&font=/path/font.ttf`：
/// `always` 时没有检测到手的帧也保存，`record` 时额外写入同名 JSON 报告。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  overlay: Overlay,
  frame_counters: Mutex<u16>,
  always: bool,
  record: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");
    let record = uri.query_pairs().any(|(k, _)| k == "record");

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(uri.path()),
      overlay: Overlay::from_query(uri)?,
      frame_counters: Mutex::new(0),
      always,
      record,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    let mut counter = self
      .frame_counters
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    let id = counter.wrapping_add(1);
    *counter = id;
    id
  }

  fn frame_path(&self) -> Result<PathBuf, std::io::Error> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!(
      "{}-{:04X}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }
}

impl<F: ToRgbImage> Render<F, FrameReport> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &F, result: &FrameReport) -> Result<(), Self::Error> {
    if !self.always && result.signals.hand_count == 0 {
      return Ok(());
    }

    let path = self.frame_path()?;
    self.overlay.draw_report(frame, result).save(&path)?;
    if self.record {
      std::fs::write(path.with_extension("json"), serde_json::to_vec(result)?)?;
    }
    debug!("记录第 {} 帧到 {}", result.index, path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    control::ControlOutput, engine::GestureSignals, frame::RecordedFrame, palm::PalmState,
  };

  fn report(hand_count: usize) -> FrameReport {
    FrameReport {
      index: 7,
      width: 32,
      height: 24,
      signals: GestureSignals {
        hand_count,
        centroids: None,
        distance: 0.0,
        angle: 0.0,
        left_palm: PalmState::Closed,
        right_palm: PalmState::Open,
      },
      control: ControlOutput::default(),
    }
  }

  fn files_under(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
      for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
          files.extend(files_under(&path));
        } else {
          files.push(path);
        }
      }
    }
    files
  }

  #[test]
  fn records_only_frames_with_hands_by_default() {
    let dir = std::env::temp_dir().join(format!("shoushi-folder-{}", std::process::id()));
    let mut url = url::Url::parse("folder:///").unwrap();
    url.set_path(dir.to_str().unwrap());
    url.set_query(Some("record"));
    let output = DirectoryRecordOutput::from_url(&url).unwrap();

    let frame = RecordedFrame {
      index: 7,
      width: 32,
      height: 24,
      timestamp_ms: None,
      hands: Vec::new(),
    };
    output.render_result(&frame, &report(0)).unwrap();
    assert!(files_under(&dir).is_empty());

    output.render_result(&frame, &report(1)).unwrap();
    let files = files_under(&dir);
    assert_eq!(files.len(), 2);
    let json = files
      .iter()
      .find(|path| path.extension().is_some_and(|ext| ext == "json"))
      .unwrap();
    let value: serde_json::Value =
      serde_json::from_slice(&std::fs::read(json).unwrap()).unwrap();
    assert_eq!(value["index"], 7);
    assert_eq!(value["signals"]["right_palm"], "open");

    std::fs::remove_dir_all(&dir).unwrap();
  }
}
