// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/input/replay_file.rs - 关键点录制文件输入
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
  io::{BufRead, BufReader, Lines},
  path::{Path, PathBuf},
  thread,
  time::{Duration, Instant},
};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::RecordedFrame};

#[derive(Error, Debug)]
pub enum ReplayFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Invalid fps value: {0}")]
  InvalidFps(String),
}

/// 按行读取 JSON 格式的录制帧。
///
/// URL 形如 `replay:///path/to/hands.jsonl?loop&fps=30`。
pub struct ReplayFileInput {
  path: PathBuf,
  lines: Lines<BufReader<File>>,
  looping: bool,
  frame_interval: Option<Duration>,
  next_deadline: Option<Instant>,
  line_number: usize,
  frames_in_pass: u64,
  next_index: u64,
}

impl FromUrlWithScheme for ReplayFileInput {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayFileInput {
  type Error = ReplayFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ReplayFileInputError::SchemaMismatch);
    }

    let looping = url.query_pairs().any(|(k, _)| k == "loop");
    let frame_interval = match url.query_pairs().find(|(k, _)| k == "fps") {
      Some((_, v)) => {
        let fps: f64 = v
          .parse()
          .map_err(|_| ReplayFileInputError::InvalidFps(v.to_string()))?;
        if !fps.is_finite() || fps <= 0.0 {
          return Err(ReplayFileInputError::InvalidFps(v.to_string()));
        }
        Some(Duration::from_secs_f64(1.0 / fps))
      }
      None => None,
    };

    let path = PathBuf::from(url.path());
    let lines = Self::open(&path)?;
    info!("打开录制文件: {}", path.display());

    Ok(ReplayFileInput {
      path,
      lines,
      looping,
      frame_interval,
      next_deadline: None,
      line_number: 0,
      frames_in_pass: 0,
      next_index: 0,
    })
  }
}

impl ReplayFileInput {
  fn open(path: &Path) -> Result<Lines<BufReader<File>>, std::io::Error> {
    Ok(BufReader::new(File::open(path)?).lines())
  }

  fn rewind(&mut self) -> Result<(), std::io::Error> {
    self.lines = Self::open(&self.path)?;
    self.line_number = 0;
    self.frames_in_pass = 0;
    Ok(())
  }

  // 按设定帧率节流，模拟摄像头的出帧节奏
  fn pace(&mut self) {
    let Some(interval) = self.frame_interval else {
      return;
    };
    let now = Instant::now();
    if let Some(deadline) = self.next_deadline {
      if deadline > now {
        thread::sleep(deadline - now);
      }
    }
    self.next_deadline = Some(Instant::now() + interval);
  }

  fn read_frame(&mut self) -> Option<RecordedFrame> {
    loop {
      let line = match self.lines.next() {
        Some(Ok(line)) => line,
        Some(Err(e)) => {
          error!("读取录制文件失败 ({}): {}", self.path.display(), e);
          return None;
        }
        None => {
          // 一轮中没有任何有效帧时不再循环，避免空转
          if !self.looping || self.frames_in_pass == 0 {
            return None;
          }
          debug!("录制文件读取完毕，从头开始");
          if let Err(e) = self.rewind() {
            error!("重新打开录制文件失败 ({}): {}", self.path.display(), e);
            return None;
          }
          continue;
        }
      };
      self.line_number += 1;

      let line = line.trim();
      if line.is_empty() {
        continue;
      }

      match serde_json::from_str::<RecordedFrame>(line) {
        Ok(mut frame) => {
          frame.index = self.next_index;
          self.next_index += 1;
          self.frames_in_pass += 1;
          return Some(frame);
        }
        Err(e) => {
          warn!("跳过第 {} 行无效的录制帧: {}", self.line_number, e);
        }
      }
    }
  }
}

impl Iterator for ReplayFileInput {
  type Item = RecordedFrame;

  fn next(&mut self) -> Option<Self::Item> {
    let frame = self.read_frame()?;
    self.pace();
    Some(frame)
  }
}
