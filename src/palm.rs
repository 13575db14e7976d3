// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/palm.rs - 手掌开合去抖状态机
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

use std::fmt;

use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PalmState {
  Open,
  #[default]
  Closed,
}

impl PalmState {
  pub fn is_open(self) -> bool {
    self == PalmState::Open
  }
}

impl fmt::Display for PalmState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PalmState::Open => write!(f, "open"),
      PalmState::Closed => write!(f, "closed"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
  Left,
  Right,
}

impl fmt::Display for HandSide {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HandSide::Left => write!(f, "left"),
      HandSide::Right => write!(f, "right"),
    }
  }
}

/// 单只手的去抖状态。
///
/// 只有连续超过 `threshold` 帧相同的原始判定才会提交状态切换，
/// 提交后两个计数器归零。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalmDebouncer {
  state: PalmState,
  frames_opened: u32,
  frames_closed: u32,
  threshold: u32,
}

impl PalmDebouncer {
  pub fn new(threshold: u32) -> Self {
    Self {
      state: PalmState::default(),
      frames_opened: 0,
      frames_closed: 0,
      threshold,
    }
  }

  pub fn state(&self) -> PalmState {
    self.state
  }

  pub fn frames_opened(&self) -> u32 {
    self.frames_opened
  }

  pub fn frames_closed(&self) -> u32 {
    self.frames_closed
  }

  pub fn threshold(&self) -> u32 {
    self.threshold
  }

  /// 输入本帧的原始判定，返回提交后的状态。
  ///
  /// 计数达到阈值时即使新状态与旧状态相同也会归零计数器。
  pub fn update(&mut self, raw_open: bool) -> PalmState {
    if raw_open {
      self.frames_opened = self.frames_opened.saturating_add(1);
      self.frames_closed = 0;
    } else {
      self.frames_closed = self.frames_closed.saturating_add(1);
      self.frames_opened = 0;
    }

    if self.frames_opened > self.threshold || self.frames_closed > self.threshold {
      self.state = if self.frames_opened > self.frames_closed {
        PalmState::Open
      } else {
        PalmState::Closed
      };
      self.frames_opened = 0;
      self.frames_closed = 0;
    }

    self.state
  }
}

/// 左右两只手各自独立去抖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalmTracker {
  left: PalmDebouncer,
  right: PalmDebouncer,
}

impl PalmTracker {
  pub fn new(threshold: u32) -> Self {
    Self {
      left: PalmDebouncer::new(threshold),
      right: PalmDebouncer::new(threshold),
    }
  }

  pub fn side(&self, side: HandSide) -> &PalmDebouncer {
    match side {
      HandSide::Left => &self.left,
      HandSide::Right => &self.right,
    }
  }

  pub fn left(&self) -> PalmState {
    self.left.state()
  }

  pub fn right(&self) -> PalmState {
    self.right.state()
  }

  /// 每帧调用一次，返回 (左, 右) 的提交状态
  pub fn update(&mut self, left_open: bool, right_open: bool) -> (PalmState, PalmState) {
    let left = Self::update_side(&mut self.left, HandSide::Left, left_open);
    let right = Self::update_side(&mut self.right, HandSide::Right, right_open);
    (left, right)
  }

  fn update_side(debouncer: &mut PalmDebouncer, side: HandSide, raw_open: bool) -> PalmState {
    let before = debouncer.state();
    let after = debouncer.update(raw_open);
    if before != after {
      info!("{} 手掌状态切换: {} -> {}", side, before, after);
    }
    after
  }
}
