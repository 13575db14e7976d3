// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/control.rs - 手势到手柄控制量的映射
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

use serde::Serialize;
use tracing::info;

use crate::{config::GestureConfig, engine::GestureSignals};

/// 单帧的手柄控制量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControlOutput {
  /// 归一化油门 [0, 1]
  pub throttle: f64,
  pub accelerate: bool,
  /// 摇杆 x 轴 [-1, 1]
  pub steering: f64,
  /// 动作键当前是否按住
  pub action_pressed: bool,
  /// 本帧是否刚刚触发动作（上升沿）
  pub action_fired: bool,
}

#[derive(Debug, Clone)]
pub struct ControlMapper {
  config: GestureConfig,
  frames_palm_opened: u32,
  action_used: bool,
}

impl ControlMapper {
  pub fn new(config: GestureConfig) -> Self {
    Self {
      config,
      frames_palm_opened: 0,
      action_used: false,
    }
  }

  pub fn map(&mut self, signals: &GestureSignals, frame_width: u32) -> ControlOutput {
    let throttle = self.throttle(signals.distance, frame_width);
    let action_fired = self.update_action(signals.left_palm.is_open());

    ControlOutput {
      throttle,
      accelerate: throttle > self.config.throttle_deadband,
      steering: self.steering(signals.angle),
      action_pressed: self.action_used,
      action_fired,
    }
  }

  /// 距离按 (图像宽度 - 边距) 归一化并限制在 [0, 1]。
  ///
  /// 宽度不大于边距时归一化跨度非正，油门为 0。
  pub fn throttle(&self, distance: f64, frame_width: u32) -> f64 {
    if frame_width <= self.config.throttle_margin_px {
      return 0.0;
    }
    let span = frame_width - self.config.throttle_margin_px;
    (distance / span as f64).clamp(0.0, 1.0)
  }

  pub fn steering(&self, angle: f64) -> f64 {
    let limit = self.config.angle_clamp_degrees;
    angle.clamp(-limit, limit) / limit
  }

  // 左手持续张开超过阈值后只触发一次，直到手掌重新合上才解除锁定
  fn update_action(&mut self, left_open: bool) -> bool {
    if !left_open {
      self.frames_palm_opened = 0;
      self.action_used = false;
      return false;
    }

    self.frames_palm_opened = self.frames_palm_opened.saturating_add(1);
    if self.frames_palm_opened > self.config.action_trigger_frames && !self.action_used {
      self.action_used = true;
      info!("触发动作键 (左手张开 {} 帧)", self.frames_palm_opened);
      return true;
    }
    false
  }
}
