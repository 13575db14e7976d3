// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/engine.rs - 手势引擎
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
use tracing::debug;

use crate::{
  config::GestureConfig,
  hand::{CanonicalHandPair, HandLandmarks, HandSummary, PixelPoint},
  metrics,
  palm::{PalmState, PalmTracker},
};

/// 单帧的手势信号
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureSignals {
  pub hand_count: usize,
  /// 规范顺序下两只手的质心，不足两只手时为 `None`
  pub centroids: Option<[PixelPoint; 2]>,
  pub distance: f64,
  pub angle: f64,
  pub left_palm: PalmState,
  pub right_palm: PalmState,
}

/// 持有全部跨帧状态（手掌去抖计数），每个实例互不干扰。
#[derive(Debug, Clone)]
pub struct GestureEngine {
  config: GestureConfig,
  palms: PalmTracker,
}

impl GestureEngine {
  pub fn new(config: GestureConfig) -> Self {
    let palms = PalmTracker::new(config.min_frame_to_switch_state);
    Self { config, palms }
  }

  pub fn config(&self) -> &GestureConfig {
    &self.config
  }

  pub fn palms(&self) -> &PalmTracker {
    &self.palms
  }

  /// 处理一帧检测结果，每帧恰好调用一次
  pub fn process(&mut self, hands: &[HandLandmarks], width: u32, height: u32) -> GestureSignals {
    let pair = CanonicalHandPair::from_detections(hands, width, height);

    let distance = metrics::distance(&pair);
    let angle = metrics::angle(&pair);
    let (left_open, right_open) = self.raw_openness(&pair);
    let (left_palm, right_palm) = self.palms.update(left_open, right_open);

    debug!(
      "手数: {}, 距离: {:.2}, 角度: {:.2}, 原始张开: ({}, {}), 手掌: ({}, {})",
      pair.len(),
      distance,
      angle,
      left_open,
      right_open,
      left_palm,
      right_palm
    );

    GestureSignals {
      hand_count: pair.len(),
      centroids: pair.centroids(),
      distance,
      angle,
      left_palm,
      right_palm,
    }
  }

  // 只有两只手都在时才判断开合，否则两侧都按未张开计数
  fn raw_openness(&self, pair: &CanonicalHandPair) -> (bool, bool) {
    let Some([first, second]) = pair.pair() else {
      return (false, false);
    };

    let ceiling = self.config.openness_ratio_ceiling;
    let is_open = |hand: &HandSummary| {
      metrics::is_open_ratio(metrics::openness_ratio(hand.landmarks), ceiling)
    };

    if self.config.mirrored_camera {
      // 原始摄像头画面中用户的左手位于右侧
      (is_open(second), is_open(first))
    } else {
      (is_open(first), is_open(second))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // 手腕在 (x, y)，其余点沿 x 方向展开，张开比例约为 1.5
  fn open_hand(x: f32, y: f32) -> HandLandmarks {
    [(x, y), (x + 0.05, y), (x + 0.1, y)].into_iter().collect()
  }

  // 参考跨度为 0，判定为未张开
  fn closed_hand(x: f32, y: f32) -> HandLandmarks {
    [(x, y), (x + 0.05, y), (x, y)].into_iter().collect()
  }

  #[test]
  fn mirrored_camera_maps_left_palm_to_screen_right() {
    let mut engine = GestureEngine::new(GestureConfig::default());
    let hands = [closed_hand(0.1, 0.5), open_hand(0.7, 0.5)];
    let mut signals = engine.process(&hands, 640, 480);
    for _ in 0..5 {
      signals = engine.process(&hands, 640, 480);
    }
    assert_eq!(signals.left_palm, PalmState::Open);
    assert_eq!(signals.right_palm, PalmState::Closed);
  }

  #[test]
  fn unmirrored_camera_maps_left_palm_to_screen_left() {
    let config = GestureConfig {
      mirrored_camera: false,
      ..Default::default()
    };
    let mut engine = GestureEngine::new(config);
    let hands = [closed_hand(0.1, 0.5), open_hand(0.7, 0.5)];
    let mut signals = engine.process(&hands, 640, 480);
    for _ in 0..5 {
      signals = engine.process(&hands, 640, 480);
    }
    assert_eq!(signals.left_palm, PalmState::Closed);
    assert_eq!(signals.right_palm, PalmState::Open);
  }

  #[test]
  fn engines_do_not_share_state() {
    let hands = [open_hand(0.1, 0.5), open_hand(0.7, 0.5)];
    let mut busy = GestureEngine::new(GestureConfig::default());
    let idle = GestureEngine::new(GestureConfig::default());
    for _ in 0..6 {
      busy.process(&hands, 640, 480);
    }
    assert_eq!(busy.palms().left(), PalmState::Open);
    assert_eq!(idle.palms().left(), PalmState::Closed);
  }

  #[test]
  fn reports_canonical_centroids() {
    let mut engine = GestureEngine::new(GestureConfig::default());
    let hands = [open_hand(0.5, 0.5), open_hand(0.0, 0.5)];
    let signals = engine.process(&hands, 1000, 1000);
    let [first, second] = signals.centroids.unwrap();
    assert!(first.x <= second.x);
    assert_eq!(signals.hand_count, 2);
  }
}
