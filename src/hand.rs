// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/hand.rs - 单帧手部模型
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
use tracing::warn;

/// 本系统最多同时跟踪两只手
pub const MAX_HANDS: usize = 2;

/// 归一化的二维关键点，坐标相对于图像宽高，范围 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
  pub x: f32,
  pub y: f32,
}

impl LandmarkPoint {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  pub fn distance_to(&self, other: &LandmarkPoint) -> f64 {
    let dx = self.x as f64 - other.x as f64;
    let dy = self.y as f64 - other.y as f64;
    (dx * dx + dy * dy).sqrt()
  }
}

/// 一只手的关键点序列。
///
/// 顺序有语义：下标 0 为手腕，最后一个点作为尺度参考的指尖附近点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
  points: Box<[LandmarkPoint]>,
}

impl HandLandmarks {
  pub fn new(points: impl Into<Box<[LandmarkPoint]>>) -> Self {
    Self {
      points: points.into(),
    }
  }

  pub fn points(&self) -> &[LandmarkPoint] {
    &self.points
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn wrist(&self) -> Option<&LandmarkPoint> {
    self.points.first()
  }

  pub fn reference_tip(&self) -> Option<&LandmarkPoint> {
    self.points.last()
  }

  // 未加权算术平均
  fn mean(&self) -> Option<(f64, f64)> {
    if self.points.is_empty() {
      return None;
    }
    let count = self.points.len() as f64;
    let (sum_x, sum_y) = self
      .points
      .iter()
      .fold((0.0f64, 0.0f64), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    Some((sum_x / count, sum_y / count))
  }
}

impl From<Vec<LandmarkPoint>> for HandLandmarks {
  fn from(points: Vec<LandmarkPoint>) -> Self {
    Self::new(points)
  }
}

impl FromIterator<(f32, f32)> for HandLandmarks {
  fn from_iter<T: IntoIterator<Item = (f32, f32)>>(iter: T) -> Self {
    iter
      .into_iter()
      .map(|(x, y)| LandmarkPoint::new(x, y))
      .collect::<Vec<_>>()
      .into()
  }
}

/// 像素坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
  pub x: i32,
  pub y: i32,
}

impl PixelPoint {
  pub fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// 单只手在当前帧的摘要：像素质心以及它自己的关键点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSummary<'a> {
  pub centroid: PixelPoint,
  pub landmarks: &'a HandLandmarks,
}

impl<'a> HandSummary<'a> {
  fn summarize(landmarks: &'a HandLandmarks, width: u32, height: u32) -> Option<Self> {
    let (mean_x, mean_y) = landmarks.mean()?;
    // 截断为整数像素
    let centroid = PixelPoint::new(
      (mean_x * width as f64) as i32,
      (mean_y * height as f64) as i32,
    );
    Some(Self {
      centroid,
      landmarks,
    })
  }
}

/// 规范化后的手部组合。
///
/// 两只手时下标 0 为屏幕上 x 较小的一只，满足
/// `pair[0].centroid.x <= pair[1].centroid.x`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CanonicalHandPair<'a> {
  #[default]
  Empty,
  Single(HandSummary<'a>),
  Pair([HandSummary<'a>; 2]),
}

impl<'a> CanonicalHandPair<'a> {
  /// 由当前帧的检测结果构建，不保留任何跨帧状态
  pub fn from_detections(hands: &'a [HandLandmarks], width: u32, height: u32) -> Self {
    let mut summaries = hands.iter().filter_map(|hand| {
      let summary = HandSummary::summarize(hand, width, height);
      if summary.is_none() {
        warn!("忽略没有关键点的手");
      }
      summary
    });

    let first = summaries.next();
    let second = summaries.next();
    let extra = summaries.count();
    if extra > 0 {
      warn!(
        "检测到 {} 只有效的手，仅使用前 {} 只",
        MAX_HANDS + extra,
        MAX_HANDS
      );
    }

    match (first, second) {
      (None, _) => CanonicalHandPair::Empty,
      (Some(first), None) => CanonicalHandPair::Single(first),
      (Some(first), Some(second)) => CanonicalHandPair::Pair(Self::order(first, second)),
    }
  }

  // 质心与关键点作为整体交换，同一只手的数据不会被拆开
  fn order(first: HandSummary<'a>, second: HandSummary<'a>) -> [HandSummary<'a>; 2] {
    if first.centroid.x > second.centroid.x {
      [second, first]
    } else {
      [first, second]
    }
  }

  pub fn hands(&self) -> &[HandSummary<'a>] {
    match self {
      CanonicalHandPair::Empty => &[],
      CanonicalHandPair::Single(hand) => std::slice::from_ref(hand),
      CanonicalHandPair::Pair(hands) => hands,
    }
  }

  pub fn len(&self) -> usize {
    self.hands().len()
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, CanonicalHandPair::Empty)
  }

  pub fn pair(&self) -> Option<&[HandSummary<'a>; 2]> {
    match self {
      CanonicalHandPair::Pair(hands) => Some(hands),
      _ => None,
    }
  }

  pub fn centroids(&self) -> Option<[PixelPoint; 2]> {
    self
      .pair()
      .map(|[first, second]| [first.centroid, second.centroid])
  }
}
