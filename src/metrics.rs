// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/metrics.rs - 手势度量
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

use crate::hand::{CanonicalHandPair, HandLandmarks, PixelPoint};

// 竖直参考向量 (0, 1)
const REFERENCE_VECTOR: (f64, f64) = (0.0, 1.0);

/// 两只手质心间的欧氏距离（像素），不足两只手时为 0
pub fn distance(pair: &CanonicalHandPair) -> f64 {
  pair
    .centroids()
    .map(|[first, second]| distance_between(first, second))
    .unwrap_or(0.0)
}

/// 两只手连线相对水平方向的角度（度），不足两只手时为 0
pub fn angle(pair: &CanonicalHandPair) -> f64 {
  pair
    .centroids()
    .map(|[first, second]| angle_between(first, second))
    .unwrap_or(0.0)
}

pub fn distance_between(a: PixelPoint, b: PixelPoint) -> f64 {
  let dx = b.x as f64 - a.x as f64;
  let dy = b.y as f64 - a.y as f64;
  (dx * dx + dy * dy).sqrt()
}

/// 向量 a→b 与竖直参考向量的夹角减去 90°，水平时为 0°。
///
/// 两点重合时返回 0。
pub fn angle_between(a: PixelPoint, b: PixelPoint) -> f64 {
  let dx = b.x as f64 - a.x as f64;
  let dy = b.y as f64 - a.y as f64;

  let magnitude = (dx * dx + dy * dy).sqrt();
  let reference_magnitude =
    (REFERENCE_VECTOR.0 * REFERENCE_VECTOR.0 + REFERENCE_VECTOR.1 * REFERENCE_VECTOR.1).sqrt();
  if magnitude == 0.0 {
    return 0.0;
  }

  let dot = REFERENCE_VECTOR.0 * dx + REFERENCE_VECTOR.1 * dy;
  // 浮点误差可能使余弦略超出 [-1, 1]
  let cosine = (dot / (reference_magnitude * magnitude)).clamp(-1.0, 1.0);
  cosine.acos().to_degrees() - 90.0
}

/// 单只手的张开比例：所有关键点到手腕的距离之和除以手腕到最后一个关键点的距离。
///
/// 关键点少于两个或参考跨度为 0 时无定义，返回 `None`。
pub fn openness_ratio(hand: &HandLandmarks) -> Option<f64> {
  if hand.len() < 2 {
    return None;
  }

  let wrist = hand.wrist()?;
  let span = wrist.distance_to(hand.reference_tip()?);
  if span == 0.0 || !span.is_finite() {
    return None;
  }

  let gap: f64 = hand.points().iter().map(|p| wrist.distance_to(p)).sum();
  Some(gap / span)
}

/// 张开判定，两端都是严格不等式：`0 < ratio < ceiling`
pub fn is_open_ratio(ratio: Option<f64>, ceiling: f64) -> bool {
  matches!(ratio, Some(r) if r > 0.0 && r < ceiling)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hand::LandmarkPoint;

  const EPS: f64 = 1e-9;

  #[test]
  fn distance_is_symmetric_and_zero_on_self() {
    let a = PixelPoint::new(12, -7);
    let b = PixelPoint::new(315, 260);
    assert!((distance_between(a, b) - distance_between(b, a)).abs() < EPS);
    assert_eq!(distance_between(a, a), 0.0);
  }

  #[test]
  fn horizontal_hands() {
    let a = PixelPoint::new(100, 300);
    let b = PixelPoint::new(400, 300);
    assert!((distance_between(a, b) - 300.0).abs() < EPS);
    assert!(angle_between(a, b).abs() < EPS);
  }

  #[test]
  fn vertical_and_diagonal_angles() {
    let origin = PixelPoint::new(0, 0);
    // y 轴向下
    assert!((angle_between(origin, PixelPoint::new(0, 100)) + 90.0).abs() < EPS);
    assert!((angle_between(origin, PixelPoint::new(0, -100)) - 90.0).abs() < EPS);
    assert!((angle_between(origin, PixelPoint::new(100, 100)) + 45.0).abs() < 1e-6);
    assert!((angle_between(origin, PixelPoint::new(100, -100)) - 45.0).abs() < 1e-6);
  }

  #[test]
  fn angle_flips_sign_when_hands_swap() {
    let a = PixelPoint::new(40, 310);
    let b = PixelPoint::new(380, 120);
    assert!((angle_between(a, b) + angle_between(b, a)).abs() < 1e-6);
  }

  #[test]
  fn coincident_points_have_zero_angle() {
    let a = PixelPoint::new(5, 5);
    assert_eq!(angle_between(a, a), 0.0);
  }

  #[test]
  fn metrics_need_two_hands() {
    let pair = CanonicalHandPair::Empty;
    assert_eq!(distance(&pair), 0.0);
    assert_eq!(angle(&pair), 0.0);

    let hand: HandLandmarks = [(0.5, 0.5)].into_iter().collect();
    let hands = [hand];
    let pair = CanonicalHandPair::from_detections(&hands, 640, 480);
    assert_eq!(distance(&pair), 0.0);
    assert_eq!(angle(&pair), 0.0);
  }

  #[test]
  fn openness_ratio_of_known_hand() {
    // 到手腕的距离依次为 0, 0.5, 1.0，参考跨度为 1.0
    let hand: HandLandmarks = [(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)].into_iter().collect();
    let ratio = openness_ratio(&hand).unwrap();
    assert!((ratio - 1.5).abs() < EPS);
  }

  #[test]
  fn degenerate_hands_have_no_ratio() {
    let single = HandLandmarks::new(vec![LandmarkPoint::new(0.2, 0.2)]);
    assert_eq!(openness_ratio(&single), None);

    let collapsed: HandLandmarks = [(0.2, 0.2), (0.4, 0.4), (0.2, 0.2)].into_iter().collect();
    assert_eq!(openness_ratio(&collapsed), None);
    assert!(!is_open_ratio(openness_ratio(&collapsed), 17.0));
  }

  #[test]
  fn open_test_is_strict_on_both_bounds() {
    assert!(!is_open_ratio(Some(0.0), 17.0));
    assert!(!is_open_ratio(Some(17.0), 17.0));
    assert!(!is_open_ratio(Some(-1.0), 17.0));
    assert!(!is_open_ratio(None, 17.0));
    assert!(is_open_ratio(Some(16.99), 17.0));
    assert!(is_open_ratio(Some(f64::MIN_POSITIVE), 17.0));
  }
}
