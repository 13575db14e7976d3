// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/output/draw.rs - 手势调试画面
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

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{
  draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{frame::RecordedFrame, hand::PixelPoint, task::FrameReport};

// 绘制常量
const CENTROID_RADIUS: i32 = 10;
const FIRST_HAND_COLOR: [u8; 3] = [255, 0, 0]; // 红色
const SECOND_HAND_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色
const GUIDE_COLOR: [u8; 3] = [0, 255, 0]; // 绿色
const TEXT_FONT_SIZE: f32 = 24.0;
const TEXT_LINE_HEIGHT: i32 = 30;

#[derive(Error, Debug)]
pub enum OverlayError {
  #[error("字体文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体无效: {0}")]
  InvalidFont(String),
}

pub trait ToRgbImage {
  fn to_rgb_image(&self) -> RgbImage;
}

// 录制帧不含图像，使用黑色画布
impl ToRgbImage for RecordedFrame {
  fn to_rgb_image(&self) -> RgbImage {
    RgbImage::new(self.width, self.height)
  }
}

impl ToRgbImage for RgbImage {
  fn to_rgb_image(&self) -> RgbImage {
    self.clone()
  }
}

/// 调试叠加层：两手质心、连线、方向盘圆圈，以及镜像后的文字信息
#[derive(Default)]
pub struct Overlay {
  font: Option<FontVec>,
}

impl Overlay {
  pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let font = FontVec::try_from_vec(data).map_err(|e| OverlayError::InvalidFont(e.to_string()))?;
    info!("加载字体: {}", path.display());
    Ok(Self { font: Some(font) })
  }

  /// 从 URL 查询参数 `font=/path/to/font.ttf` 构建，未提供字体时不绘制文字
  pub fn from_query(url: &Url) -> Result<Self, OverlayError> {
    match url.query_pairs().find(|(k, _)| k == "font") {
      Some((_, path)) => Self::with_font_file(&*path),
      None => Ok(Self::default()),
    }
  }

  pub fn draw_report<F: ToRgbImage>(&self, frame: &F, report: &FrameReport) -> RgbImage {
    let mut image = frame.to_rgb_image();
    if let Some(centroids) = report.signals.centroids {
      Self::draw_hands(&mut image, centroids, report.signals.distance);
    }
    // 镜像后画面与用户的左右一致
    imageops::flip_horizontal_in_place(&mut image);
    self.draw_text(&mut image, report);
    image
  }

  fn draw_hands(image: &mut RgbImage, [first, second]: [PixelPoint; 2], distance: f64) {
    draw_filled_circle_mut(
      image,
      (first.x, first.y),
      CENTROID_RADIUS,
      Rgb(FIRST_HAND_COLOR),
    );
    draw_filled_circle_mut(
      image,
      (second.x, second.y),
      CENTROID_RADIUS,
      Rgb(SECOND_HAND_COLOR),
    );

    draw_line_segment_mut(
      image,
      (first.x as f32, first.y as f32),
      (second.x as f32, second.y as f32),
      Rgb(GUIDE_COLOR),
    );

    // 以两手中点为圆心、半个距离为半径的方向盘
    let center = ((first.x + second.x) / 2, (first.y + second.y) / 2);
    let radius = (distance / 2.0) as i32;
    for r in [radius, radius - 1] {
      if r > 0 {
        draw_hollow_circle_mut(image, center, r, Rgb(GUIDE_COLOR));
      }
    }
  }

  fn draw_text(&self, image: &mut RgbImage, report: &FrameReport) {
    let Some(font) = &self.font else {
      return;
    };

    let lines = [
      format!("Speed : {:.2}", report.signals.distance),
      format!("Angle : {:.2}", report.signals.angle),
      format!("Left palm : {}", report.signals.left_palm),
      format!("Right palm : {}", report.signals.right_palm),
    ];
    let scale = PxScale::from(TEXT_FONT_SIZE);
    let bottom = image.height() as i32;

    for (row, text) in lines.iter().enumerate() {
      let y = bottom - TEXT_LINE_HEIGHT * (row as i32 + 1);
      draw_text_mut(image, Rgb(GUIDE_COLOR), 0, y, scale, font, text);
    }
  }
}
