// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/model/replay.rs - 回放录制的关键点
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

use std::convert::Infallible;

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{FrameMeta, RecordedFrame},
  hand::HandLandmarks,
  model::LandmarkModel,
};

#[derive(Error, Debug)]
pub enum ReplayLandmarksError {
  #[error("模型路径必须使用 {0} 方案")]
  SchemeMismatch(&'static str),
}

/// 直接返回录制帧中保存的检测结果
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayLandmarks;

impl FromUrlWithScheme for ReplayLandmarks {
  const SCHEME: &'static str = "recorded";
}

impl FromUrl for ReplayLandmarks {
  type Error = ReplayLandmarksError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ReplayLandmarksError::SchemeMismatch(Self::SCHEME));
    }
    Ok(ReplayLandmarks)
  }
}

impl LandmarkModel for ReplayLandmarks {
  type Input = RecordedFrame;
  type Error = Infallible;

  fn detect(&self, input: &Self::Input) -> Result<Box<[HandLandmarks]>, Self::Error> {
    debug!("第 {} 帧录制了 {} 只手", input.index(), input.hands.len());
    Ok(input.hands.clone().into_boxed_slice())
  }
}
