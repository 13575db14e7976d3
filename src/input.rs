// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/input.rs - 帧输入
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

use thiserror::Error;

use crate::{FromUrl, FromUrlWithScheme, frame::RecordedFrame};

mod replay_file;
pub use self::replay_file::{ReplayFileInput, ReplayFileInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[error("Replay file input error: {0}")]
  ReplayFileInputError(#[from] ReplayFileInputError),
  #[error("URI scheme mismatch")]
  SchemeMismatch,
}

pub enum InputWrapper {
  ReplayFile(ReplayFileInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    if url.scheme() == ReplayFileInput::SCHEME {
      let input = ReplayFileInput::from_url(url)?;
      return Ok(InputWrapper::ReplayFile(input));
    }
    Err(InputError::SchemeMismatch)
  }
}

impl Iterator for InputWrapper {
  type Item = RecordedFrame;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::ReplayFile(input) => input.next(),
    }
  }
}
