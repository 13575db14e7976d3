// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/output.rs - 输出定义
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

use std::{convert::Infallible, time::Duration};

use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::RecordedFrame, task::FrameReport};

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

pub mod gamepad;
pub use self::gamepad::{GamepadButton, GamepadOutput, GamepadState, LogGamepad, VirtualGamepad};

#[cfg(feature = "record_gamepad")]
mod record_gamepad;
#[cfg(feature = "record_gamepad")]
pub use self::record_gamepad::{RecordGamepad, RecordGamepadError};

#[cfg(feature = "save_image_file")]
pub mod draw;
#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "record_gamepad")]
  #[error("手柄记录错误: {0}")]
  RecordGamepadError(#[from] RecordGamepadError),
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

impl From<Infallible> for OutputError {
  fn from(err: Infallible) -> Self {
    match err {}
  }
}

pub enum OutputWrapper {
  LogGamepad(GamepadOutput<LogGamepad>),
  #[cfg(feature = "record_gamepad")]
  RecordGamepad(GamepadOutput<RecordGamepad>),
  #[cfg(feature = "save_image_file")]
  SaveImageFileOutput(SaveImageFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      LogGamepad::SCHEME => {
        let gamepad = LogGamepad::from_url(url)?;
        Ok(OutputWrapper::LogGamepad(GamepadOutput::new(gamepad)))
      }
      #[cfg(feature = "record_gamepad")]
      RecordGamepad::SCHEME => {
        let gamepad = RecordGamepad::from_url(url)?;
        Ok(OutputWrapper::RecordGamepad(GamepadOutput::new(gamepad)))
      }
      #[cfg(feature = "save_image_file")]
      SaveImageFileOutput::SCHEME => {
        let output = SaveImageFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveImageFileOutput(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl OutputWrapper {
  /// 唤醒手柄类输出，其余输出忽略
  pub fn wake(&self, delay: Duration) -> Result<(), OutputError> {
    match self {
      OutputWrapper::LogGamepad(output) => output.wake(delay).map_err(OutputError::from),
      #[cfg(feature = "record_gamepad")]
      OutputWrapper::RecordGamepad(output) => output.wake(delay).map_err(OutputError::from),
      #[allow(unreachable_patterns)]
      _ => Ok(()),
    }
  }
}

impl Render<RecordedFrame, FrameReport> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &RecordedFrame, result: &FrameReport) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::LogGamepad(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "record_gamepad")]
      OutputWrapper::RecordGamepad(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}

/// 同时写入多个输出，例如手柄加调试画面
pub struct OutputList {
  outputs: Vec<OutputWrapper>,
}

impl OutputList {
  pub fn from_urls<'u>(urls: impl IntoIterator<Item = &'u Url>) -> Result<Self, OutputError> {
    let outputs = urls
      .into_iter()
      .map(OutputWrapper::from_url)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { outputs })
  }

  pub fn len(&self) -> usize {
    self.outputs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.outputs.is_empty()
  }

  pub fn wake(&self, delay: Duration) -> Result<(), OutputError> {
    self.outputs.iter().try_for_each(|output| output.wake(delay))
  }
}

impl Render<RecordedFrame, FrameReport> for OutputList {
  type Error = OutputError;

  fn render_result(&self, frame: &RecordedFrame, result: &FrameReport) -> Result<(), Self::Error> {
    self
      .outputs
      .iter()
      .try_for_each(|output| output.render_result(frame, result))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_known_schemes() {
    let log = Url::parse("log:").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&log),
      Ok(OutputWrapper::LogGamepad(_))
    ));

    let unknown = Url::parse("rtsp://localhost/stream").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&unknown),
      Err(OutputError::SchemeMismatch)
    ));
  }

  #[test]
  fn output_list_fails_on_any_bad_url() {
    let urls = [
      Url::parse("log:").unwrap(),
      Url::parse("ftp://example.com/").unwrap(),
    ];
    assert!(OutputList::from_urls(&urls).is_err());

    let list = OutputList::from_urls(&urls[..1]).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list.wake(Duration::ZERO).is_ok());
  }
}
