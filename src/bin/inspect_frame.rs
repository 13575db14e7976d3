// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/bin/inspect_frame.rs - 查看单帧的手势结果
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use shoushi::{
  FromUrl,
  config::{ConfigArgs, GestureConfig},
  input::InputWrapper,
  model::ReplayLandmarks,
  output::OutputList,
  task::{GesturePipeline, OneShotTask, Task},
};
use tracing::info;

/// 处理录制文件中的第一帧并打印结果
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 关键点模型
  #[arg(long, value_name = "MODEL", default_value = "recorded:")]
  pub model: Url,
  /// 输出路径，例如 image:///tmp/frame.png
  #[arg(long, value_name = "OUTPUT", default_value = "log:")]
  pub output: Vec<Url>,

  #[command(flatten)]
  pub config: ConfigArgs,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("模型: {}", args.model);

  let config = GestureConfig::try_from(&args.config)?;
  let input = InputWrapper::from_url(&args.input)?;
  let model = ReplayLandmarks::from_url(&args.model)?;
  let output = OutputList::from_urls(&args.output)?;

  OneShotTask.run_task(input, GesturePipeline::new(model, config), output)?;

  Ok(())
}
