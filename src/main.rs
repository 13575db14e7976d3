// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/main.rs - 项目主程序
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

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use url::Url;

use shoushi::{
  FromUrl,
  config::{ConfigArgs, GestureConfig},
  input::InputWrapper,
  model::ReplayLandmarks,
  output::OutputList,
  task::{ContinuousTask, GesturePipeline, LatestFrameTask, Task},
};
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum Mode {
  /// 逐帧处理所有输入帧
  #[default]
  Continuous,
  /// 只处理最新帧，处理不及时的旧帧被丢弃
  Latest,
}

/// Shoushi 手势方向盘
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源，例如 replay:///path/to/hands.jsonl?loop&fps=30
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 关键点模型
  #[arg(long, value_name = "MODEL", default_value = "recorded:")]
  pub model: Url,
  /// 输出，可以重复指定，例如 log: 、record:///tmp/pad.jsonl 、folder:///tmp/frames
  #[arg(long, value_name = "OUTPUT", required = true)]
  pub output: Vec<Url>,

  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,

  /// 帧循环模式
  #[arg(long, value_enum, default_value_t = Mode::Continuous)]
  pub mode: Mode,

  /// 唤醒手柄时按键保持的毫秒数
  #[arg(long, value_name = "MILLISECONDS", default_value_t = 500)]
  pub wake_delay_ms: u64,

  /// 不唤醒手柄
  #[arg(long, default_value_t = false)]
  pub skip_wake: bool,

  #[command(flatten)]
  pub config: ConfigArgs,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("模型: {}", args.model);
  for output in &args.output {
    info!("输出路径: {}", output);
  }

  let config = GestureConfig::try_from(&args.config)?;
  info!("手势参数: {:?}", config);

  let input = InputWrapper::from_url(&args.input)?;
  let model = ReplayLandmarks::from_url(&args.model)?;
  let output = OutputList::from_urls(&args.output)?;

  if !args.skip_wake {
    output.wake(Duration::from_millis(args.wake_delay_ms))?;
  }

  let pipeline = GesturePipeline::new(model, config);
  match args.mode {
    Mode::Continuous => ContinuousTask::default()
      .with_frame_number(args.frame_number)
      .run_task(input, pipeline, output)?,
    Mode::Latest => LatestFrameTask::default()
      .with_frame_number(args.frame_number)
      .run_task(input, pipeline, output)?,
  }

  Ok(())
}
