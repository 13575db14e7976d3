// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/task.rs - 帧循环任务
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

use std::{
  sync::{
    Arc, Condvar, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver},
  },
  thread,
  time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  config::GestureConfig,
  control::{ControlMapper, ControlOutput},
  engine::{GestureEngine, GestureSignals},
  frame::FrameMeta,
  model::LandmarkModel,
  output::Render,
};

/// 一帧的完整处理结果，交给各个输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
  pub index: u64,
  pub width: u32,
  pub height: u32,
  pub signals: GestureSignals,
  pub control: ControlOutput,
}

/// 检测 → 手势引擎 → 控制映射。全部可变的手势状态都在这里，由唯一的循环持有。
pub struct GesturePipeline<M> {
  model: M,
  engine: GestureEngine,
  mapper: ControlMapper,
}

impl<M: LandmarkModel> GesturePipeline<M>
where
  M::Input: FrameMeta,
{
  pub fn new(model: M, config: GestureConfig) -> Self {
    Self {
      model,
      engine: GestureEngine::new(config.clone()),
      mapper: ControlMapper::new(config),
    }
  }

  pub fn engine(&self) -> &GestureEngine {
    &self.engine
  }

  pub fn step(&mut self, frame: &M::Input) -> Result<FrameReport, M::Error> {
    let hands = self.model.detect(frame)?;
    let signals = self.engine.process(&hands, frame.width(), frame.height());
    let control = self.mapper.map(&signals, frame.width());

    Ok(FrameReport {
      index: frame.index(),
      width: frame.width(),
      height: frame.height(),
      signals,
      control,
    })
  }
}

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, pipeline: GesturePipeline<M>, output: O) -> Result<(), Self::Error>;
}

// Ctrl-C 处理器每个进程只能注册一次，重复注册时退化为永不触发的接收端
fn install_interrupt() -> Receiver<()> {
  let (tx, rx) = mpsc::channel();
  let result = ctrlc::set_handler(move || {
    info!("收到中断信号，准备退出...");
    let _ = tx.send(());
    thread::spawn(|| {
      thread::sleep(Duration::from_secs(30));
      warn!("强制退出程序");
      std::process::exit(1);
    });
  });
  if let Err(e) = result {
    warn!("无法注册 Ctrl-C 处理器: {}", e);
  }
  rx
}

pub struct OneShotTask;

impl<
  F: FrameMeta,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: LandmarkModel<Input = F, Error = ME>,
  O: Render<F, FrameReport, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut pipeline: GesturePipeline<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))?;
    info!("输入帧获取成功，开始处理...");
    let now = Instant::now();
    let report = pipeline.step(&frame)?;
    info!("处理完成，耗时: {:.2?}", now.elapsed());
    info!("处理结果: {}", serde_json::to_string(&report)?);
    output.render_result(&frame, &report)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

#[derive(Default, Debug)]
pub struct ContinuousTask {
  frame_number: Option<usize>,
}

impl ContinuousTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }
}

impl<
  F: FrameMeta,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: LandmarkModel<Input = F, Error = ME>,
  O: Render<F, FrameReport, Error = RE>,
> Task<I, M, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut pipeline: GesturePipeline<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let rx = install_interrupt();

    let mut frame_count = 0usize;
    let mut now = Instant::now();
    for frame in input {
      frame_count += 1;
      debug!("处理第 {} 帧", frame.index());
      let report = pipeline.step(&frame)?;
      let elapsed_a = now.elapsed();
      output.render_result(&frame, &report)?;
      let elapsed_b = now.elapsed();
      now = Instant::now();
      debug!("处理完成，耗时: {:.2?} / {:.2?}", elapsed_a, elapsed_b);
      if self.frame_number.map(|n| frame_count >= n).unwrap_or(false) {
        info!("达到指定帧数 {}, 退出任务循环", frame_count);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    info!("任务完成，共处理 {} 帧", frame_count);
    Ok(())
  }
}

struct SlotState<T> {
  frame: Option<T>,
  closed: bool,
  dropped: u64,
}

/// 单槽“最新帧”通道：新帧覆盖尚未取走的旧帧，不排队。
pub struct LatestFrameSlot<T> {
  state: Mutex<SlotState<T>>,
  ready: Condvar,
}

impl<T> Default for LatestFrameSlot<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> LatestFrameSlot<T> {
  pub fn new() -> Self {
    Self {
      state: Mutex::new(SlotState {
        frame: None,
        closed: false,
        dropped: 0,
      }),
      ready: Condvar::new(),
    }
  }

  /// 放入一帧，返回是否覆盖了旧帧。通道关闭后新帧直接丢弃。
  pub fn publish(&self, frame: T) -> bool {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.closed {
      return false;
    }
    let replaced = state.frame.replace(frame).is_some();
    if replaced {
      state.dropped += 1;
    }
    self.ready.notify_one();
    replaced
  }

  /// 阻塞直到有新帧；通道关闭且没有剩余帧时返回 `None`
  pub fn take(&self) -> Option<T> {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    loop {
      if let Some(frame) = state.frame.take() {
        return Some(frame);
      }
      if state.closed {
        return None;
      }
      state = self
        .ready
        .wait(state)
        .unwrap_or_else(PoisonError::into_inner);
    }
  }

  pub fn close(&self) {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    state.closed = true;
    self.ready.notify_all();
  }

  pub fn is_closed(&self) -> bool {
    self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .closed
  }

  pub fn dropped(&self) -> u64 {
    self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .dropped
  }
}

/// 采集线程只保留最新帧，手势状态只在当前线程上更新
#[derive(Default, Debug)]
pub struct LatestFrameTask {
  frame_number: Option<usize>,
}

impl LatestFrameTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }
}

impl<
  F: FrameMeta + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F> + Send + 'static,
  M: LandmarkModel<Input = F, Error = ME>,
  O: Render<F, FrameReport, Error = RE>,
> Task<I, M, O> for LatestFrameTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut pipeline: GesturePipeline<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务（最新帧模式）...");
    let rx = install_interrupt();

    let slot = Arc::new(LatestFrameSlot::new());
    let stop = Arc::new(AtomicBool::new(false));

    let capture = {
      let slot = Arc::clone(&slot);
      let stop = Arc::clone(&stop);
      thread::spawn(move || {
        for frame in input {
          if stop.load(Ordering::Relaxed) {
            break;
          }
          slot.publish(frame);
        }
        slot.close();
        debug!("采集线程结束");
      })
    };

    let mut frame_count = 0usize;
    let result = (|| -> Result<(), Self::Error> {
      while let Some(frame) = slot.take() {
        frame_count += 1;
        let report = pipeline.step(&frame)?;
        output.render_result(&frame, &report)?;
        if self.frame_number.map(|n| frame_count >= n).unwrap_or(false) {
          info!("达到指定帧数 {}, 退出任务循环", frame_count);
          break;
        }
        if rx.try_recv().is_ok() {
          warn!("中断信号接收，退出任务循环");
          break;
        }
      }
      Ok(())
    })();

    stop.store(true, Ordering::Relaxed);
    slot.close();
    if capture.join().is_err() {
      warn!("采集线程异常退出");
    }

    info!(
      "任务完成，共处理 {} 帧，丢弃 {} 帧旧帧",
      frame_count,
      slot.dropped()
    );
    result
  }
}
