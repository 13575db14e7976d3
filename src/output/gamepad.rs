// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/output/gamepad.rs - 虚拟手柄
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
  convert::Infallible,
  sync::{Mutex, PoisonError},
  thread,
  time::Duration,
};

use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme, control::ControlOutput, output::Render, task::FrameReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GamepadButton {
  /// 加速键（Xbox A）
  Accelerate,
  /// 动作键（Xbox Y）
  Action,
}

/// 虚拟手柄设备。
///
/// 按键与摇杆的改动只有在 `update` 之后才提交到设备。
pub trait VirtualGamepad {
  type Error;

  fn press_button(&mut self, button: GamepadButton) -> Result<(), Self::Error>;
  fn release_button(&mut self, button: GamepadButton) -> Result<(), Self::Error>;
  fn left_joystick(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
  fn update(&mut self) -> Result<(), Self::Error>;

  /// 按下再松开加速键以唤醒设备
  fn wake(&mut self, delay: Duration) -> Result<(), Self::Error> {
    self.press_button(GamepadButton::Accelerate)?;
    self.update()?;
    thread::sleep(delay);
    self.release_button(GamepadButton::Accelerate)?;
    self.update()?;
    thread::sleep(delay);
    Ok(())
  }
}

/// 手柄的按键与摇杆状态
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GamepadState {
  pub accelerate: bool,
  pub action: bool,
  pub joystick_x: f64,
  pub joystick_y: f64,
}

impl GamepadState {
  pub fn set_button(&mut self, button: GamepadButton, pressed: bool) {
    match button {
      GamepadButton::Accelerate => self.accelerate = pressed,
      GamepadButton::Action => self.action = pressed,
    }
  }

  pub fn set_joystick(&mut self, x: f64, y: f64) {
    self.joystick_x = x.clamp(-1.0, 1.0);
    self.joystick_y = y.clamp(-1.0, 1.0);
  }
}

/// 只把提交的状态写进日志的手柄
#[derive(Debug, Default)]
pub struct LogGamepad {
  pending: GamepadState,
  committed: GamepadState,
}

impl LogGamepad {
  pub fn committed(&self) -> GamepadState {
    self.committed
  }
}

impl FromUrlWithScheme for LogGamepad {
  const SCHEME: &'static str = "log";
}

impl FromUrl for LogGamepad {
  type Error = Infallible;

  fn from_url(_url: &Url) -> Result<Self, Self::Error> {
    Ok(LogGamepad::default())
  }
}

impl VirtualGamepad for LogGamepad {
  type Error = Infallible;

  fn press_button(&mut self, button: GamepadButton) -> Result<(), Self::Error> {
    self.pending.set_button(button, true);
    Ok(())
  }

  fn release_button(&mut self, button: GamepadButton) -> Result<(), Self::Error> {
    self.pending.set_button(button, false);
    Ok(())
  }

  fn left_joystick(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
    self.pending.set_joystick(x, y);
    Ok(())
  }

  fn update(&mut self) -> Result<(), Self::Error> {
    if self.pending.accelerate != self.committed.accelerate
      || self.pending.action != self.committed.action
    {
      info!(
        "手柄按键: 加速={}, 动作={}",
        self.pending.accelerate, self.pending.action
      );
    }
    debug!(
      "手柄摇杆: ({:.3}, {:.3})",
      self.pending.joystick_x, self.pending.joystick_y
    );
    self.committed = self.pending;
    Ok(())
  }
}

/// 把每帧的控制量写入虚拟手柄
pub struct GamepadOutput<G> {
  gamepad: Mutex<G>,
}

impl<G: VirtualGamepad> GamepadOutput<G> {
  pub fn new(gamepad: G) -> Self {
    Self {
      gamepad: Mutex::new(gamepad),
    }
  }

  pub fn wake(&self, delay: Duration) -> Result<(), G::Error> {
    info!("唤醒虚拟手柄...");
    let mut gamepad = self.gamepad.lock().unwrap_or_else(PoisonError::into_inner);
    gamepad.wake(delay)
  }

  pub fn into_inner(self) -> G {
    self
      .gamepad
      .into_inner()
      .unwrap_or_else(PoisonError::into_inner)
  }

  fn apply(gamepad: &mut G, control: &ControlOutput) -> Result<(), G::Error> {
    if control.accelerate {
      gamepad.press_button(GamepadButton::Accelerate)?;
    } else {
      gamepad.release_button(GamepadButton::Accelerate)?;
    }

    // 触发后保持按住，直到手掌合上
    if control.action_fired {
      gamepad.press_button(GamepadButton::Action)?;
    } else if !control.action_pressed {
      gamepad.release_button(GamepadButton::Action)?;
    }

    gamepad.left_joystick(control.steering, 0.0)?;
    gamepad.update()
  }
}

impl<F, G: VirtualGamepad> Render<F, FrameReport> for GamepadOutput<G> {
  type Error = G::Error;

  fn render_result(&self, _frame: &F, result: &FrameReport) -> Result<(), Self::Error> {
    let mut gamepad = self.gamepad.lock().unwrap_or_else(PoisonError::into_inner);
    Self::apply(&mut gamepad, &result.control)
  }
}
