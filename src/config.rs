// 该文件是 Shoushi （手势方向盘） 项目的一部分。
// src/config.rs - 手势参数配置
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

use clap::Args;
use thiserror::Error;

// 经验值，没有推导依据，保持为可配置的默认值
pub const DEFAULT_MIN_FRAME_TO_SWITCH_STATE: u32 = 5;
pub const DEFAULT_OPENNESS_RATIO_CEILING: f64 = 17.0;
pub const DEFAULT_ANGLE_CLAMP_DEGREES: f64 = 45.0;
pub const DEFAULT_ACTION_TRIGGER_FRAMES: u32 = 10;
pub const DEFAULT_THROTTLE_MARGIN_PX: u32 = 100;
pub const DEFAULT_THROTTLE_DEADBAND: f64 = 0.1;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
  #[error("切换状态所需帧数必须大于 0")]
  ZeroSwitchThreshold,
  #[error("张开比例上限必须为正有限数，实际为 {0}")]
  InvalidRatioCeiling(f64),
  #[error("角度限幅必须为正有限数，实际为 {0}")]
  InvalidAngleClamp(f64),
  #[error("油门死区必须位于 [0, 1) 区间，实际为 {0}")]
  InvalidDeadband(f64),
}

/// 手势引擎与控制映射使用的全部可调参数
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
  /// 连续多少帧（严格大于）相同判定后才切换手掌状态
  pub min_frame_to_switch_state: u32,
  /// 张开判定上限：`0 < ratio < ceiling` 视为张开
  pub openness_ratio_ceiling: f64,
  /// 转向角度限幅（度）
  pub angle_clamp_degrees: f64,
  /// 左手张开持续多少帧（严格大于）后触发动作
  pub action_trigger_frames: u32,
  /// 归一化油门时从图像宽度中减去的边距（像素）
  pub throttle_margin_px: u32,
  /// 油门死区，超过该值才按下加速键
  pub throttle_deadband: f64,
  /// 摄像头画面未经镜像时，用户的左手出现在画面右侧
  pub mirrored_camera: bool,
}

impl Default for GestureConfig {
  fn default() -> Self {
    Self {
      min_frame_to_switch_state: DEFAULT_MIN_FRAME_TO_SWITCH_STATE,
      openness_ratio_ceiling: DEFAULT_OPENNESS_RATIO_CEILING,
      angle_clamp_degrees: DEFAULT_ANGLE_CLAMP_DEGREES,
      action_trigger_frames: DEFAULT_ACTION_TRIGGER_FRAMES,
      throttle_margin_px: DEFAULT_THROTTLE_MARGIN_PX,
      throttle_deadband: DEFAULT_THROTTLE_DEADBAND,
      mirrored_camera: true,
    }
  }
}

impl GestureConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.min_frame_to_switch_state == 0 {
      return Err(ConfigError::ZeroSwitchThreshold);
    }
    if !self.openness_ratio_ceiling.is_finite() || self.openness_ratio_ceiling <= 0.0 {
      return Err(ConfigError::InvalidRatioCeiling(
        self.openness_ratio_ceiling,
      ));
    }
    if !self.angle_clamp_degrees.is_finite() || self.angle_clamp_degrees <= 0.0 {
      return Err(ConfigError::InvalidAngleClamp(self.angle_clamp_degrees));
    }
    if !(0.0..1.0).contains(&self.throttle_deadband) {
      return Err(ConfigError::InvalidDeadband(self.throttle_deadband));
    }
    Ok(())
  }
}

/// 命令行中的手势参数
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
  /// 切换手掌状态所需的连续帧数
  #[arg(long, default_value_t = DEFAULT_MIN_FRAME_TO_SWITCH_STATE, value_name = "FRAMES")]
  pub min_frame_to_switch_state: u32,

  /// 手掌张开比例上限
  #[arg(long, default_value_t = DEFAULT_OPENNESS_RATIO_CEILING, value_name = "RATIO")]
  pub openness_ratio_ceiling: f64,

  /// 转向角度限幅（度）
  #[arg(long, default_value_t = DEFAULT_ANGLE_CLAMP_DEGREES, value_name = "DEGREES")]
  pub angle_clamp_degrees: f64,

  /// 触发动作键所需的左手张开帧数
  #[arg(long, default_value_t = DEFAULT_ACTION_TRIGGER_FRAMES, value_name = "FRAMES")]
  pub action_trigger_frames: u32,

  /// 油门归一化边距（像素）
  #[arg(long, default_value_t = DEFAULT_THROTTLE_MARGIN_PX, value_name = "PIXELS")]
  pub throttle_margin_px: u32,

  /// 油门死区 [0, 1)
  #[arg(long, default_value_t = DEFAULT_THROTTLE_DEADBAND, value_name = "FRACTION")]
  pub throttle_deadband: f64,

  /// 输入画面已经过水平镜像（自拍视角）
  #[arg(long, default_value_t = false)]
  pub mirrored_input: bool,
}

impl TryFrom<&ConfigArgs> for GestureConfig {
  type Error = ConfigError;

  fn try_from(args: &ConfigArgs) -> Result<Self, Self::Error> {
    let config = GestureConfig {
      min_frame_to_switch_state: args.min_frame_to_switch_state,
      openness_ratio_ceiling: args.openness_ratio_ceiling,
      angle_clamp_degrees: args.angle_clamp_degrees,
      action_trigger_frames: args.action_trigger_frames,
      throttle_margin_px: args.throttle_margin_px,
      throttle_deadband: args.throttle_deadband,
      mirrored_camera: !args.mirrored_input,
    };
    config.validate()?;
    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_is_valid() {
    assert_eq!(GestureConfig::default().validate(), Ok(()));
  }

  #[test]
  fn rejects_zero_threshold() {
    let config = GestureConfig {
      min_frame_to_switch_state: 0,
      ..Default::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::ZeroSwitchThreshold));
  }

  #[test]
  fn rejects_bad_ceiling_and_clamp() {
    let config = GestureConfig {
      openness_ratio_ceiling: f64::NAN,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::InvalidRatioCeiling(_))
    ));

    let config = GestureConfig {
      angle_clamp_degrees: -1.0,
      ..Default::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::InvalidAngleClamp(-1.0)));
  }

  #[test]
  fn rejects_deadband_out_of_range() {
    let config = GestureConfig {
      throttle_deadband: 1.0,
      ..Default::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::InvalidDeadband(1.0)));
  }

  #[test]
  fn args_build_config() {
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
      #[command(flatten)]
      config: ConfigArgs,
    }

    let cli = Cli::parse_from(["test", "--min-frame-to-switch-state", "3", "--mirrored-input"]);
    let config = GestureConfig::try_from(&cli.config).unwrap();
    assert_eq!(config.min_frame_to_switch_state, 3);
    assert_eq!(config.openness_ratio_ceiling, DEFAULT_OPENNESS_RATIO_CEILING);
    assert!(!config.mirrored_camera);
  }
}
