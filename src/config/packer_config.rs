// ==========================================
// 集装箱船配载引擎 - 配载参数
// ==========================================
// 职责: 将配置读取结果解析为经校验的配载参数
// ==========================================

use crate::config::stowage_config_trait::StowageConfigReader;
use crate::domain::ship::Ship;
use crate::domain::types::{SeaState, StackWeightPolicy};
use crate::engine::constraint::{ConstraintChecker, DEFAULT_HAZMAT_SEPARATION};
use crate::engine::strategy::PackStrategy;
use crate::error::{StowageError, StowageResult};
use serde::{Deserialize, Serialize};

/// 配载参数（一次配载内不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackerConfig {
    /// 危险品最小曼哈顿距离
    pub hazmat_separation: u32,

    /// 稳性预测阈值（米）
    pub gm_threshold_m: f64,

    /// 海况（仅用于记录阈值来源）
    pub sea_state: SeaState,

    /// 堆重校验口径
    pub stack_policy: StackWeightPolicy,

    /// 未指定策略时使用的默认策略
    pub default_strategy: PackStrategy,
}

impl PackerConfig {
    /// 船舶默认参数: 平静海况, 阈值 = GM_min
    pub fn for_ship(ship: &Ship) -> Self {
        Self {
            hazmat_separation: DEFAULT_HAZMAT_SEPARATION,
            gm_threshold_m: ship.stability_params().gm_min_m,
            sea_state: SeaState::default(),
            stack_policy: StackWeightPolicy::default(),
            default_strategy: PackStrategy::default(),
        }
    }

    /// 由配置读取器解析
    ///
    /// 未显式配置 gm_threshold 时, 阈值 = 船舶 GM_min × 海况系数
    ///
    /// # 错误
    /// - InvalidConfiguration: 配置值无法解析或阈值非法
    pub fn resolve<R>(reader: &R, ship: &Ship) -> StowageResult<Self>
    where
        R: StowageConfigReader + ?Sized,
    {
        let sea_state = reader.get_sea_state()?;
        let gm_threshold_m = match reader.get_gm_threshold()? {
            Some(explicit) => explicit,
            None => sea_state.required_gm(ship.stability_params().gm_min_m),
        };

        let config = Self {
            hazmat_separation: reader.get_hazmat_separation()?,
            gm_threshold_m,
            sea_state,
            stack_policy: reader.get_stack_weight_policy()?,
            default_strategy: reader.get_default_strategy()?,
        };
        config.validate()?;

        tracing::debug!(
            ship = %ship.name(),
            hazmat_separation = config.hazmat_separation,
            gm_threshold_m = config.gm_threshold_m,
            sea_state = %config.sea_state,
            stack_policy = %config.stack_policy,
            "配载参数已解析"
        );
        Ok(config)
    }

    /// 校验参数
    pub fn validate(&self) -> StowageResult<()> {
        if !self.gm_threshold_m.is_finite() || self.gm_threshold_m < 0.0 {
            return Err(StowageError::invalid(format!(
                "稳性阈值非法: {}",
                self.gm_threshold_m
            )));
        }
        Ok(())
    }

    /// 构造约束检查器
    pub fn checker(&self) -> ConstraintChecker {
        ConstraintChecker::new(self.hazmat_separation, self.gm_threshold_m, self.stack_policy)
    }
}
