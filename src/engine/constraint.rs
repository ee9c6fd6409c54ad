// ==========================================
// 集装箱船配载引擎 - 约束检查器
// ==========================================
// 职责: 判定"某箱放入某空槽位"是否可行
// 输入: 船舶当前状态 + 集装箱 + 候选槽位
// 输出: CheckOutcome (Pass 附原因 / Reject 附违规)
// 红线: 全部检查为纯函数, 不修改船舶;
//       违规以值返回, 不走 Err 通道
// ==========================================
// 检查顺序 (check_all 固定):
// 1) 承重: 单箱上限 / 堆重许可 / 载重吨
// 2) 冷藏电源
// 3) 危险品间距 (网格曼哈顿距离)
// 4) 稳性预测 (预测 GM ≥ 阈值)
// ==========================================

use crate::domain::container::Container;
use crate::domain::ship::Ship;
use crate::domain::slot::{Slot, SlotCoord};
use crate::domain::types::StackWeightPolicy;
use crate::engine::stability::{LoadPoint, StabilityCalculator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 危险品最小间距默认值（网格单位）
pub const DEFAULT_HAZMAT_SEPARATION: u32 = 3;

// ==========================================
// ConstraintViolation - 约束违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintViolation {
    /// 超出单箱上限、堆重许可或载重吨
    CapacityExceeded { detail: String },
    /// 冷藏箱放入无电源槽位
    PowerUnavailable,
    /// 与已配载危险品距离不足
    UnsafeProximity {
        distance: u32,
        other_slot_id: String,
        threshold: u32,
    },
    /// 放入后预测 GM 低于阈值
    StabilityViolation { predicted_gm_m: f64, threshold_m: f64 },
}

impl ConstraintViolation {
    /// 违规代码（用于失败原因统计）
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintViolation::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            ConstraintViolation::PowerUnavailable => "POWER_UNAVAILABLE",
            ConstraintViolation::UnsafeProximity { .. } => "UNSAFE_PROXIMITY",
            ConstraintViolation::StabilityViolation { .. } => "STABILITY_VIOLATION",
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::CapacityExceeded { detail } => {
                write!(f, "CAPACITY_EXCEEDED: {}", detail)
            }
            ConstraintViolation::PowerUnavailable => {
                write!(f, "POWER_UNAVAILABLE: 槽位无冷藏电源")
            }
            ConstraintViolation::UnsafeProximity {
                distance,
                other_slot_id,
                threshold,
            } => write!(
                f,
                "UNSAFE_PROXIMITY: 距危险品 {} 仅 {} 格 (要求 ≥ {})",
                other_slot_id, distance, threshold
            ),
            ConstraintViolation::StabilityViolation {
                predicted_gm_m,
                threshold_m,
            } => write!(
                f,
                "STABILITY_VIOLATION: 预测 GM={:.3}m < 阈值 {:.3}m",
                predicted_gm_m, threshold_m
            ),
        }
    }
}

// ==========================================
// CheckOutcome - 单项/整体检查结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Pass(String),
    Reject(ConstraintViolation),
}

impl CheckOutcome {
    pub fn is_admissible(&self) -> bool {
        matches!(self, CheckOutcome::Pass(_))
    }

    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            CheckOutcome::Pass(_) => None,
            CheckOutcome::Reject(v) => Some(v),
        }
    }

    /// 人类可读原因
    pub fn reason(&self) -> String {
        match self {
            CheckOutcome::Pass(reason) => reason.clone(),
            CheckOutcome::Reject(v) => v.to_string(),
        }
    }
}

// ==========================================
// ConstraintKind - 约束种类（即 check_all 执行顺序）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    WeightLimit,
    ReeferPower,
    HazmatSeparation,
    Stability,
}

impl ConstraintKind {
    /// check_all 的固定执行顺序
    pub const ORDER: [ConstraintKind; 4] = [
        ConstraintKind::WeightLimit,
        ConstraintKind::ReeferPower,
        ConstraintKind::HazmatSeparation,
        ConstraintKind::Stability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::WeightLimit => "weight_limit",
            ConstraintKind::ReeferPower => "reefer_power",
            ConstraintKind::HazmatSeparation => "hazmat_separation",
            ConstraintKind::Stability => "stability",
        }
    }
}

// ==========================================
// ConstraintChecker - 约束检查器
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintChecker {
    hazmat_separation: u32,
    gm_threshold_m: f64,
    stack_policy: StackWeightPolicy,
}

impl ConstraintChecker {
    /// 构造函数
    ///
    /// # 参数
    /// - hazmat_separation: 危险品最小曼哈顿距离
    /// - gm_threshold_m: 稳性预测阈值（米）
    /// - stack_policy: 堆重校验口径
    pub fn new(hazmat_separation: u32, gm_threshold_m: f64, stack_policy: StackWeightPolicy) -> Self {
        Self {
            hazmat_separation,
            gm_threshold_m,
            stack_policy,
        }
    }

    /// 以船舶 GM_min 与默认参数构造
    pub fn for_ship(ship: &Ship) -> Self {
        Self::new(
            DEFAULT_HAZMAT_SEPARATION,
            ship.stability_params().gm_min_m,
            StackWeightPolicy::default(),
        )
    }

    pub fn hazmat_separation(&self) -> u32 {
        self.hazmat_separation
    }

    pub fn gm_threshold_m(&self) -> f64 {
        self.gm_threshold_m
    }

    pub fn stack_policy(&self) -> StackWeightPolicy {
        self.stack_policy
    }

    // ==========================================
    // 单项检查
    // ==========================================

    /// 承重检查
    ///
    /// 依次校验单箱上限、堆重许可（按口径）、载重吨
    pub fn check_weight_limit(&self, ship: &Ship, container: &Container, slot: &Slot) -> CheckOutcome {
        let weight = container.total_weight_t;

        if weight > slot.max_tier_weight_t {
            return reject_capacity(format!(
                "单箱 {:.2}t > 层限 {:.2}t @ {}",
                weight, slot.max_tier_weight_t, slot.slot_id
            ));
        }

        match self.stack_policy {
            StackWeightPolicy::PerContainer => {
                if weight > slot.max_stack_weight_t {
                    return reject_capacity(format!(
                        "单箱 {:.2}t > 堆重许可 {:.2}t @ {}",
                        weight, slot.max_stack_weight_t, slot.slot_id
                    ));
                }
            }
            StackWeightPolicy::CumulativeColumn => {
                for tier in 1..=slot.tier() {
                    let coord = SlotCoord::new(slot.bay(), slot.row(), tier);
                    let base = match ship.slot(coord) {
                        Ok(base) => base,
                        Err(_) => continue,
                    };
                    let stacked = ship.column_load_from(coord) + weight;
                    if stacked > base.max_stack_weight_t {
                        return reject_capacity(format!(
                            "列堆重 {:.2}t > 堆重许可 {:.2}t @ {}",
                            stacked, base.max_stack_weight_t, base.slot_id
                        ));
                    }
                }
            }
        }

        let loaded = ship.cargo_weight_t() + weight;
        if loaded > ship.max_weight_t() {
            return reject_capacity(format!(
                "载货 {:.2}t > 载重吨 {:.2}t",
                loaded,
                ship.max_weight_t()
            ));
        }

        CheckOutcome::Pass(format!(
            "WEIGHT_OK: {:.2}t @ {} (层限 {:.2}t)",
            weight, slot.slot_id, slot.max_tier_weight_t
        ))
    }

    /// 冷藏电源检查（非冷藏箱直接通过）
    pub fn check_reefer_power(&self, container: &Container, slot: &Slot) -> CheckOutcome {
        if !container.is_reefer() {
            return CheckOutcome::Pass("REEFER_NA: 非冷藏箱".to_string());
        }
        if slot.reefer_power {
            CheckOutcome::Pass(format!("REEFER_OK: {} 有电源", slot.slot_id))
        } else {
            CheckOutcome::Reject(ConstraintViolation::PowerUnavailable)
        }
    }

    /// 危险品间距检查（非危险品直接通过）
    ///
    /// 与每个已配载危险品的曼哈顿距离须 ≥ 阈值
    pub fn check_hazmat_separation(
        &self,
        ship: &Ship,
        container: &Container,
        slot: &Slot,
    ) -> CheckOutcome {
        if !container.is_hazmat() {
            return CheckOutcome::Pass("HAZMAT_NA: 非危险品".to_string());
        }

        let nearest = ship
            .hazmat_coords()
            .iter()
            .map(|other| (slot.coord.manhattan_distance(other), *other))
            .min();

        match nearest {
            Some((distance, other)) if distance < self.hazmat_separation => {
                CheckOutcome::Reject(ConstraintViolation::UnsafeProximity {
                    distance,
                    other_slot_id: other.slot_id(),
                    threshold: self.hazmat_separation,
                })
            }
            Some((distance, _)) => CheckOutcome::Pass(format!(
                "HAZMAT_OK: 最近危险品距离 {} (要求 ≥ {})",
                distance, self.hazmat_separation
            )),
            None => CheckOutcome::Pass("HAZMAT_OK: 船上无其他危险品".to_string()),
        }
    }

    /// 稳性预测检查
    ///
    /// 以船舶累加器 O(1) 预测放入后 GM
    pub fn check_stability(&self, ship: &Ship, container: &Container, slot: &Slot) -> CheckOutcome {
        let predicted_gm_m = Self::predict_gm(ship, container, slot);
        if predicted_gm_m >= self.gm_threshold_m {
            CheckOutcome::Pass(format!(
                "STABILITY_OK: 预测 GM={:.3}m ≥ {:.3}m",
                predicted_gm_m, self.gm_threshold_m
            ))
        } else {
            CheckOutcome::Reject(ConstraintViolation::StabilityViolation {
                predicted_gm_m,
                threshold_m: self.gm_threshold_m,
            })
        }
    }

    /// 预测放入后的 GM（米）
    pub fn predict_gm(ship: &Ship, container: &Container, slot: &Slot) -> f64 {
        StabilityCalculator::project(
            ship.stability_params(),
            ship.load(),
            LoadPoint::new(container.total_weight_t, slot.z()),
        )
        .gm_m
    }

    // ==========================================
    // 组合检查
    // ==========================================

    /// 单项检查分派
    pub fn check(
        &self,
        kind: ConstraintKind,
        ship: &Ship,
        container: &Container,
        slot: &Slot,
    ) -> CheckOutcome {
        match kind {
            ConstraintKind::WeightLimit => self.check_weight_limit(ship, container, slot),
            ConstraintKind::ReeferPower => self.check_reefer_power(container, slot),
            ConstraintKind::HazmatSeparation => self.check_hazmat_separation(ship, container, slot),
            ConstraintKind::Stability => self.check_stability(ship, container, slot),
        }
    }

    /// 按固定顺序执行全部检查，返回首个失败或全部通过
    pub fn check_all(&self, ship: &Ship, container: &Container, slot: &Slot) -> CheckOutcome {
        let mut passed = Vec::with_capacity(ConstraintKind::ORDER.len());
        for kind in ConstraintKind::ORDER {
            match self.check(kind, ship, container, slot) {
                CheckOutcome::Pass(_) => passed.push(kind.as_str()),
                reject => return reject,
            }
        }
        CheckOutcome::Pass(format!("ALL_PASSED: {}", passed.join(",")))
    }
}

fn reject_capacity(detail: String) -> CheckOutcome {
    CheckOutcome::Reject(ConstraintViolation::CapacityExceeded { detail })
}
