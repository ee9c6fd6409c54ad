// ==========================================
// 集装箱船配载引擎 - 集装箱领域模型
// ==========================================
// 红线: 集装箱自身不可变；配载位置由 Ship 单向持有
//       (slot → container_id)，集装箱不保存槽位引用
// ==========================================

use crate::domain::types::{CargoCategory, CargoKind, ContainerSize, HazardClass};
use crate::error::{StowageError, StowageResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认装船优先级（1=最紧急, 5=最不紧急）
pub const DEFAULT_LOADING_PRIORITY: u8 = 5;

/// 最高装船优先级
pub const MAX_LOADING_PRIORITY: u8 = 1;

// ==========================================
// Dimensions - 外形尺寸（米）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
}

impl Dimensions {
    pub fn new(length_m: f64, width_m: f64, height_m: f64) -> Self {
        Self {
            length_m,
            width_m,
            height_m,
        }
    }

    /// 按箱型取标准尺寸
    pub fn standard(size: ContainerSize) -> Self {
        let (l, w, h) = size.standard_dimensions_m();
        Self::new(l, w, h)
    }

    fn is_valid(&self) -> bool {
        [self.length_m, self.width_m, self.height_m]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl From<(f64, f64, f64)> for Dimensions {
    fn from((l, w, h): (f64, f64, f64)) -> Self {
        Self::new(l, w, h)
    }
}

// ==========================================
// Container - 集装箱
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    // ===== 主键 =====
    pub container_id: String, // 箱号（运行内唯一）

    // ===== 箱型与货类 =====
    pub size: ContainerSize,    // 箱型
    pub cargo: CargoCategory,   // 货类（危险品带类别）

    // ===== 重量与尺寸 =====
    pub total_weight_t: f64,    // 总重（吨，含箱皮）
    pub empty_weight_t: f64,    // 箱皮重（吨）
    pub dimensions: Dimensions, // 外形尺寸

    // ===== 装船属性 =====
    pub loading_priority: u8,        // 装船优先级（1-5）
    pub destination: Option<String>, // 卸货港
}

impl Container {
    /// 构造集装箱
    ///
    /// # 参数
    /// - container_id: 箱号（非空）
    /// - size: 箱型
    /// - cargo: 货类
    /// - total_weight_t: 总重（吨，正数）
    /// - dimensions: 外形尺寸（正数）
    ///
    /// # 默认值
    /// - empty_weight_t: 按箱型取标准箱皮重
    /// - loading_priority: 5（最不紧急）
    ///
    /// # 错误
    /// - InvalidConfiguration: 缺少箱号、重量或尺寸非法
    pub fn new(
        container_id: impl Into<String>,
        size: ContainerSize,
        cargo: CargoCategory,
        total_weight_t: f64,
        dimensions: impl Into<Dimensions>,
    ) -> StowageResult<Self> {
        let container_id = container_id.into();
        let dimensions = dimensions.into();

        if container_id.trim().is_empty() {
            return Err(StowageError::invalid("集装箱缺少箱号"));
        }
        if !total_weight_t.is_finite() || total_weight_t <= 0.0 {
            return Err(StowageError::invalid(format!(
                "集装箱 {} 总重非法: {}",
                container_id, total_weight_t
            )));
        }
        if !dimensions.is_valid() {
            return Err(StowageError::invalid(format!(
                "集装箱 {} 尺寸非法: {:?}",
                container_id, dimensions
            )));
        }

        Ok(Self {
            container_id,
            size,
            cargo,
            total_weight_t,
            empty_weight_t: size.default_empty_weight_t(),
            dimensions,
            loading_priority: DEFAULT_LOADING_PRIORITY,
            destination: None,
        })
    }

    /// 指定箱皮重（不得超过总重）
    pub fn with_empty_weight(mut self, empty_weight_t: f64) -> StowageResult<Self> {
        if !empty_weight_t.is_finite() || empty_weight_t < 0.0 || empty_weight_t > self.total_weight_t
        {
            return Err(StowageError::invalid(format!(
                "集装箱 {} 箱皮重非法: {} (总重 {})",
                self.container_id, empty_weight_t, self.total_weight_t
            )));
        }
        self.empty_weight_t = empty_weight_t;
        Ok(self)
    }

    /// 指定装船优先级（1-5）
    pub fn with_priority(mut self, loading_priority: u8) -> StowageResult<Self> {
        if !(MAX_LOADING_PRIORITY..=DEFAULT_LOADING_PRIORITY).contains(&loading_priority) {
            return Err(StowageError::invalid(format!(
                "集装箱 {} 装船优先级非法: {}",
                self.container_id, loading_priority
            )));
        }
        self.loading_priority = loading_priority;
        Ok(self)
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    // ==========================================
    // 派生属性
    // ==========================================

    pub fn teu(&self) -> u32 {
        self.size.teu()
    }

    /// 货重 = 总重 - 箱皮重
    pub fn cargo_weight_t(&self) -> f64 {
        self.total_weight_t - self.empty_weight_t
    }

    pub fn is_reefer(&self) -> bool {
        matches!(self.cargo, CargoCategory::Reefer)
    }

    pub fn is_hazmat(&self) -> bool {
        matches!(self.cargo, CargoCategory::Hazmat { .. })
    }

    pub fn hazard_class(&self) -> Option<HazardClass> {
        self.cargo.hazard_class()
    }

    pub fn cargo_kind(&self) -> CargoKind {
        self.cargo.kind()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {:.2}t)",
            self.container_id, self.size, self.cargo, self.total_weight_t
        )
    }
}
