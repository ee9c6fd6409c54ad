// ==========================================
// 集装箱船配载引擎 - 槽位领域模型
// ==========================================
// 职责: 槽位坐标、几何布局、承重与冷藏电源能力
// 红线: 槽位在建船时一次性生成,能力与限值不可变;
//       占用状态由 Ship 统一管理
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SlotCoord - 槽位坐标 (bay, row, tier)
// ==========================================
// 派生 Ord 即为 (bay, row, tier) 字典序,即建船枚举顺序与配载搜索顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotCoord {
    pub bay: u32,
    pub row: u32,
    pub tier: u32,
}

impl SlotCoord {
    pub fn new(bay: u32, row: u32, tier: u32) -> Self {
        Self { bay, row, tier }
    }

    /// 网格曼哈顿距离 |Δbay| + |Δrow| + |Δtier|
    pub fn manhattan_distance(&self, other: &SlotCoord) -> u32 {
        self.bay.abs_diff(other.bay) + self.row.abs_diff(other.row) + self.tier.abs_diff(other.tier)
    }

    /// 槽位编号，如 B01R02T03
    pub fn slot_id(&self) -> String {
        format!("B{:02}R{:02}T{:02}", self.bay, self.row, self.tier)
    }
}

impl fmt::Display for SlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.bay, self.row, self.tier)
    }
}

// ==========================================
// Position - 船体坐标系下的槽位中心（米）
// ==========================================
// x: 纵向（自艏向艉）, y: 横向（中线为 0）, z: 垂向（自龙骨起算）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

// ==========================================
// SlotLayout - 几何函数的输出
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotLayout {
    pub position: Position,
    pub max_stack_weight_t: f64, // 本层及以上堆重许可（吨）
    pub max_tier_weight_t: f64,  // 单箱重量上限（吨）
    pub reefer_power: bool,      // 是否有冷藏箱电源
}

// ==========================================
// Slot - 槽位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub slot_id: String,
    pub coord: SlotCoord,
    pub position: Position,
    pub max_stack_weight_t: f64,
    pub max_tier_weight_t: f64,
    pub reefer_power: bool,
}

impl Slot {
    pub(crate) fn from_layout(coord: SlotCoord, layout: SlotLayout) -> Self {
        Self {
            slot_id: coord.slot_id(),
            coord,
            position: layout.position,
            max_stack_weight_t: layout.max_stack_weight_t,
            max_tier_weight_t: layout.max_tier_weight_t,
            reefer_power: layout.reefer_power,
        }
    }

    pub fn bay(&self) -> u32 {
        self.coord.bay
    }

    pub fn row(&self) -> u32 {
        self.coord.row
    }

    pub fn tier(&self) -> u32 {
        self.coord.tier
    }

    /// 垂向坐标（稳性计算用）
    pub fn z(&self) -> f64 {
        self.position.z
    }
}

// ==========================================
// Trait: SlotGeometry
// ==========================================
// 用途: 建船时为每个 (bay,row,tier) 生成几何与能力
// 实现者: StandardGeometry, 以及任意 Fn(SlotCoord) -> SlotLayout
pub trait SlotGeometry {
    /// 计算指定槽位的布局
    ///
    /// # 参数
    /// - coord: 槽位坐标（1 起始）
    /// - ordinal: 建船枚举序号（1 起始）
    fn layout(&self, coord: SlotCoord, ordinal: usize) -> SlotLayout;
}

impl<F> SlotGeometry for F
where
    F: Fn(SlotCoord) -> SlotLayout,
{
    fn layout(&self, coord: SlotCoord, _ordinal: usize) -> SlotLayout {
        self(coord)
    }
}

// ==========================================
// 冷藏电源布置 (Reefer Layout)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReeferLayout {
    /// 两舷最外侧排（row=1 与 row=rows）有电源
    OutboardRows,
    /// 建船序号能被 n 整除的槽位有电源
    EveryNthSlot(u32),
    /// 无冷藏电源
    None,
}

impl Default for ReeferLayout {
    fn default() -> Self {
        ReeferLayout::OutboardRows
    }
}

// ==========================================
// StandardGeometry - 标准支线船槽位布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardGeometry {
    pub beam_m: f64,           // 船宽
    pub rows: u32,             // 排数（用于判断外侧排）
    pub bay_length_m: f64,     // 每贝长度
    pub row_width_m: f64,      // 每排宽度
    pub tier_height_m: f64,    // 每层高度
    pub stack_base_t: f64,     // 第 1 层堆重许可
    pub stack_step_t: f64,     // 每升高一层堆重许可递减量
    pub max_tier_weight_t: f64, // 单箱重量上限
    pub reefer_layout: ReeferLayout,
}

impl StandardGeometry {
    pub const BAY_LENGTH_M: f64 = 12.5;
    pub const ROW_WIDTH_M: f64 = 2.44;
    pub const TIER_HEIGHT_M: f64 = 2.59;
    pub const STACK_BASE_T: f64 = 150.0;
    pub const STACK_STEP_T: f64 = 15.0;
    pub const MAX_TIER_WEIGHT_T: f64 = 30.0;

    /// 以标准参数创建
    pub fn new(beam_m: f64, rows: u32) -> Self {
        Self {
            beam_m,
            rows,
            bay_length_m: Self::BAY_LENGTH_M,
            row_width_m: Self::ROW_WIDTH_M,
            tier_height_m: Self::TIER_HEIGHT_M,
            stack_base_t: Self::STACK_BASE_T,
            stack_step_t: Self::STACK_STEP_T,
            max_tier_weight_t: Self::MAX_TIER_WEIGHT_T,
            reefer_layout: ReeferLayout::default(),
        }
    }

    pub fn with_reefer_layout(mut self, reefer_layout: ReeferLayout) -> Self {
        self.reefer_layout = reefer_layout;
        self
    }

    /// 堆重许可 = base - (tier-1) * step，不低于 0
    pub fn max_stack_weight_t(&self, tier: u32) -> f64 {
        (self.stack_base_t - f64::from(tier.saturating_sub(1)) * self.stack_step_t).max(0.0)
    }

    fn has_reefer_power(&self, coord: SlotCoord, ordinal: usize) -> bool {
        match self.reefer_layout {
            ReeferLayout::OutboardRows => coord.row == 1 || coord.row == self.rows,
            ReeferLayout::EveryNthSlot(0) => false,
            ReeferLayout::EveryNthSlot(n) => ordinal % n as usize == 0,
            ReeferLayout::None => false,
        }
    }
}

impl SlotGeometry for StandardGeometry {
    fn layout(&self, coord: SlotCoord, ordinal: usize) -> SlotLayout {
        let bay = f64::from(coord.bay.saturating_sub(1));
        let row = f64::from(coord.row.saturating_sub(1));
        let tier = f64::from(coord.tier.saturating_sub(1));

        SlotLayout {
            position: Position {
                x: bay * self.bay_length_m + self.bay_length_m / 2.0,
                y: -(self.beam_m / 2.0) + row * self.row_width_m + self.row_width_m / 2.0,
                z: tier * self.tier_height_m + self.tier_height_m / 2.0,
            },
            max_stack_weight_t: self.max_stack_weight_t(coord.tier),
            max_tier_weight_t: self.max_tier_weight_t,
            reefer_power: self.has_reefer_power(coord, ordinal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_order_is_bay_row_tier() {
        let mut coords = vec![
            SlotCoord::new(2, 1, 1),
            SlotCoord::new(1, 2, 1),
            SlotCoord::new(1, 1, 2),
            SlotCoord::new(1, 1, 1),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                SlotCoord::new(1, 1, 1),
                SlotCoord::new(1, 1, 2),
                SlotCoord::new(1, 2, 1),
                SlotCoord::new(2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_manhattan_distance() {
        let origin = SlotCoord::new(1, 1, 1);
        assert_eq!(origin.manhattan_distance(&SlotCoord::new(1, 1, 2)), 1);
        assert_eq!(origin.manhattan_distance(&SlotCoord::new(1, 2, 2)), 2);
        assert_eq!(origin.manhattan_distance(&SlotCoord::new(2, 3, 1)), 3);
        assert_eq!(SlotCoord::new(2, 3, 1).manhattan_distance(&origin), 3);
    }

    #[test]
    fn test_standard_layout_values() {
        let geometry = StandardGeometry::new(20.0, 14);
        let layout = geometry.layout(SlotCoord::new(1, 1, 1), 1);

        assert_eq!(layout.position.x, 6.25);
        assert!((layout.position.y - (-8.78)).abs() < 1e-9);
        assert_eq!(layout.position.z, 1.295);
        assert_eq!(layout.max_stack_weight_t, 150.0);
        assert_eq!(layout.max_tier_weight_t, 30.0);
        assert!(layout.reefer_power);

        let top = geometry.layout(SlotCoord::new(3, 3, 7), 200);
        assert_eq!(top.max_stack_weight_t, 60.0);
        assert!(!top.reefer_power);
        assert!((top.position.z - 16.835).abs() < 1e-9);
    }

    #[test]
    fn test_every_nth_reefer_layout() {
        let geometry =
            StandardGeometry::new(20.0, 14).with_reefer_layout(ReeferLayout::EveryNthSlot(7));
        assert!(!geometry.layout(SlotCoord::new(1, 1, 1), 1).reefer_power);
        assert!(geometry.layout(SlotCoord::new(1, 1, 7), 7).reefer_power);
        assert!(geometry.layout(SlotCoord::new(1, 2, 7), 14).reefer_power);
    }

    #[test]
    fn test_slot_id_format() {
        assert_eq!(SlotCoord::new(1, 12, 3).slot_id(), "B01R12T03");
    }
}
