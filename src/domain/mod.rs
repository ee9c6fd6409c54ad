// ==========================================
// 集装箱船配载引擎 - 领域模型层
// ==========================================
// 职责: 定义集装箱、槽位、船舶与基础类型
// 红线: 不含约束判定逻辑; 船舶是槽位占用的唯一事实来源
// ==========================================

pub mod container;
pub mod ship;
pub mod slot;
pub mod types;

// 重导出核心类型
pub use container::{Container, Dimensions, DEFAULT_LOADING_PRIORITY, MAX_LOADING_PRIORITY};
pub use ship::{
    GridExtents, PlacedCargo, Ship, ShipDimensions, ShipHandle, ShipSpec, ShipSummary,
    StabilityParams,
};
pub use slot::{
    Position, ReeferLayout, Slot, SlotCoord, SlotGeometry, SlotLayout, StandardGeometry,
};
pub use types::{
    CargoCategory, CargoKind, ContainerSize, HazardClass, SeaState, StackWeightPolicy,
};
