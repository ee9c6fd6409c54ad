// ==========================================
// 集装箱船配载引擎 - 引擎层
// ==========================================
// 职责: 稳性计算、约束检查、装箱排序、贪心配载
// 红线: 所有约束判定必须输出 reason
// ==========================================

pub mod constraint;
pub mod packer;
pub mod priority;
pub mod stability;
pub mod strategy;

// 重导出核心引擎
pub use constraint::{
    CheckOutcome, ConstraintChecker, ConstraintKind, ConstraintViolation,
    DEFAULT_HAZMAT_SEPARATION,
};
pub use packer::{
    FailedContainer, Packer, PlacedContainer, PlacementMetrics, PlacementResult, SlotAssignment,
};
pub use priority::ContainerSorter;
pub use stability::{LoadAccumulator, LoadPoint, StabilityCalculator, StabilityStatus};
pub use strategy::PackStrategy;
