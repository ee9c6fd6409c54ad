// ==========================================
// 集装箱船配载引擎 - API 层
// ==========================================
// 职责: 提供配载 API 接口, 供上层调用方使用
// ==========================================

pub mod error;
pub mod stowage_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use stowage_api::{
    FailedContainerView, MetricsView, OptimizeResponse, PlacedContainerView, ShipOverview,
    StowageApi,
};
