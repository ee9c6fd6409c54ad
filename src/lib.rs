// ==========================================
// 集装箱船配载引擎 - 核心库
// ==========================================
// 系统定位: 单船配载规划 (槽位网格 + 约束检查 + 稳性 + 贪心配载)
// 执行模型: 同步、单线程引擎; 共享船舶经 ShipHandle 串行化写入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 集装箱、槽位、船舶
pub mod domain;

// 引擎层 - 稳性、约束、配载
pub mod engine;

// 配置层 - 配载参数
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CargoCategory, CargoKind, ContainerSize, HazardClass, SeaState, StackWeightPolicy,
};

// 领域实体
pub use domain::{Container, Ship, ShipHandle, ShipSpec, Slot, SlotCoord};

// 引擎
pub use engine::{
    ConstraintChecker, PackStrategy, Packer, PlacementResult, StabilityCalculator,
    StabilityStatus,
};

// 配置
pub use config::{ConfigManager, PackerConfig};

// 错误
pub use error::{StowageError, StowageResult};

// API
pub use api::{OptimizeResponse, StowageApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "集装箱船配载规划引擎";
