// ==========================================
// 集装箱船配载引擎 - 配置层
// ==========================================
// 职责: 配载参数管理, 支持 JSON 加载与快照
// ==========================================

pub mod config_manager;
pub mod packer_config;
pub mod stowage_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use packer_config::PackerConfig;
pub use stowage_config_trait::StowageConfigReader;
