// ==========================================
// 集装箱船配载引擎 - 配载配置读取 Trait
// ==========================================
// 职责: 定义配载引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{SeaState, StackWeightPolicy};
use crate::engine::strategy::PackStrategy;
use crate::error::StowageResult;

// ==========================================
// StowageConfigReader Trait
// ==========================================
// 用途: 配载引擎参数读取接口
// 实现者: ConfigManager
pub trait StowageConfigReader: Send + Sync {
    // ===== 约束参数 =====

    /// 获取危险品最小间距（网格曼哈顿距离）
    ///
    /// # 默认值
    /// - 3
    fn get_hazmat_separation(&self) -> StowageResult<u32>;

    /// 获取稳性预测阈值（米）
    ///
    /// # 返回
    /// - Some(f64): 显式阈值
    /// - None: 未配置, 由船舶 GM_min × 海况系数推导
    fn get_gm_threshold(&self) -> StowageResult<Option<f64>>;

    /// 获取堆重校验口径
    ///
    /// # 默认值
    /// - CumulativeColumn
    fn get_stack_weight_policy(&self) -> StowageResult<StackWeightPolicy>;

    // ===== 航行条件 =====

    /// 获取海况
    ///
    /// # 默认值
    /// - Calm
    fn get_sea_state(&self) -> StowageResult<SeaState>;

    // ===== 策略 =====

    /// 获取默认配载策略
    ///
    /// # 默认值
    /// - heavy_first
    fn get_default_strategy(&self) -> StowageResult<PackStrategy>;
}
