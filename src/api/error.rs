// ==========================================
// 集装箱船配载引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将引擎错误转换为调用方可理解的错误消息
// ==========================================

use crate::error::StowageError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 配载规则错误
    // ==========================================
    #[error("配载规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("并发访问失败: {0}")]
    ConcurrencyError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("结果导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 StowageError 转换
// ==========================================
impl From<StowageError> for ApiError {
    fn from(err: StowageError) -> Self {
        match err {
            StowageError::InvalidConfiguration(msg) => ApiError::InvalidInput(msg),
            StowageError::SlotNotFound { bay, row, tier } => ApiError::NotFound(format!(
                "槽位(bay={}, row={}, tier={})不存在",
                bay, row, tier
            )),
            StowageError::AlreadyOccupied { slot_id, occupant } => ApiError::BusinessRuleViolation(
                format!("槽位{}已被{}占用", slot_id, occupant),
            ),
            StowageError::AlreadyPlaced {
                container_id,
                slot_id,
            } => ApiError::BusinessRuleViolation(format!(
                "集装箱{}已配载于{}",
                container_id, slot_id
            )),
            StowageError::CapacityExceeded {
                container_id,
                slot_id,
                detail,
            } => ApiError::BusinessRuleViolation(format!(
                "集装箱{}放入{}超出承重: {}",
                container_id, slot_id, detail
            )),
            StowageError::LockPoisoned(msg) => ApiError::ConcurrencyError(msg),
            StowageError::Json(e) => ApiError::InvalidInput(format!("JSON 格式错误: {}", e)),
            StowageError::Io(e) => ApiError::ExportError(e.to_string()),
            StowageError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
