// ==========================================
// 集装箱船配载引擎 - 核心错误类型
// ==========================================
// 职责: 配置错误、查询错误、槽位写入错误
// 红线: 约束检查结果（超重/无电源/危险品间距/稳性）不是错误,
//       以 ConstraintViolation 值返回,不得通过 Err 控制流程
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配载引擎错误类型
#[derive(Error, Debug)]
pub enum StowageError {
    // ===== 配置错误 =====
    #[error("无效配置: {0}")]
    InvalidConfiguration(String),

    // ===== 查询错误 =====
    #[error("槽位不存在: bay={bay}, row={row}, tier={tier}")]
    SlotNotFound { bay: u32, row: u32, tier: u32 },

    // ===== 槽位写入错误 =====
    #[error("槽位已被占用: slot={slot_id}, occupant={occupant}")]
    AlreadyOccupied { slot_id: String, occupant: String },

    #[error("集装箱已配载, 不允许重新绑定: container={container_id}, slot={slot_id}")]
    AlreadyPlaced {
        container_id: String,
        slot_id: String,
    },

    #[error("超出承重: container={container_id}, slot={slot_id}, {detail}")]
    CapacityExceeded {
        container_id: String,
        slot_id: String,
        detail: String,
    },

    // ===== 并发错误 =====
    #[error("船舶状态锁获取失败: {0}")]
    LockPoisoned(String),

    // ===== 外部数据错误 =====
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StowageError {
    /// 构造无效配置错误
    pub fn invalid(msg: impl Into<String>) -> Self {
        StowageError::InvalidConfiguration(msg.into())
    }

    /// 是否为调用方输入/配置问题（而非运行期状态冲突）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StowageError::InvalidConfiguration(_)
                | StowageError::SlotNotFound { .. }
                | StowageError::Json(_)
        )
    }
}

/// Result 类型别名
pub type StowageResult<T> = Result<T, StowageError>;
