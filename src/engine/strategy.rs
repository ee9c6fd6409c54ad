// ==========================================
// 集装箱船配载引擎 - 配载策略定义
// ==========================================
// 用途：
// - 决定待配载集装箱的处理顺序；
// - 同一输入 + 同一策略，结果必须可复现。

use serde::{Deserialize, Serialize};

/// 配载策略（决定装箱顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackStrategy {
    /// 总重降序，同重按箱号升序
    HeavyFirst,
    /// 装船优先级升序，同优先级按 HeavyFirst
    PriorityFirst,
}

impl PackStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackStrategy::HeavyFirst => "heavy_first",
            PackStrategy::PriorityFirst => "priority_first",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            PackStrategy::HeavyFirst => "重箱优先",
            PackStrategy::PriorityFirst => "优先级优先",
        }
    }
}

impl Default for PackStrategy {
    fn default() -> Self {
        PackStrategy::HeavyFirst
    }
}

impl std::fmt::Display for PackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heavy_first" | "heavy-first" => Ok(PackStrategy::HeavyFirst),
            "priority_first" | "priority-first" => Ok(PackStrategy::PriorityFirst),
            other => Err(format!("未知配载策略: {}", other)),
        }
    }
}
