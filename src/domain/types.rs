// ==========================================
// 集装箱船配载引擎 - 领域类型定义
// ==========================================
// 红线: 货类是封闭枚举,由编译器保证穷尽处理,
//       不得以字符串字段动态判断冷藏/危险品
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 箱型尺寸 (Size Class)
// ==========================================
// 20ft = 1 TEU, 40ft = 2 TEU
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerSize {
    #[serde(rename = "20ft")]
    Twenty,
    #[serde(rename = "40ft")]
    Forty,
}

impl ContainerSize {
    /// 标准箱折算数
    pub fn teu(&self) -> u32 {
        match self {
            ContainerSize::Twenty => 1,
            ContainerSize::Forty => 2,
        }
    }

    /// 默认空箱重量（吨）
    pub fn default_empty_weight_t(&self) -> f64 {
        match self {
            ContainerSize::Twenty => 2.3,
            ContainerSize::Forty => 3.75,
        }
    }

    /// 最大载货量（吨，不含箱皮）
    pub fn max_cargo_t(&self) -> f64 {
        match self {
            ContainerSize::Twenty => 21.7,
            ContainerSize::Forty => 26.25,
        }
    }

    /// 标准外形尺寸 (长, 宽, 高)，单位米
    pub fn standard_dimensions_m(&self) -> (f64, f64, f64) {
        match self {
            ContainerSize::Twenty => (6.06, 2.44, 2.59),
            ContainerSize::Forty => (12.03, 2.44, 2.59),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerSize::Twenty => "20ft",
            ContainerSize::Forty => "40ft",
        }
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContainerSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "20ft" | "20" => Ok(ContainerSize::Twenty),
            "40ft" | "40" => Ok(ContainerSize::Forty),
            other => Err(format!("未知箱型: {}", other)),
        }
    }
}

// ==========================================
// 危险品类别 (IMDG Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HazardClass {
    Class1, // 爆炸品
    Class2, // 气体
    Class3, // 易燃液体
    Class4, // 易燃固体
    Class5, // 氧化剂
    Class6, // 毒害品
    Class7, // 放射性物质
    Class8, // 腐蚀品
    Class9, // 杂类
}

impl HazardClass {
    /// 类别编号 (1-9)
    pub fn number(&self) -> u8 {
        match self {
            HazardClass::Class1 => 1,
            HazardClass::Class2 => 2,
            HazardClass::Class3 => 3,
            HazardClass::Class4 => 4,
            HazardClass::Class5 => 5,
            HazardClass::Class6 => 6,
            HazardClass::Class7 => 7,
            HazardClass::Class8 => 8,
            HazardClass::Class9 => 9,
        }
    }

    /// 从编号构造
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(HazardClass::Class1),
            2 => Some(HazardClass::Class2),
            3 => Some(HazardClass::Class3),
            4 => Some(HazardClass::Class4),
            5 => Some(HazardClass::Class5),
            6 => Some(HazardClass::Class6),
            7 => Some(HazardClass::Class7),
            8 => Some(HazardClass::Class8),
            9 => Some(HazardClass::Class9),
            _ => None,
        }
    }
}

impl fmt::Display for HazardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class_{}", self.number())
    }
}

impl FromStr for HazardClass {
    type Err = String;

    /// 支持 "Class_3" / "class3" / "3"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let digits = normalized
            .trim_start_matches("class")
            .trim_start_matches('_')
            .trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(HazardClass::from_number)
            .ok_or_else(|| format!("未知危险品类别: {}", s))
    }
}

// ==========================================
// 货类 (Cargo Category)
// ==========================================
// 危险品必须携带类别；普通/冷藏箱无类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CargoCategory {
    General,
    Reefer,
    Hazmat { class: HazardClass },
}

impl CargoCategory {
    /// 货类统计口径（不含危险品类别）
    pub fn kind(&self) -> CargoKind {
        match self {
            CargoCategory::General => CargoKind::General,
            CargoCategory::Reefer => CargoKind::Reefer,
            CargoCategory::Hazmat { .. } => CargoKind::Hazmat,
        }
    }

    pub fn hazard_class(&self) -> Option<HazardClass> {
        match self {
            CargoCategory::Hazmat { class } => Some(*class),
            CargoCategory::General | CargoCategory::Reefer => None,
        }
    }
}

impl fmt::Display for CargoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CargoCategory::General => write!(f, "general"),
            CargoCategory::Reefer => write!(f, "reefer"),
            CargoCategory::Hazmat { class } => write!(f, "hazmat({})", class),
        }
    }
}

// ==========================================
// 货类统计键 (Cargo Kind)
// ==========================================
// 用于直方图统计,有序以保证输出稳定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoKind {
    General,
    Reefer,
    Hazmat,
}

impl CargoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoKind::General => "general",
            CargoKind::Reefer => "reefer",
            CargoKind::Hazmat => "hazmat",
        }
    }
}

impl fmt::Display for CargoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 海况 (Sea State)
// ==========================================
// 海况越恶劣,所需初稳性高度越大
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeaState {
    Calm,     // 平静
    Moderate, // 中浪
    Rough,    // 大浪
}

impl SeaState {
    /// GM_min 放大系数
    pub fn gm_multiplier(&self) -> f64 {
        match self {
            SeaState::Calm => 1.0,
            SeaState::Moderate => 1.2,
            SeaState::Rough => 1.5,
        }
    }

    /// 该海况下所需 GM（米）
    pub fn required_gm(&self, gm_min_m: f64) -> f64 {
        gm_min_m * self.gm_multiplier()
    }
}

impl Default for SeaState {
    fn default() -> Self {
        SeaState::Calm
    }
}

impl fmt::Display for SeaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeaState::Calm => write!(f, "calm"),
            SeaState::Moderate => write!(f, "moderate"),
            SeaState::Rough => write!(f, "rough"),
        }
    }
}

impl FromStr for SeaState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(SeaState::Calm),
            "moderate" => Ok(SeaState::Moderate),
            "rough" => Ok(SeaState::Rough),
            other => Err(format!("未知海况: {}", other)),
        }
    }
}

// ==========================================
// 堆重校验口径 (Stack Weight Policy)
// ==========================================
// PerContainer: 仅以待放箱自身重量对比本层堆重许可
// CumulativeColumn: 对本列每个不高于候选层的层级,
//                   校验"该层及以上全部箱重 + 待放箱重"不超过该层许可
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackWeightPolicy {
    PerContainer,
    CumulativeColumn,
}

impl Default for StackWeightPolicy {
    fn default() -> Self {
        StackWeightPolicy::CumulativeColumn
    }
}

impl fmt::Display for StackWeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackWeightPolicy::PerContainer => write!(f, "per_container"),
            StackWeightPolicy::CumulativeColumn => write!(f, "cumulative_column"),
        }
    }
}

impl FromStr for StackWeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_container" => Ok(StackWeightPolicy::PerContainer),
            "cumulative_column" | "cumulative" => Ok(StackWeightPolicy::CumulativeColumn),
            other => Err(format!("未知堆重校验口径: {}", other)),
        }
    }
}
