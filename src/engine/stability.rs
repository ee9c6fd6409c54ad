// ==========================================
// 集装箱船配载引擎 - 稳性计算器
// ==========================================
// 职责: 由空船数据与已配载箱 (重量, 垂向坐标) 计算 KG / GM
// 红线: 无状态、无副作用; 对外 API 为全量重算,
//       配载热路径使用 LoadAccumulator 增量累加
// ==========================================
// 公式:
//   排水量 Δ  = 空船重量 + Σw
//   重心高 KG = (空船重量·KG_ls + Σ w·z) / Δ
//   初稳性高 GM = KB + BM - KG
//   稳定判定  GM ≥ GM_min, 余量 = GM - GM_min
// ==========================================

use crate::domain::ship::StabilityParams;
use serde::{Deserialize, Serialize};

// ==========================================
// LoadPoint - 单个载荷 (重量, 垂向坐标)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    pub weight_t: f64,
    pub z_m: f64,
}

impl LoadPoint {
    pub fn new(weight_t: f64, z_m: f64) -> Self {
        Self { weight_t, z_m }
    }
}

// ==========================================
// LoadAccumulator - 增量累加器 (Σw, Σw·z)
// ==========================================
// 累加顺序即配载顺序; 按相同顺序全量重算可得到逐位一致的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAccumulator {
    pub count: usize,
    pub total_weight_t: f64,
    pub moment_tm: f64,
}

impl LoadAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一个载荷
    pub fn add(&mut self, load: LoadPoint) {
        self.count += 1;
        self.total_weight_t += load.weight_t;
        self.moment_tm += load.weight_t * load.z_m;
    }

    /// 返回假设再加入一个载荷后的累加器（不修改自身）
    pub fn with(&self, load: LoadPoint) -> Self {
        let mut next = *self;
        next.add(load);
        next
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl FromIterator<LoadPoint> for LoadAccumulator {
    fn from_iter<I: IntoIterator<Item = LoadPoint>>(iter: I) -> Self {
        let mut acc = LoadAccumulator::new();
        for load in iter {
            acc.add(load);
        }
        acc
    }
}

// ==========================================
// StabilityStatus - 稳性快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityStatus {
    pub total_weight_t: f64,     // 排水量（空船 + 货）
    pub cargo_weight_t: f64,     // 货重合计
    pub kg_m: f64,               // 重心高度
    pub gm_m: f64,               // 初稳性高度
    pub gm_min_m: f64,           // 最小允许 GM
    pub is_stable: bool,         // GM ≥ GM_min
    pub stability_margin_m: f64, // GM - GM_min（可为负）
}

// ==========================================
// StabilityCalculator - 纯函数工具类
// ==========================================
pub struct StabilityCalculator;

impl StabilityCalculator {
    /// 全量计算稳性（对外 API）
    ///
    /// # 参数
    /// - params: 船舶稳性参考参数
    /// - loads: 已配载箱的 (重量, 垂向坐标)，顺序即累加顺序
    ///
    /// # 返回
    /// - StabilityStatus; 无载荷时 KG 精确等于空船 KG
    pub fn calculate<I>(params: &StabilityParams, loads: I) -> StabilityStatus
    where
        I: IntoIterator<Item = LoadPoint>,
    {
        let acc: LoadAccumulator = loads.into_iter().collect();
        Self::from_accumulator(params, &acc)
    }

    /// 由累加器计算稳性
    pub fn from_accumulator(params: &StabilityParams, acc: &LoadAccumulator) -> StabilityStatus {
        let total_weight_t = params.lightship_weight_t + acc.total_weight_t;
        let kg_m = Self::kg(params, acc);
        let gm_m = Self::gm_from_kg(params, kg_m);

        StabilityStatus {
            total_weight_t,
            cargo_weight_t: acc.total_weight_t,
            kg_m,
            gm_m,
            gm_min_m: params.gm_min_m,
            is_stable: gm_m >= params.gm_min_m,
            stability_margin_m: gm_m - params.gm_min_m,
        }
    }

    /// 预测: 假设在当前累加器基础上再加入一个载荷
    ///
    /// 热路径使用, O(1)
    pub fn project(
        params: &StabilityParams,
        acc: &LoadAccumulator,
        candidate: LoadPoint,
    ) -> StabilityStatus {
        Self::from_accumulator(params, &acc.with(candidate))
    }

    /// 重心高度 KG
    pub fn kg(params: &StabilityParams, acc: &LoadAccumulator) -> f64 {
        if acc.is_empty() {
            return params.lightship_kg_m;
        }
        let moment = params.lightship_weight_t * params.lightship_kg_m + acc.moment_tm;
        moment / (params.lightship_weight_t + acc.total_weight_t)
    }

    /// GM = KB + BM - KG
    pub fn gm_from_kg(params: &StabilityParams, kg_m: f64) -> f64 {
        params.kb_m + params.bm_m - kg_m
    }
}
