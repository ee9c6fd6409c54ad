// ==========================================
// 集装箱船配载引擎 - 配载 API
// ==========================================
// 职责: 对外配载入口、结果格式化、船舶概览、结果导出
// ==========================================

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::config::packer_config::PackerConfig;
use crate::config::stowage_config_trait::StowageConfigReader;
use crate::domain::container::Container;
use crate::domain::ship::{Ship, ShipSpec, ShipSummary};
use crate::domain::slot::Position;
use crate::engine::packer::{FailedContainer, Packer, PlacedContainer, PlacementMetrics, PlacementResult};
use crate::engine::stability::StabilityStatus;
use crate::engine::strategy::PackStrategy;

// ==========================================
// 响应 DTO
// ==========================================

/// 配载指标（展示口径: 比例保留 2 位, 稳性保留 3 位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    pub placement_rate: f64,
    pub placed_count: usize,
    pub total_count: usize,
    pub failed_count: usize,
    pub slot_utilization: f64,
    pub teu_loaded: u32,
    pub total_weight: f64,
    pub kg: f64,
    pub gm: f64,
    pub is_stable: bool,
    pub stability_margin: f64,
    pub cargo_distribution: BTreeMap<String, usize>,
}

impl From<&PlacementMetrics> for MetricsView {
    fn from(m: &PlacementMetrics) -> Self {
        Self {
            placement_rate: round_to(m.placement_rate, 2),
            placed_count: m.placed_containers,
            total_count: m.total_containers,
            failed_count: m.failed_containers,
            slot_utilization: round_to(m.slot_utilization, 2),
            teu_loaded: m.total_teu,
            total_weight: round_to(m.total_weight_t, 2),
            kg: round_to(m.kg_m, 3),
            gm: round_to(m.gm_m, 3),
            is_stable: m.is_stable,
            stability_margin: round_to(m.stability_margin_m, 3),
            cargo_distribution: m
                .cargo_distribution
                .iter()
                .map(|(kind, count)| (kind.as_str().to_string(), *count))
                .collect(),
        }
    }
}

/// 已配载箱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedContainerView {
    pub id: String,
    #[serde(rename = "type")]
    pub cargo_type: String,
    pub hazard_class: Option<String>,
    pub size: String,
    pub teu: u32,
    pub weight: f64,
    pub slot: String,
    pub bay: u32,
    pub row: u32,
    pub tier: u32,
    pub position: Position,
    pub predicted_gm: f64,
}

impl From<&PlacedContainer> for PlacedContainerView {
    fn from(p: &PlacedContainer) -> Self {
        let c = &p.container;
        Self {
            id: c.container_id.clone(),
            cargo_type: c.cargo_kind().as_str().to_string(),
            hazard_class: c.hazard_class().map(|h| h.to_string()),
            size: c.size.as_str().to_string(),
            teu: c.teu(),
            weight: c.total_weight_t,
            slot: p.slot.slot_id.clone(),
            bay: p.slot.bay,
            row: p.slot.row,
            tier: p.slot.tier,
            position: p.slot.position,
            predicted_gm: round_to(p.predicted_gm_m, 3),
        }
    }
}

/// 未配载箱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedContainerView {
    pub id: String,
    #[serde(rename = "type")]
    pub cargo_type: String,
    pub weight: f64,
    pub reason: String,
    pub rejections: BTreeMap<String, usize>,
}

impl From<&FailedContainer> for FailedContainerView {
    fn from(f: &FailedContainer) -> Self {
        Self {
            id: f.container.container_id.clone(),
            cargo_type: f.container.cargo_kind().as_str().to_string(),
            weight: f.container.total_weight_t,
            reason: f.reason.clone(),
            rejections: f.rejections.clone(),
        }
    }
}

/// 配载响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub plan_id: String,
    pub generated_at: DateTime<Utc>,
    pub ship_name: String,
    pub strategy: PackStrategy,
    pub success: bool,
    pub config_snapshot: String,
    pub metrics: MetricsView,
    pub placed_containers: Vec<PlacedContainerView>,
    pub failed_containers: Vec<FailedContainerView>,
}

impl OptimizeResponse {
    fn from_result(ship_name: &str, config_snapshot: String, result: &PlacementResult) -> Self {
        Self {
            plan_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            ship_name: ship_name.to_string(),
            strategy: result.strategy,
            success: result.success,
            config_snapshot,
            metrics: MetricsView::from(&result.metrics),
            placed_containers: result.placed.iter().map(PlacedContainerView::from).collect(),
            failed_containers: result.failed.iter().map(FailedContainerView::from).collect(),
        }
    }

    /// 序列化为 JSON（带缩进）
    pub fn to_json(&self) -> ApiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ApiError::InternalError(format!("响应序列化失败: {}", e)))
    }
}

/// 船舶概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipOverview {
    pub summary: ShipSummary,
    pub stability: StabilityStatus,
}

// ==========================================
// StowageApi - 配载 API
// ==========================================

/// 配载API
///
/// 职责：
/// 1. 按配置解析配载参数并执行配载
/// 2. 结果格式化（响应 DTO）
/// 3. 船舶概览
/// 4. 结果导出
pub struct StowageApi {
    config_manager: Arc<ConfigManager>,
}

impl StowageApi {
    /// 创建新的StowageApi实例
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 新建船舶并执行配载
    ///
    /// # 参数
    /// - spec: 建船参数
    /// - containers: 待配载集装箱
    /// - strategy: 策略名（None 时取配置的默认策略）
    pub fn optimize(
        &self,
        spec: ShipSpec,
        containers: Vec<Container>,
        strategy: Option<&str>,
    ) -> ApiResult<OptimizeResponse> {
        let mut ship = Ship::new(spec)?;
        self.optimize_on(&mut ship, containers, strategy)
    }

    /// 在已有船舶上执行配载（船舶状态会被修改）
    pub fn optimize_on(
        &self,
        ship: &mut Ship,
        containers: Vec<Container>,
        strategy: Option<&str>,
    ) -> ApiResult<OptimizeResponse> {
        let config = PackerConfig::resolve(self.config_manager.as_ref(), ship)?;
        let strategy = match strategy {
            Some(name) => name
                .parse::<PackStrategy>()
                .map_err(ApiError::InvalidInput)?,
            None => self.config_manager.get_default_strategy()?,
        };

        let packer = Packer::new(config);
        let result = packer.pack(ship, containers, strategy)?;
        let snapshot = self.config_manager.get_config_snapshot()?;
        let response = OptimizeResponse::from_result(ship.name(), snapshot, &result);

        info!(
            plan_id = %response.plan_id,
            ship = %response.ship_name,
            success = response.success,
            placed = response.metrics.placed_count,
            failed = response.metrics.failed_count,
            "配载方案已生成"
        );
        Ok(response)
    }

    /// 船舶概览（占用汇总 + 当前稳性）
    pub fn ship_overview(&self, ship: &Ship) -> ShipOverview {
        ShipOverview {
            summary: ship.summary(),
            stability: ship.current_stability(),
        }
    }

    /// 导出配载响应为 JSON 文件
    ///
    /// # 返回
    /// - Ok(PathBuf): 写入的文件路径
    pub fn export_json(
        &self,
        response: &OptimizeResponse,
        output_file: impl AsRef<Path>,
    ) -> ApiResult<PathBuf> {
        let path = output_file.as_ref().to_path_buf();
        let json = response.to_json()?;
        std::fs::write(&path, json)
            .map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// 按小数位四舍五入
fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
