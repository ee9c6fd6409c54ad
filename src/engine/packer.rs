// ==========================================
// 集装箱船配载引擎 - 贪心配载器
// ==========================================
// 职责: 按策略排序后逐箱扫描空槽位, 放入首个满足全部约束的槽位
// 输入: 船舶 + 集装箱列表 + 策略
// 输出: PlacementResult (成功标志 / 指标 / 已配载 / 未配载及原因)
// 红线: 单箱失败不终止本次配载; 每个输入箱在结果中出现且仅出现一次;
//       不回溯, 不重试
// ==========================================

use crate::config::packer_config::PackerConfig;
use crate::domain::container::Container;
use crate::domain::ship::{percentage, Ship, ShipHandle};
use crate::domain::slot::{Position, Slot, SlotCoord};
use crate::domain::types::CargoKind;
use crate::engine::constraint::{CheckOutcome, ConstraintChecker};
use crate::engine::priority::ContainerSorter;
use crate::engine::strategy::PackStrategy;
use crate::error::{StowageError, StowageResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, instrument, warn};

// ==========================================
// 结果类型
// ==========================================

/// 槽位分配（已解析的槽位信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot_id: String,
    pub bay: u32,
    pub row: u32,
    pub tier: u32,
    pub position: Position,
}

impl From<&Slot> for SlotAssignment {
    fn from(slot: &Slot) -> Self {
        Self {
            slot_id: slot.slot_id.clone(),
            bay: slot.bay(),
            row: slot.row(),
            tier: slot.tier(),
            position: slot.position,
        }
    }
}

/// 已配载箱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedContainer {
    pub sequence_no: usize, // 本次配载内的放入顺序（1 起始）
    pub container: Container,
    pub slot: SlotAssignment,
    pub predicted_gm_m: f64, // 放入时预测的 GM
}

/// 未配载箱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedContainer {
    pub container: Container,
    pub reason: String,
    pub rejections: BTreeMap<String, usize>, // 违规代码 → 被拒槽位数
}

/// 配载指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementMetrics {
    pub total_containers: usize,
    pub placed_containers: usize,
    pub failed_containers: usize,
    pub placement_rate: f64, // 配载率（%）
    pub total_teu: u32,      // 本次已配载 TEU
    pub total_weight_t: f64, // 本次已配载箱总重
    pub displacement_t: f64, // 配载后排水量
    pub slot_utilization: f64, // 全船槽位利用率（%）
    pub kg_m: f64,
    pub gm_m: f64,
    pub is_stable: bool,
    pub stability_margin_m: f64,
    pub cargo_distribution: BTreeMap<CargoKind, usize>,
}

/// 配载结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// 全部配载且最终稳性满足
    pub success: bool,
    pub strategy: PackStrategy,
    pub metrics: PlacementMetrics,
    pub placed: Vec<PlacedContainer>,
    pub failed: Vec<FailedContainer>,
}

impl PlacementResult {
    /// 最后一次放入时的预测 GM
    pub fn last_predicted_gm(&self) -> Option<f64> {
        self.placed.last().map(|p| p.predicted_gm_m)
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed
            .iter()
            .map(|f| f.container.container_id.as_str())
            .collect()
    }

    pub fn placed_slot_of(&self, container_id: &str) -> Option<&SlotAssignment> {
        self.placed
            .iter()
            .find(|p| p.container.container_id == container_id)
            .map(|p| &p.slot)
    }
}

/// 单箱处理结果
enum StowOutcome {
    Placed(PlacedContainer),
    Failed(FailedContainer),
}

// ==========================================
// Packer - 贪心配载器
// ==========================================
pub struct Packer {
    config: PackerConfig,
    checker: ConstraintChecker,
    sorter: ContainerSorter,
}

impl Packer {
    /// 构造函数
    pub fn new(config: PackerConfig) -> Self {
        let checker = config.checker();
        Self {
            config,
            checker,
            sorter: ContainerSorter::new(),
        }
    }

    /// 以船舶默认参数构造
    pub fn for_ship(ship: &Ship) -> Self {
        Self::new(PackerConfig::for_ship(ship))
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    pub fn checker(&self) -> &ConstraintChecker {
        &self.checker
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行配载
    ///
    /// 流程:
    /// 1) 按策略排序
    /// 2) 逐箱按 (bay,row,tier) 升序扫描空槽位, 取首个通过 check_all 的槽位
    /// 3) 写入船舶, 记录预测 GM
    /// 4) 无可用槽位则记入失败集合
    /// 5) 计算最终指标
    ///
    /// # 参数
    /// - `ship`: 船舶（会被修改）
    /// - `containers`: 待配载集装箱
    /// - `strategy`: 配载策略
    ///
    /// # 错误
    /// - InvalidConfiguration: 同一批次箱号重复
    #[instrument(skip(self, ship, containers), fields(
        ship = %ship.name(),
        containers_count = containers.len(),
        strategy = %strategy
    ))]
    pub fn pack(
        &self,
        ship: &mut Ship,
        containers: Vec<Container>,
        strategy: PackStrategy,
    ) -> StowageResult<PlacementResult> {
        let total = containers.len();
        let ordered = self.prepare(containers, strategy)?;

        let mut placed = Vec::new();
        let mut failed = Vec::new();
        for container in ordered {
            match self.stow_one(ship, container, placed.len() + 1)? {
                StowOutcome::Placed(p) => placed.push(p),
                StowOutcome::Failed(f) => failed.push(f),
            }
        }

        Ok(self.finish(ship, strategy, total, placed, failed))
    }

    /// 按策略名执行配载
    ///
    /// # 错误
    /// - InvalidConfiguration: 未知策略名
    pub fn pack_named(
        &self,
        ship: &mut Ship,
        containers: Vec<Container>,
        strategy_name: &str,
    ) -> StowageResult<PlacementResult> {
        let strategy = strategy_name
            .parse::<PackStrategy>()
            .map_err(StowageError::InvalidConfiguration)?;
        self.pack(ship, containers, strategy)
    }

    /// 以配置的默认策略执行配载
    pub fn pack_default(
        &self,
        ship: &mut Ship,
        containers: Vec<Container>,
    ) -> StowageResult<PlacementResult> {
        self.pack(ship, containers, self.config.default_strategy)
    }

    /// 对共享船舶执行配载
    ///
    /// 每个箱的"扫描 + 写入"在同一次加锁内完成
    #[instrument(skip(self, handle, containers), fields(
        containers_count = containers.len(),
        strategy = %strategy
    ))]
    pub fn pack_shared(
        &self,
        handle: &ShipHandle,
        containers: Vec<Container>,
        strategy: PackStrategy,
    ) -> StowageResult<PlacementResult> {
        let total = containers.len();
        let ordered = self.prepare(containers, strategy)?;

        let mut placed = Vec::new();
        let mut failed = Vec::new();
        for container in ordered {
            let mut ship = handle.lock()?;
            match self.stow_one(&mut ship, container, placed.len() + 1)? {
                StowOutcome::Placed(p) => placed.push(p),
                StowOutcome::Failed(f) => failed.push(f),
            }
        }

        let ship = handle.lock()?;
        Ok(self.finish(&ship, strategy, total, placed, failed))
    }

    // ==========================================
    // 内部步骤
    // ==========================================

    /// 校验批次并排序
    fn prepare(
        &self,
        containers: Vec<Container>,
        strategy: PackStrategy,
    ) -> StowageResult<Vec<Container>> {
        {
            let mut seen = HashSet::with_capacity(containers.len());
            for container in &containers {
                if !seen.insert(container.container_id.as_str()) {
                    return Err(StowageError::invalid(format!(
                        "同一批次箱号重复: {}",
                        container.container_id
                    )));
                }
            }
        }
        Ok(self.sorter.sort(containers, strategy))
    }

    /// 处理单个集装箱（扫描 + 写入为一个逻辑单元）
    fn stow_one(
        &self,
        ship: &mut Ship,
        container: Container,
        sequence_no: usize,
    ) -> StowageResult<StowOutcome> {
        if let Some(slot) = ship.slot_of(&container.container_id) {
            let reason = format!("ALREADY_PLACED: 已在 {}", slot.slot_id);
            warn!(container_id = %container.container_id, %reason, "集装箱未配载");
            return Ok(StowOutcome::Failed(FailedContainer {
                container,
                reason,
                rejections: BTreeMap::new(),
            }));
        }

        let mut rejections: BTreeMap<String, usize> = BTreeMap::new();
        let mut scanned = 0usize;
        let mut chosen: Option<(SlotCoord, f64)> = None;

        for slot in ship.available_slots() {
            scanned += 1;
            match self.checker.check_all(ship, &container, slot) {
                CheckOutcome::Pass(_) => {
                    let predicted_gm = ConstraintChecker::predict_gm(ship, &container, slot);
                    chosen = Some((slot.coord, predicted_gm));
                    break;
                }
                CheckOutcome::Reject(violation) => {
                    *rejections.entry(violation.code().to_string()).or_insert(0) += 1;
                }
            }
        }

        let (coord, predicted_gm_m) = match chosen {
            Some(found) => found,
            None => {
                let reason = failure_reason(scanned, &rejections);
                warn!(container_id = %container.container_id, %reason, "集装箱未配载");
                return Ok(StowOutcome::Failed(FailedContainer {
                    container,
                    reason,
                    rejections,
                }));
            }
        };

        let slot = SlotAssignment::from(ship.place(&container, coord)?);
        debug!(
            container_id = %container.container_id,
            slot_id = %slot.slot_id,
            predicted_gm_m,
            scanned,
            "集装箱已配载"
        );

        Ok(StowOutcome::Placed(PlacedContainer {
            sequence_no,
            container,
            slot,
            predicted_gm_m,
        }))
    }

    /// 汇总最终指标
    fn finish(
        &self,
        ship: &Ship,
        strategy: PackStrategy,
        total: usize,
        placed: Vec<PlacedContainer>,
        failed: Vec<FailedContainer>,
    ) -> PlacementResult {
        let stability = ship.current_stability();

        let mut cargo_distribution = BTreeMap::new();
        let mut total_teu = 0;
        let mut total_weight_t = 0.0;
        for p in &placed {
            *cargo_distribution.entry(p.container.cargo_kind()).or_insert(0) += 1;
            total_teu += p.container.teu();
            total_weight_t += p.container.total_weight_t;
        }

        let metrics = PlacementMetrics {
            total_containers: total,
            placed_containers: placed.len(),
            failed_containers: failed.len(),
            placement_rate: percentage(placed.len(), total),
            total_teu,
            total_weight_t,
            displacement_t: stability.total_weight_t,
            slot_utilization: percentage(ship.occupied_slots(), ship.total_slots()),
            kg_m: stability.kg_m,
            gm_m: stability.gm_m,
            is_stable: stability.is_stable,
            stability_margin_m: stability.stability_margin_m,
            cargo_distribution,
        };
        let success = failed.is_empty() && stability.is_stable;

        info!(
            ship = %ship.name(),
            strategy = %strategy,
            placed = metrics.placed_containers,
            failed = metrics.failed_containers,
            placement_rate = metrics.placement_rate,
            gm_m = metrics.gm_m,
            is_stable = metrics.is_stable,
            success,
            "配载完成"
        );

        PlacementResult {
            success,
            strategy,
            metrics,
            placed,
            failed,
        }
    }
}

/// 失败原因: 无空槽位, 或按违规代码汇总被拒次数
fn failure_reason(scanned: usize, rejections: &BTreeMap<String, usize>) -> String {
    if scanned == 0 {
        return "NO_AVAILABLE_SLOT: 船上无空槽位".to_string();
    }
    let tally: Vec<String> = rejections
        .iter()
        .map(|(code, count)| format!("{}={}", code, count))
        .collect();
    format!("NO_ADMISSIBLE_SLOT: scanned={}, {}", scanned, tally.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::Dimensions;
    use crate::domain::ship::ShipSpec;
    use crate::domain::types::{CargoCategory, ContainerSize};

    fn container(id: &str, cargo: CargoCategory, weight: f64) -> Container {
        Container::new(
            id,
            ContainerSize::Twenty,
            cargo,
            weight,
            Dimensions::standard(ContainerSize::Twenty),
        )
        .unwrap()
    }

    fn small_ship(bays: u32, rows: u32, tiers: u32) -> Ship {
        let mut spec = ShipSpec::feeder_reference();
        spec.name = "TEST_SHIP".to_string();
        spec.extents.bays = bays;
        spec.extents.rows = rows;
        spec.extents.tiers = tiers;
        Ship::new(spec).unwrap()
    }

    #[test]
    fn test_failure_reason_format() {
        let mut tally = BTreeMap::new();
        tally.insert("POWER_UNAVAILABLE".to_string(), 2);
        tally.insert("CAPACITY_EXCEEDED".to_string(), 1);
        assert_eq!(
            failure_reason(3, &tally),
            "NO_ADMISSIBLE_SLOT: scanned=3, CAPACITY_EXCEEDED=1, POWER_UNAVAILABLE=2"
        );
        assert!(failure_reason(0, &BTreeMap::new()).starts_with("NO_AVAILABLE_SLOT"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut ship = small_ship(1, 1, 3);
        let packer = Packer::for_ship(&ship);
        let err = packer
            .pack(
                &mut ship,
                vec![
                    container("DUP", CargoCategory::General, 10.0),
                    container("DUP", CargoCategory::General, 12.0),
                ],
                PackStrategy::HeavyFirst,
            )
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(ship.occupied_slots(), 0);
    }

    #[test]
    fn test_full_ship_reports_no_available_slot() {
        let mut ship = small_ship(1, 1, 1);
        let packer = Packer::for_ship(&ship);
        let result = packer
            .pack(
                &mut ship,
                vec![
                    container("A", CargoCategory::General, 10.0),
                    container("B", CargoCategory::General, 9.0),
                ],
                PackStrategy::HeavyFirst,
            )
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.failed_ids(), vec!["B"]);
        assert!(result.failed[0].reason.starts_with("NO_AVAILABLE_SLOT"));
    }

    #[test]
    fn test_already_placed_reported_as_failed() {
        let mut ship = small_ship(1, 1, 3);
        let packer = Packer::for_ship(&ship);
        let first = container("A", CargoCategory::General, 10.0);
        packer
            .pack(&mut ship, vec![first.clone()], PackStrategy::HeavyFirst)
            .unwrap();

        let result = packer
            .pack(&mut ship, vec![first], PackStrategy::HeavyFirst)
            .unwrap();
        assert_eq!(result.metrics.failed_containers, 1);
        assert!(result.failed[0].reason.starts_with("ALREADY_PLACED"));
        assert_eq!(ship.occupied_slots(), 1);
    }

    #[test]
    fn test_unknown_strategy_name() {
        let mut ship = small_ship(1, 1, 1);
        let packer = Packer::for_ship(&ship);
        let err = packer.pack_named(&mut ship, Vec::new(), "lightest_first");
        assert!(matches!(err, Err(StowageError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_batch() {
        let mut ship = small_ship(1, 1, 1);
        let packer = Packer::for_ship(&ship);
        let result = packer.pack_default(&mut ship, Vec::new()).unwrap();

        assert!(result.success);
        assert_eq!(result.metrics.total_containers, 0);
        assert_eq!(result.metrics.placement_rate, 0.0);
        assert_eq!(result.metrics.kg_m, ship.stability_params().lightship_kg_m);
    }
}
