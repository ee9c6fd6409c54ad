// ==========================================
// 集装箱船配载引擎 - 船舶与槽位网格
// ==========================================
// 职责: 建船(枚举槽位)、槽位查询、配载写入、稳性快照、占用汇总
// 红线: Ship 独占全部槽位; 对集装箱只持有轻量快照(slot → container_id),
//       不持有集装箱本身; 占用、索引、稳性累加器必须同时更新
// ==========================================

use crate::domain::container::Container;
use crate::domain::slot::{Slot, SlotCoord, SlotGeometry, StandardGeometry};
use crate::domain::types::CargoKind;
use crate::engine::stability::{LoadAccumulator, LoadPoint, StabilityCalculator, StabilityStatus};
use crate::error::{StowageError, StowageResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

// ==========================================
// StabilityParams - 稳性参考参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityParams {
    pub lightship_weight_t: f64, // 空船重量（吨）
    pub lightship_kg_m: f64,     // 空船重心高度（米）
    pub kb_m: f64,               // 浮心高度（米）
    pub bm_m: f64,               // 横稳心半径（米）
    pub gm_min_m: f64,           // 最小允许 GM（米）
}

impl StabilityParams {
    /// 校验参数一致性
    pub fn validate(&self) -> StowageResult<()> {
        let all_finite = [
            self.lightship_weight_t,
            self.lightship_kg_m,
            self.kb_m,
            self.bm_m,
            self.gm_min_m,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(StowageError::invalid(format!("稳性参数含非有限值: {:?}", self)));
        }
        if self.lightship_weight_t <= 0.0 {
            return Err(StowageError::invalid(format!(
                "空船重量必须为正: {}",
                self.lightship_weight_t
            )));
        }
        if self.lightship_kg_m < 0.0 || self.kb_m <= 0.0 || self.bm_m < 0.0 {
            return Err(StowageError::invalid(format!(
                "KG/KB/BM 非法: kg={}, kb={}, bm={}",
                self.lightship_kg_m, self.kb_m, self.bm_m
            )));
        }
        if self.gm_min_m <= 0.0 {
            return Err(StowageError::invalid(format!(
                "GM_min 必须为正: {}",
                self.gm_min_m
            )));
        }
        Ok(())
    }
}

// ==========================================
// ShipDimensions / GridExtents
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipDimensions {
    pub length_m: f64,
    pub beam_m: f64,
    pub depth_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtents {
    pub bays: u32,
    pub rows: u32,
    pub tiers: u32,
}

impl GridExtents {
    pub fn slot_count(&self) -> usize {
        self.bays as usize * self.rows as usize * self.tiers as usize
    }

    pub fn contains(&self, coord: SlotCoord) -> bool {
        (1..=self.bays).contains(&coord.bay)
            && (1..=self.rows).contains(&coord.row)
            && (1..=self.tiers).contains(&coord.tier)
    }

    /// 坐标 → 建船枚举下标（0 起始）
    fn index_of(&self, coord: SlotCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let bay = (coord.bay - 1) as usize;
        let row = (coord.row - 1) as usize;
        let tier = (coord.tier - 1) as usize;
        Some((bay * self.rows as usize + row) * self.tiers as usize + tier)
    }
}

// ==========================================
// ShipSpec - 建船参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    pub dimensions: ShipDimensions,
    pub extents: GridExtents,
    pub stability: StabilityParams,
    pub max_weight_t: f64, // 最大允许载货总重（载重吨）
}

impl ShipSpec {
    /// 参考支线船 FEEDER_01
    ///
    /// 130m × 20m × 18m, 7 贝 × 14 排 × 7 层, 载重 13500 吨
    pub fn feeder_reference() -> Self {
        Self {
            name: "FEEDER_01".to_string(),
            dimensions: ShipDimensions {
                length_m: 130.0,
                beam_m: 20.0,
                depth_m: 18.0,
            },
            extents: GridExtents {
                bays: 7,
                rows: 14,
                tiers: 7,
            },
            stability: StabilityParams {
                lightship_weight_t: 3500.0,
                lightship_kg_m: 6.5,
                kb_m: 4.2,
                bm_m: 4.5,
                gm_min_m: 0.3,
            },
            max_weight_t: 13500.0,
        }
    }

    /// 校验建船参数
    pub fn validate(&self) -> StowageResult<()> {
        if self.name.trim().is_empty() {
            return Err(StowageError::invalid("船名不能为空"));
        }
        let ext = &self.extents;
        if ext.bays == 0 || ext.rows == 0 || ext.tiers == 0 {
            return Err(StowageError::invalid(format!(
                "网格尺寸必须为正: bays={}, rows={}, tiers={}",
                ext.bays, ext.rows, ext.tiers
            )));
        }
        let dims = &self.dimensions;
        let dims_valid = [dims.length_m, dims.beam_m, dims.depth_m]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !dims_valid {
            return Err(StowageError::invalid(format!("主尺度非法: {:?}", dims)));
        }
        if !self.max_weight_t.is_finite() || self.max_weight_t <= 0.0 {
            return Err(StowageError::invalid(format!(
                "载重吨必须为正: {}",
                self.max_weight_t
            )));
        }
        self.stability.validate()
    }

    /// 本船的标准槽位几何
    pub fn standard_geometry(&self) -> StandardGeometry {
        StandardGeometry::new(self.dimensions.beam_m, self.extents.rows)
    }
}

// ==========================================
// PlacedCargo - 槽位内集装箱快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCargo {
    pub container_id: String,
    pub cargo: CargoKind,
    pub weight_t: f64,
    pub teu: u32,
}

// ==========================================
// ShipSummary - 占用汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSummary {
    pub ship_name: String,
    pub total_slots: usize,
    pub occupied_slots: usize,
    pub available_slots: usize,
    pub utilization_pct: f64,
    pub total_teu: u32,
    pub cargo_weight_t: f64,
    pub containers_by_category: BTreeMap<CargoKind, usize>,
}

// ==========================================
// Ship - 船舶
// ==========================================
#[derive(Debug, Clone)]
pub struct Ship {
    spec: ShipSpec,
    slots: Vec<Slot>,

    // ===== 占用状态（唯一事实: slot → container）=====
    occupants: Vec<Option<PlacedCargo>>,

    // ===== 派生索引（与占用同步更新）=====
    container_index: HashMap<String, usize>,
    placement_order: Vec<usize>,
    hazmat_coords: Vec<SlotCoord>,
    load: LoadAccumulator,
}

impl Ship {
    /// 建船
    ///
    /// 按 (bay, row, tier) 升序枚举全部槽位，每个坐标生成一个槽位
    ///
    /// # 参数
    /// - spec: 建船参数
    /// - geometry: 槽位几何函数
    ///
    /// # 错误
    /// - InvalidConfiguration: 网格尺寸非正、稳性参数不一致等
    pub fn build<G>(spec: ShipSpec, geometry: &G) -> StowageResult<Self>
    where
        G: SlotGeometry + ?Sized,
    {
        spec.validate()?;

        let ext = spec.extents;
        let mut slots = Vec::with_capacity(ext.slot_count());
        for bay in 1..=ext.bays {
            for row in 1..=ext.rows {
                for tier in 1..=ext.tiers {
                    let coord = SlotCoord::new(bay, row, tier);
                    let layout = geometry.layout(coord, slots.len() + 1);
                    slots.push(Slot::from_layout(coord, layout));
                }
            }
        }

        let occupants = vec![None; slots.len()];
        Ok(Self {
            spec,
            slots,
            occupants,
            container_index: HashMap::new(),
            placement_order: Vec::new(),
            hazmat_coords: Vec::new(),
            load: LoadAccumulator::new(),
        })
    }

    /// 以标准几何建船
    pub fn new(spec: ShipSpec) -> StowageResult<Self> {
        let geometry = spec.standard_geometry();
        Self::build(spec, &geometry)
    }

    // ==========================================
    // 只读属性
    // ==========================================

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ShipSpec {
        &self.spec
    }

    pub fn extents(&self) -> GridExtents {
        self.spec.extents
    }

    pub fn stability_params(&self) -> &StabilityParams {
        &self.spec.stability
    }

    pub fn max_weight_t(&self) -> f64 {
        self.spec.max_weight_t
    }

    /// 全部槽位（建船顺序）
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied_slots(&self) -> usize {
        self.placement_order.len()
    }

    /// 运行累加器（Σw, Σw·z），供配载热路径使用
    pub fn load(&self) -> &LoadAccumulator {
        &self.load
    }

    /// 已配载货重合计
    pub fn cargo_weight_t(&self) -> f64 {
        self.load.total_weight_t
    }

    /// 剩余载重吨
    pub fn remaining_deadweight_t(&self) -> f64 {
        self.spec.max_weight_t - self.load.total_weight_t
    }

    /// 已配载危险品所在坐标
    pub fn hazmat_coords(&self) -> &[SlotCoord] {
        &self.hazmat_coords
    }

    // ==========================================
    // 槽位查询
    // ==========================================

    /// 按坐标查询槽位
    ///
    /// # 错误
    /// - SlotNotFound: 坐标超出网格
    pub fn slot_at(&self, bay: u32, row: u32, tier: u32) -> StowageResult<&Slot> {
        self.slot(SlotCoord::new(bay, row, tier))
    }

    pub fn slot(&self, coord: SlotCoord) -> StowageResult<&Slot> {
        self.index(coord).map(|idx| &self.slots[idx])
    }

    fn index(&self, coord: SlotCoord) -> StowageResult<usize> {
        self.spec
            .extents
            .index_of(coord)
            .ok_or(StowageError::SlotNotFound {
                bay: coord.bay,
                row: coord.row,
                tier: coord.tier,
            })
    }

    pub fn is_occupied(&self, coord: SlotCoord) -> bool {
        self.occupant(coord).is_some()
    }

    pub fn occupant(&self, coord: SlotCoord) -> Option<&PlacedCargo> {
        self.spec
            .extents
            .index_of(coord)
            .and_then(|idx| self.occupants[idx].as_ref())
    }

    /// 空闲槽位，按建船顺序 (bay,row,tier 升序)
    ///
    /// 该顺序即配载搜索顺序
    pub fn available_slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots
            .iter()
            .zip(self.occupants.iter())
            .filter(|(_, occupant)| occupant.is_none())
            .map(|(slot, _)| slot)
    }

    /// 集装箱所在槽位（派生查询）
    pub fn slot_of(&self, container_id: &str) -> Option<&Slot> {
        self.container_index
            .get(container_id)
            .map(|idx| &self.slots[*idx])
    }

    pub fn is_placed(&self, container_id: &str) -> bool {
        self.container_index.contains_key(container_id)
    }

    /// 已配载箱，按配载顺序
    pub fn placed_cargo(&self) -> impl Iterator<Item = (&Slot, &PlacedCargo)> + '_ {
        self.placement_order.iter().filter_map(move |idx| {
            self.occupants[*idx]
                .as_ref()
                .map(|cargo| (&self.slots[*idx], cargo))
        })
    }

    /// 同列 (bay,row) 中 tier 及以上各层已配载箱重合计
    pub fn column_load_from(&self, coord: SlotCoord) -> f64 {
        (coord.tier..=self.spec.extents.tiers)
            .filter_map(|tier| self.occupant(SlotCoord::new(coord.bay, coord.row, tier)))
            .map(|cargo| cargo.weight_t)
            .sum()
    }

    // ==========================================
    // 配载写入
    // ==========================================

    /// 将集装箱放入槽位
    ///
    /// 校验全部通过后才写入; 占用、索引、累加器一并更新
    ///
    /// # 错误
    /// - SlotNotFound: 坐标超出网格
    /// - AlreadyOccupied: 槽位已有箱
    /// - AlreadyPlaced: 该箱号已配载（不允许重新绑定）
    /// - CapacityExceeded: 超过单箱上限或载重吨
    pub fn place(&mut self, container: &Container, coord: SlotCoord) -> StowageResult<&Slot> {
        let idx = self.index(coord)?;
        let slot = &self.slots[idx];

        if let Some(occupant) = &self.occupants[idx] {
            return Err(StowageError::AlreadyOccupied {
                slot_id: slot.slot_id.clone(),
                occupant: occupant.container_id.clone(),
            });
        }
        if let Some(existing) = self.container_index.get(&container.container_id) {
            return Err(StowageError::AlreadyPlaced {
                container_id: container.container_id.clone(),
                slot_id: self.slots[*existing].slot_id.clone(),
            });
        }
        if container.total_weight_t > slot.max_tier_weight_t {
            return Err(StowageError::CapacityExceeded {
                container_id: container.container_id.clone(),
                slot_id: slot.slot_id.clone(),
                detail: format!(
                    "单箱 {:.2}t > 上限 {:.2}t",
                    container.total_weight_t, slot.max_tier_weight_t
                ),
            });
        }
        if self.load.total_weight_t + container.total_weight_t > self.spec.max_weight_t {
            return Err(StowageError::CapacityExceeded {
                container_id: container.container_id.clone(),
                slot_id: slot.slot_id.clone(),
                detail: format!(
                    "载货 {:.2}t + {:.2}t > 载重吨 {:.2}t",
                    self.load.total_weight_t, container.total_weight_t, self.spec.max_weight_t
                ),
            });
        }

        let z = slot.z();
        self.occupants[idx] = Some(PlacedCargo {
            container_id: container.container_id.clone(),
            cargo: container.cargo_kind(),
            weight_t: container.total_weight_t,
            teu: container.teu(),
        });
        self.container_index
            .insert(container.container_id.clone(), idx);
        self.placement_order.push(idx);
        if container.is_hazmat() {
            self.hazmat_coords.push(coord);
        }
        self.load.add(LoadPoint::new(container.total_weight_t, z));

        trace!(
            container_id = %container.container_id,
            slot_id = %self.slots[idx].slot_id,
            occupied = self.placement_order.len(),
            "container placed"
        );

        Ok(&self.slots[idx])
    }

    // ==========================================
    // 稳性与汇总
    // ==========================================

    /// 当前稳性（按配载顺序全量重算）
    pub fn current_stability(&self) -> StabilityStatus {
        let loads = self
            .placed_cargo()
            .map(|(slot, cargo)| LoadPoint::new(cargo.weight_t, slot.z()));
        StabilityCalculator::calculate(&self.spec.stability, loads)
    }

    /// 占用汇总
    pub fn summary(&self) -> ShipSummary {
        let mut containers_by_category = BTreeMap::new();
        let mut total_teu = 0;
        for (_, cargo) in self.placed_cargo() {
            *containers_by_category.entry(cargo.cargo).or_insert(0) += 1;
            total_teu += cargo.teu;
        }

        let total_slots = self.total_slots();
        let occupied_slots = self.occupied_slots();
        ShipSummary {
            ship_name: self.spec.name.clone(),
            total_slots,
            occupied_slots,
            available_slots: total_slots - occupied_slots,
            utilization_pct: percentage(occupied_slots, total_slots),
            total_teu,
            cargo_weight_t: self.load.total_weight_t,
            containers_by_category,
        }
    }
}

/// 百分比（分母为 0 时为 0）
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

// ==========================================
// ShipHandle - 共享船舶状态的唯一持有句柄
// ==========================================
// 所有写入经由同一把互斥锁串行化; 锁内完成"扫描 + 写入"即为一个逻辑单元
#[derive(Debug, Clone)]
pub struct ShipHandle {
    inner: Arc<Mutex<Ship>>,
}

impl ShipHandle {
    pub fn new(ship: Ship) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ship)),
        }
    }

    /// 获取锁
    pub fn lock(&self) -> StowageResult<MutexGuard<'_, Ship>> {
        self.inner
            .lock()
            .map_err(|e| StowageError::LockPoisoned(e.to_string()))
    }

    /// 只读访问
    pub fn read<R>(&self, f: impl FnOnce(&Ship) -> R) -> StowageResult<R> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    /// 串行化写入
    pub fn write<R>(&self, f: impl FnOnce(&mut Ship) -> R) -> StowageResult<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    /// 串行化配载写入，返回槽位编号
    pub fn place(&self, container: &Container, coord: SlotCoord) -> StowageResult<String> {
        let mut guard = self.lock()?;
        guard
            .place(container, coord)
            .map(|slot| slot.slot_id.clone())
    }

    pub fn current_stability(&self) -> StowageResult<StabilityStatus> {
        self.read(|ship| ship.current_stability())
    }

    pub fn summary(&self) -> StowageResult<ShipSummary> {
        self.read(|ship| ship.summary())
    }

    /// 取回船舶（仅当无其他句柄副本时）
    pub fn into_inner(self) -> StowageResult<Ship> {
        let mutex = Arc::try_unwrap(self.inner).map_err(|_| {
            StowageError::LockPoisoned("仍存在其他 ShipHandle 副本".to_string())
        })?;
        mutex
            .into_inner()
            .map_err(|e| StowageError::LockPoisoned(e.to_string()))
    }
}
