// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的船舶构造、配置文件生成等功能
// ==========================================
#![allow(dead_code)]

use ship_stowage::domain::ship::{GridExtents, Ship, ShipSpec, StabilityParams};
use ship_stowage::domain::slot::{Position, SlotCoord, SlotLayout};
use std::io::Write;
use tempfile::NamedTempFile;

/// 参考支线船（7 × 14 × 7）
pub fn feeder_ship() -> Ship {
    Ship::new(ShipSpec::feeder_reference()).expect("参考船构造失败")
}

/// 参考船参数 + 指定网格尺寸
pub fn grid_spec(bays: u32, rows: u32, tiers: u32) -> ShipSpec {
    let mut spec = ShipSpec::feeder_reference();
    spec.name = format!("GRID_{}x{}x{}", bays, rows, tiers);
    spec.extents = GridExtents { bays, rows, tiers };
    spec
}

/// 参考船参数 + 指定网格尺寸 + 标准几何
pub fn grid_ship(bays: u32, rows: u32, tiers: u32) -> Ship {
    Ship::new(grid_spec(bays, rows, tiers)).expect("网格船构造失败")
}

/// 小型试验船: 空船 100t, KG 5.0, KB 3.0, BM 2.5, GM_min 0.3
///
/// 空船 GM = 0.5m, 少量高位载荷即可使其失稳
pub fn tender_spec(bays: u32, rows: u32, tiers: u32) -> ShipSpec {
    let mut spec = grid_spec(bays, rows, tiers);
    spec.name = "TENDER".to_string();
    spec.stability = StabilityParams {
        lightship_weight_t: 100.0,
        lightship_kg_m: 5.0,
        kb_m: 3.0,
        bm_m: 2.5,
        gm_min_m: 0.3,
    };
    spec.max_weight_t = 500.0;
    spec
}

/// 按层给定垂向坐标与堆重许可的简单几何
///
/// # 参数
/// - z_by_tier: 第 n 层的垂向坐标
/// - stack_by_tier: 第 n 层的堆重许可
pub fn tiered_geometry(
    z_by_tier: Vec<f64>,
    stack_by_tier: Vec<f64>,
) -> impl Fn(SlotCoord) -> SlotLayout {
    move |coord: SlotCoord| {
        let idx = (coord.tier - 1) as usize;
        SlotLayout {
            position: Position {
                x: f64::from(coord.bay),
                y: f64::from(coord.row),
                z: z_by_tier[idx],
            },
            max_stack_weight_t: stack_by_tier[idx],
            max_tier_weight_t: 30.0,
            reefer_power: false,
        }
    }
}

/// 写入临时 JSON 配置文件
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn write_config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("临时文件创建失败");
    file.write_all(json.as_bytes()).expect("配置写入失败");
    file.flush().expect("配置写入失败");
    file
}
