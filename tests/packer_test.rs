// ==========================================
// Packer 贪心配载集成测试
// ==========================================
// 测试目标: 验证排序、扫描顺序、失败汇总与最终指标
// 覆盖范围: heavy_first / priority_first、冷藏电源不足、稳性失败、堆重口径
// ==========================================

mod test_helpers;
#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use ship_stowage::config::PackerConfig;
use ship_stowage::domain::ship::Ship;
use ship_stowage::domain::types::{CargoKind, StackWeightPolicy};
use ship_stowage::engine::{PackStrategy, Packer};
use ship_stowage::logging;
use test_data_builder::ContainerBuilder;

#[test]
fn test_heavy_first_fills_column_bottom_up() {
    logging::init_test();
    println!("\n=== 测试：重箱优先, 自下而上填充 ===");

    let mut ship = test_helpers::grid_ship(1, 1, 3);
    let packer = Packer::for_ship(&ship);
    let containers = vec![
        ContainerBuilder::new("C12").weight(12.0).build(),
        ContainerBuilder::new("C25").weight(25.0).build(),
        ContainerBuilder::new("C18").weight(18.0).build(),
    ];

    let result = packer
        .pack(&mut ship, containers, PackStrategy::HeavyFirst)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.placed_slot_of("C25").unwrap().tier, 1);
    assert_eq!(result.placed_slot_of("C18").unwrap().tier, 2);
    assert_eq!(result.placed_slot_of("C12").unwrap().tier, 3);

    let sequence: Vec<usize> = result.placed.iter().map(|p| p.sequence_no).collect();
    assert_eq!(sequence, vec![1, 2, 3]);
}

#[test]
fn test_priority_first_places_urgent_first() {
    logging::init_test();
    println!("\n=== 测试：优先级优先 ===");

    let mut ship = test_helpers::grid_ship(1, 1, 3);
    let packer = Packer::for_ship(&ship);
    let containers = vec![
        ContainerBuilder::new("HEAVY_LOW").weight(28.0).priority(5).build(),
        ContainerBuilder::new("LIGHT_URGENT").weight(9.0).priority(1).build(),
    ];

    let result = packer
        .pack_named(&mut ship, containers, "priority_first")
        .unwrap();

    assert_eq!(result.strategy, PackStrategy::PriorityFirst);
    assert_eq!(result.placed[0].container.container_id, "LIGHT_URGENT");
    assert_eq!(result.placed_slot_of("LIGHT_URGENT").unwrap().tier, 1);
    assert_eq!(result.placed_slot_of("HEAVY_LOW").unwrap().tier, 2);
}

#[test]
fn test_reefer_shortage_reports_power_unavailable() {
    logging::init_test();
    println!("\n=== 测试：冷藏电源不足 ===");

    // 1 × 3 × 1: 外侧排 1、3 有电源
    let mut ship = test_helpers::grid_ship(1, 3, 1);
    let packer = Packer::for_ship(&ship);
    let containers = vec![
        ContainerBuilder::new("RF1").reefer().weight(20.0).build(),
        ContainerBuilder::new("RF2").reefer().weight(18.0).build(),
        ContainerBuilder::new("RF3").reefer().weight(16.0).build(),
    ];

    let result = packer
        .pack(&mut ship, containers, PackStrategy::HeavyFirst)
        .unwrap();

    assert!(!result.success, "存在未配载箱时 success 应为 false");
    assert_eq!(result.metrics.placed_containers, 2);
    assert_eq!(result.failed_ids(), vec!["RF3"]);

    let failed = &result.failed[0];
    println!("  失败原因: {}", failed.reason);
    assert!(failed.reason.contains("POWER_UNAVAILABLE"));
    assert_eq!(failed.rejections.get("POWER_UNAVAILABLE"), Some(&1));
    assert_eq!(result.placed_slot_of("RF1").unwrap().slot_id, "B01R01T01");
    assert_eq!(result.placed_slot_of("RF2").unwrap().slot_id, "B01R03T01");
}

#[test]
fn test_stability_violation_leaves_container_unplaced() {
    logging::init_test();
    println!("\n=== 测试：稳性不足时拒绝高位配载 ===");

    let geometry = test_helpers::tiered_geometry(vec![1.0, 20.0], vec![150.0, 150.0]);
    let mut ship = Ship::build(test_helpers::tender_spec(1, 1, 2), &geometry).unwrap();
    let packer = Packer::for_ship(&ship);
    let containers = vec![
        ContainerBuilder::new("A").weight(10.0).build(),
        ContainerBuilder::new("B").weight(10.0).build(),
    ];

    let result = packer
        .pack(&mut ship, containers, PackStrategy::HeavyFirst)
        .unwrap();

    assert_eq!(result.placed.len(), 1);
    assert_eq!(result.placed[0].container.container_id, "A", "同重按箱号升序");
    assert_eq!(result.failed_ids(), vec!["B"]);
    assert_eq!(result.failed[0].rejections.get("STABILITY_VIOLATION"), Some(&1));
    assert!(result.metrics.is_stable, "已配载部分仍应满足稳性");
    assert!(!result.success);
}

#[test]
fn test_stack_policy_changes_outcome() {
    logging::init_test();
    println!("\n=== 测试：堆重口径影响配载结果 ===");

    let build_ship = || {
        let geometry =
            test_helpers::tiered_geometry(vec![1.0, 2.0, 3.0], vec![40.0, 25.0, 10.0]);
        Ship::build(test_helpers::grid_spec(1, 1, 3), &geometry).unwrap()
    };
    let containers = || {
        vec![
            ContainerBuilder::new("A").weight(20.0).build(),
            ContainerBuilder::new("B").weight(15.0).build(),
            ContainerBuilder::new("C").weight(10.0).build(),
        ]
    };

    let mut ship = build_ship();
    let cumulative = Packer::for_ship(&ship);
    let result = cumulative
        .pack(&mut ship, containers(), PackStrategy::HeavyFirst)
        .unwrap();
    assert_eq!(result.failed_ids(), vec!["C"]);
    assert_eq!(result.failed[0].rejections.get("CAPACITY_EXCEEDED"), Some(&1));

    let mut ship = build_ship();
    let mut config = PackerConfig::for_ship(&ship);
    config.stack_policy = StackWeightPolicy::PerContainer;
    let per_container = Packer::new(config);
    let result = per_container
        .pack(&mut ship, containers(), PackStrategy::HeavyFirst)
        .unwrap();
    assert!(result.success);
    assert_eq!(result.metrics.placed_containers, 3);
}

#[test]
fn test_every_container_reported_exactly_once() {
    logging::init_test();
    println!("\n=== 测试：每个输入箱在结果中出现且仅出现一次 ===");

    // 槽位不足: 2 × 2 × 2 = 8 槽, 12 箱
    let mut ship = test_helpers::grid_ship(2, 2, 2);
    let packer = Packer::for_ship(&ship);
    let containers = test_data_builder::mixed_scenario(12);
    let mut input_ids: Vec<String> = containers.iter().map(|c| c.container_id.clone()).collect();

    let result = packer
        .pack(&mut ship, containers, PackStrategy::HeavyFirst)
        .unwrap();

    let mut output_ids: Vec<String> = result
        .placed
        .iter()
        .map(|p| p.container.container_id.clone())
        .chain(result.failed.iter().map(|f| f.container.container_id.clone()))
        .collect();
    input_ids.sort();
    output_ids.sort();

    assert_eq!(input_ids, output_ids);
    assert_eq!(
        result.metrics.placed_containers + result.metrics.failed_containers,
        result.metrics.total_containers
    );
    assert_eq!(result.metrics.placed_containers, ship.occupied_slots());
    assert!(result.metrics.placed_containers <= 8);
}

#[test]
fn test_metrics_reflect_placed_set() {
    logging::init_test();
    println!("\n=== 测试：配载指标 ===");

    let mut ship = test_helpers::grid_ship(1, 2, 2);
    let packer = Packer::for_ship(&ship);
    let containers = vec![
        ContainerBuilder::new("G1").weight(20.0).forty().build(),
        ContainerBuilder::new("R1").weight(15.0).reefer().build(),
        ContainerBuilder::new("G2").weight(10.0).build(),
    ];

    let result = packer
        .pack(&mut ship, containers, PackStrategy::HeavyFirst)
        .unwrap();
    let m = &result.metrics;

    assert!(result.success);
    assert_eq!(m.placement_rate, 100.0);
    assert_eq!(m.total_teu, 4);
    assert_eq!(m.total_weight_t, 45.0);
    assert_eq!(m.slot_utilization, 75.0);
    assert_eq!(m.displacement_t, 3545.0);
    assert_eq!(m.cargo_distribution.get(&CargoKind::General), Some(&2));
    assert_eq!(m.cargo_distribution.get(&CargoKind::Reefer), Some(&1));
    assert_eq!(m.gm_m, result.last_predicted_gm().unwrap());
}
