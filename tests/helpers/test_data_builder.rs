// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use ship_stowage::domain::container::{Container, Dimensions};
use ship_stowage::domain::types::{CargoCategory, ContainerSize, HazardClass};

// ==========================================
// Container 构建器
// ==========================================

pub struct ContainerBuilder {
    container_id: String,
    size: ContainerSize,
    cargo: CargoCategory,
    weight_t: f64,
    priority: Option<u8>,
    destination: Option<String>,
}

impl ContainerBuilder {
    pub fn new(container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            size: ContainerSize::Twenty,
            cargo: CargoCategory::General,
            weight_t: 15.0,
            priority: None,
            destination: None,
        }
    }

    pub fn weight(mut self, weight_t: f64) -> Self {
        self.weight_t = weight_t;
        self
    }

    pub fn forty(mut self) -> Self {
        self.size = ContainerSize::Forty;
        self
    }

    pub fn reefer(mut self) -> Self {
        self.cargo = CargoCategory::Reefer;
        self
    }

    pub fn hazmat(mut self, class: u8) -> Self {
        let class = HazardClass::from_number(class).unwrap_or(HazardClass::Class3);
        self.cargo = CargoCategory::Hazmat { class };
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn destination(mut self, port: &str) -> Self {
        self.destination = Some(port.to_string());
        self
    }

    pub fn build(self) -> Container {
        let mut container = Container::new(
            self.container_id,
            self.size,
            self.cargo,
            self.weight_t,
            Dimensions::standard(self.size),
        )
        .expect("测试集装箱构造失败");
        if let Some(priority) = self.priority {
            container = container.with_priority(priority).expect("优先级非法");
        }
        if let Some(port) = self.destination {
            container = container.with_destination(port);
        }
        container
    }
}

// ==========================================
// 场景生成器（确定性）
// ==========================================

/// 生成确定性的混合场景
///
/// 每 11 箱中: 1 个危险品, 2 个冷藏箱, 其余普通箱;
/// 每 4 箱一个 40ft; 总重 8-27t
pub fn mixed_scenario(count: usize) -> Vec<Container> {
    (0..count)
        .map(|i| {
            let id = format!("SCN{:04}", i + 1);
            let weight = 8.0 + ((i * 7) % 20) as f64;
            let mut builder = ContainerBuilder::new(&id).weight(weight);
            builder = match i % 11 {
                3 => builder.hazmat(3),
                5 | 9 => builder.reefer(),
                _ => builder,
            };
            if i % 4 == 0 {
                builder = builder.forty();
            }
            builder.priority((i % 5) as u8 + 1).build()
        })
        .collect()
}
