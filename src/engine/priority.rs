// ==========================================
// 集装箱船配载引擎 - 装箱顺序排序器
// ==========================================
// 职责: 按配载策略确定集装箱处理顺序
// 输入: 待配载集装箱列表 + 策略
// 输出: 排序后的集装箱列表
// 红线: 排序必须是全序 (最终以箱号兜底), 保证结果可复现
// ==========================================

use crate::domain::container::Container;
use crate::engine::strategy::PackStrategy;
use std::cmp::Ordering;

// ==========================================
// ContainerSorter - 装箱顺序排序器
// ==========================================
pub struct ContainerSorter {
    // 无状态引擎,不需要注入依赖
}

impl ContainerSorter {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 ContainerSorter 实例
    pub fn new() -> Self {
        Self {}
    }

    /// 排序集装箱列表
    ///
    /// 排序键:
    /// - heavy_first: 总重降序 → 箱号升序
    /// - priority_first: 装船优先级升序 → 总重降序 → 箱号升序
    ///
    /// # 参数
    /// - `containers`: 待排序集装箱
    /// - `strategy`: 配载策略
    ///
    /// # 返回
    /// 按处理顺序排列的集装箱
    pub fn sort(&self, mut containers: Vec<Container>, strategy: PackStrategy) -> Vec<Container> {
        containers.sort_by(|a, b| self.compare(a, b, strategy));
        containers
    }

    /// 比较两个集装箱的处理先后
    pub fn compare(&self, a: &Container, b: &Container, strategy: PackStrategy) -> Ordering {
        match strategy {
            PackStrategy::HeavyFirst => Self::heavy_first(a, b),
            PackStrategy::PriorityFirst => a
                .loading_priority
                .cmp(&b.loading_priority)
                .then_with(|| Self::heavy_first(a, b)),
        }
    }

    fn heavy_first(a: &Container, b: &Container) -> Ordering {
        b.total_weight_t
            .total_cmp(&a.total_weight_t)
            .then_with(|| a.container_id.cmp(&b.container_id))
    }
}

impl Default for ContainerSorter {
    fn default() -> Self {
        Self::new()
    }
}
