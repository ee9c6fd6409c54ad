// ==========================================
// 集装箱船配载引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照/恢复
// 存储: 内存 key-value (可由 JSON 字符串或文件加载)
// ==========================================

use crate::config::stowage_config_trait::StowageConfigReader;
use crate::domain::types::{SeaState, StackWeightPolicy};
use crate::engine::constraint::DEFAULT_HAZMAT_SEPARATION;
use crate::engine::strategy::PackStrategy;
use crate::error::{StowageError, StowageResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 由键值对创建
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(map)),
        }
    }

    /// 由 JSON 对象字符串创建
    ///
    /// 值可以是字符串、数字或布尔; null 视为未配置
    ///
    /// # 错误
    /// - Json: 非法 JSON
    /// - InvalidConfiguration: 顶层不是对象, 或值为数组/对象
    pub fn from_json_str(json: &str) -> StowageResult<Self> {
        let raw: Value = serde_json::from_str(json)?;
        let object = raw
            .as_object()
            .ok_or_else(|| StowageError::invalid("配置 JSON 顶层必须为对象"))?;

        let mut map = HashMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(StowageError::invalid(format!(
                        "配置项 {} 值类型不支持: {}",
                        key, other
                    )))
                }
            };
            map.insert(key.clone(), text);
        }

        Ok(Self {
            values: Arc::new(Mutex::new(map)),
        })
    }

    /// 由 JSON 文件创建
    pub fn from_file(path: impl AsRef<Path>) -> StowageResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "加载配置文件");
        Self::from_json_str(&content)
    }

    fn lock(&self) -> StowageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| StowageError::LockPoisoned(format!("配置锁获取失败: {}", e)))
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> StowageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// 写入配置值（覆写）
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> StowageResult<()> {
        self.lock()?.insert(key.into(), value.into());
        Ok(())
    }

    /// 删除配置值，恢复默认
    pub fn remove(&self, key: &str) -> StowageResult<Option<String>> {
        Ok(self.lock()?.remove(key))
    }

    /// 读取并解析配置值; 未配置返回 None, 解析失败为配置错误
    fn parse_config_value<T>(&self, key: &str) -> StowageResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_global_config_value(key)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                StowageError::invalid(format!("配置项 {} 取值非法 ({}): {}", key, raw, e))
            }),
        }
    }

    /// 获取所有配置的快照（JSON格式，按键排序）
    ///
    /// # 用途
    /// - 在配载结果中记录所用配置
    /// - 复现同一次配载
    pub fn get_config_snapshot(&self) -> StowageResult<String> {
        let guard = self.lock()?;
        let sorted: BTreeMap<&String, &String> = guard.iter().collect();
        Ok(serde_json::to_string(&sorted)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名配置项; 以 `__meta_` 开头的键不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> StowageResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut guard = self.lock()?;
        let mut count = 0;
        for (key, value) in config_map {
            if key.starts_with("__meta_") {
                continue;
            }
            guard.insert(key, value);
            count += 1;
        }
        Ok(count)
    }
}

// ==========================================
// StowageConfigReader Trait 实现
// ==========================================
impl StowageConfigReader for ConfigManager {
    fn get_hazmat_separation(&self) -> StowageResult<u32> {
        Ok(self
            .parse_config_value::<u32>(config_keys::HAZMAT_SEPARATION)?
            .unwrap_or(DEFAULT_HAZMAT_SEPARATION))
    }

    fn get_gm_threshold(&self) -> StowageResult<Option<f64>> {
        self.parse_config_value::<f64>(config_keys::GM_THRESHOLD)
    }

    fn get_sea_state(&self) -> StowageResult<SeaState> {
        Ok(self
            .parse_config_value::<SeaState>(config_keys::SEA_STATE)?
            .unwrap_or_default())
    }

    fn get_stack_weight_policy(&self) -> StowageResult<StackWeightPolicy> {
        Ok(self
            .parse_config_value::<StackWeightPolicy>(config_keys::STACK_WEIGHT_POLICY)?
            .unwrap_or_default())
    }

    fn get_default_strategy(&self) -> StowageResult<PackStrategy> {
        Ok(self
            .parse_config_value::<PackStrategy>(config_keys::DEFAULT_STRATEGY)?
            .unwrap_or_default())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // ===== 约束参数 =====
    pub const HAZMAT_SEPARATION: &str = "hazmat_separation"; // 危险品最小曼哈顿距离
    pub const GM_THRESHOLD: &str = "gm_threshold"; // 稳性预测阈值（米）, 未配置时按海况推导
    pub const STACK_WEIGHT_POLICY: &str = "stack_weight_policy"; // per_container / cumulative_column

    // ===== 航行条件 =====
    pub const SEA_STATE: &str = "sea_state"; // calm / moderate / rough

    // ===== 策略 =====
    pub const DEFAULT_STRATEGY: &str = "default_strategy"; // heavy_first / priority_first
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = ConfigManager::new();
        assert_eq!(config.get_hazmat_separation().unwrap(), 3);
        assert_eq!(config.get_gm_threshold().unwrap(), None);
        assert_eq!(config.get_sea_state().unwrap(), SeaState::Calm);
        assert_eq!(
            config.get_stack_weight_policy().unwrap(),
            StackWeightPolicy::CumulativeColumn
        );
        assert_eq!(config.get_default_strategy().unwrap(), PackStrategy::HeavyFirst);
    }

    #[test]
    fn test_json_numbers_and_strings() {
        let config = ConfigManager::from_json_str(
            r#"{"hazmat_separation": 4, "gm_threshold": "0.45", "sea_state": "rough", "unused": null}"#,
        )
        .unwrap();
        assert_eq!(config.get_hazmat_separation().unwrap(), 4);
        assert_eq!(config.get_gm_threshold().unwrap(), Some(0.45));
        assert_eq!(config.get_sea_state().unwrap(), SeaState::Rough);
        assert_eq!(config.get_global_config_value("unused").unwrap(), None);
    }

    #[test]
    fn test_invalid_value_is_configuration_error() {
        let config = ConfigManager::from_values([(config_keys::SEA_STATE, "hurricane")]);
        let err = config.get_sea_state().unwrap_err();
        assert!(err.is_configuration());

        assert!(ConfigManager::from_json_str("[1, 2]").is_err());
        assert!(ConfigManager::from_json_str(r#"{"a": [1]}"#).is_err());
    }

    #[test]
    fn test_snapshot_roundtrip_skips_meta() {
        let config = ConfigManager::from_values([
            (config_keys::HAZMAT_SEPARATION, "5"),
            (config_keys::DEFAULT_STRATEGY, "priority_first"),
        ]);
        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(
            snapshot,
            r#"{"default_strategy":"priority_first","hazmat_separation":"5"}"#
        );

        let restored = ConfigManager::new();
        let count = restored
            .restore_config_from_snapshot(
                r#"{"hazmat_separation":"5","__meta_plan":"x"}"#,
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(restored.get_hazmat_separation().unwrap(), 5);
        assert_eq!(restored.get_global_config_value("__meta_plan").unwrap(), None);
    }
}
