//! # 设置存储模块
//!
//! ## 设计思路
//!
//! 插件只持久化一条记录：服务端地址配置。存储本身抽象为键值接口
//! `SettingsStore`，由调用方显式传入，不存在隐藏的全局状态。
//!
//! ## 实现思路
//!
//! - `JsonFileSettingsStore`：单个 JSON 文件保存全部键值，写入前自动创建目录。
//! - `MemorySettingsStore`：进程内存储，用于测试与嵌入场景。
//! - `BridgeSettings`：按变体读写 `comfyui-bridge-settings` 记录，
//!   读取失败时记录日志并回退默认值。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::endpoint::{BridgeVariant, Endpoint};
use crate::error::AppError;

/// 设置记录在存储中的键名。
pub const SETTINGS_KEY: &str = "comfyui-bridge-settings";

/// 简单键值存储。
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// 基于单个 JSON 文件的键值存储。
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, AppError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Settings(format!(
                "设置文件顶层必须是对象，实际为: {}",
                other
            ))),
        }
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let map = self.read_all()?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut map = self.read_all()?;
        map.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Settings(format!("创建设置目录 '{}' 失败: {}", parent.display(), e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, content)?;
        log::debug!("💾 设置已写入 - {}", self.path.display());
        Ok(())
    }
}

/// 进程内键值存储。
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::Settings("设置存储锁已中毒".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::Settings("设置存储锁已中毒".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 插件设置：仅包含服务端地址的原始配置（端口或 URL）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    pub endpoint_config: String,
}

impl BridgeSettings {
    /// 变体默认设置。
    pub fn default_for(variant: BridgeVariant) -> Self {
        Self {
            endpoint_config: variant.default_config(),
        }
    }

    /// 从存储读取设置；缺失、损坏或读取失败时回退默认值。
    pub fn load(store: &dyn SettingsStore, variant: BridgeVariant) -> Self {
        let raw = match store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default_for(variant),
            Err(err) => {
                log::error!("读取设置失败，使用默认值: {err}");
                return Self::default_for(variant);
            }
        };

        let parsed = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::error!("解析设置失败，使用默认值: {err}");
                return Self::default_for(variant);
            }
        };

        match parsed.get(variant.settings_field()).and_then(config_value_to_string) {
            Some(endpoint_config) => Self { endpoint_config },
            None => Self::default_for(variant),
        }
    }

    /// 按变体字段写回存储。
    pub fn save(&self, store: &dyn SettingsStore, variant: BridgeVariant) -> Result<(), AppError> {
        let mut record = Map::new();
        record.insert(
            variant.settings_field().to_string(),
            Value::String(self.endpoint_config.clone()),
        );
        let serialized = serde_json::to_string(&Value::Object(record))?;
        store.set(SETTINGS_KEY, &serialized)
    }

    /// 每次调用都重新解析，不缓存结果。
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::resolve(Some(&self.endpoint_config))
    }
}

/// 端口可能以数字或字符串形式保存。
fn config_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
