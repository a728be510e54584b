use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::types::RunConfig;
use crate::error::Result;

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "rutest.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 查找并加载配置文件，找不到时返回默认配置
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/rutest/
    pub fn find_and_load() -> RunConfig {
        if let Some(config) = Self::try_load_from_current_dir() {
            return config;
        }

        if let Some(config) = Self::try_load_from_user_dir() {
            return config;
        }

        debug!("no config file found, using defaults");
        RunConfig::default()
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<RunConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                debug!(path = %config_path.display(), "loading config");
                return Self::load_from_path(&config_path).ok();
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<RunConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("rutest").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }
}
