use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub server: Option<ServerConfig>,
    pub sys: Option<SysConfig>,
    pub level: Option<LevelConfig>,
}

impl AppConfig {
    /// 读取配置文件，`APP__` 前缀的环境变量覆盖文件内容
    ///
    /// 例如 `APP__DATABASE__DB_NAME=account` 覆盖 `[database] db_name`
    pub fn new(file: &str) -> Result<Self, ConfigError> {
        Self::build(file, None)
    }

    /// `env` 为 `None` 时读取进程环境变量，否则只使用给定的键值
    pub fn build(file: &str, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(file).required(true))
            .add_source(Environment::with_prefix("APP").prefix_separator("__").separator("__").source(env))
            .build()?;
        config.try_deserialize::<AppConfig>()
    }

    pub fn get_database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }
    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_level(&self) -> LevelConfig {
        self.level.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: String,
    pub db_name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SysConfig {
    //全局日志级别
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 用户等级表
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LevelConfig {
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub level: i32,
    pub name: String,
}
