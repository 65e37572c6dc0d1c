use crate::config::DatabaseConfig;
use log::info;
use mongodb::{Client, Database, options::ClientOptions};

/// 建立 MongoDB 连接并返回数据库句柄，由调用方持有并注入各服务
pub async fn init_db(config: &DatabaseConfig) -> mongodb::error::Result<Database> {
    let options = ClientOptions::parse(&config.url).await?;
    let client = Client::with_options(options)?;
    info!("MongoDB client ready, database={}", config.db_name);
    Ok(client.database(&config.db_name))
}
