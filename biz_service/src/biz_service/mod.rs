pub mod level_request_service;
pub mod user_service;

use common::errors::StoreError;
use mongodb::Database;

/// 启动时创建各集合的索引
pub async fn init_indexes(db: &Database) -> Result<(), StoreError> {
    user_service::UserService::init_indexes(db).await?;
    level_request_service::LevelRequestService::init_indexes(db).await?;
    Ok(())
}
