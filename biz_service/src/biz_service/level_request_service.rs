use crate::entitys::level_request_entity::{LevelRequestEntity, RequestStatus};
use crate::entitys::user_entity::AccountEntity;
use crate::util::db_index_util::index_create;
use common::errors::StoreError;
use common::index_trait::MongoIndexModelProvider;
use common::query_builder::QueryBuilder;
use common::repository_util::{BaseRepository, Repository};
use log::info;
use mongodb::Database;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, Document};
use std::sync::Arc;

pub const LEVEL_REQUEST_COLLECTION: &str = "level_request";

#[derive(Clone)]
pub struct LevelRequestService {
    pub dao: Arc<dyn Repository<LevelRequestEntity>>,
}

impl LevelRequestService {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<LevelRequestEntity>(LEVEL_REQUEST_COLLECTION);
        Self::with_repository(Arc::new(BaseRepository::new(collection)))
    }

    pub fn with_repository(dao: Arc<dyn Repository<LevelRequestEntity>>) -> Self {
        Self { dao }
    }

    pub async fn init_indexes(db: &Database) -> Result<(), StoreError> {
        index_create(db.collection::<Document>(LEVEL_REQUEST_COLLECTION), LevelRequestEntity::index_models()).await
    }

    /// 提交等级变更申请，返回申请 id
    pub async fn submit(&self, account: &AccountEntity, level: i32, reason: Option<String>) -> Result<String, StoreError> {
        let request = LevelRequestEntity {
            id: ObjectId::new().to_hex(),
            user_id: account.id.clone(),
            current_level: account.level,
            level,
            reason,
            status: RequestStatus::Pending,
            create_time: DateTime::now(),
        };
        self.dao.insert(&request).await?;
        info!("level request {} submitted: user={} {} -> {}", request.id, account.id, account.level, level);
        Ok(request.id)
    }

    /// 待处理的申请列表
    pub async fn list_pending(&self) -> Result<Vec<LevelRequestEntity>, StoreError> {
        self.dao.find_many(QueryBuilder::new().eq("status", RequestStatus::Pending.as_ref()).build()).await
    }
}
