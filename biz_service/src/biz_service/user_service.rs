use crate::entitys::user_entity::{AccountEntity, DevCounter, DevStats, Profile, SecureInfo};
use crate::util::db_index_util::index_create;
use common::errors::StoreError;
use common::index_trait::MongoIndexModelProvider;
use common::repository_util::{BaseRepository, Repository};
use common::query_builder::QueryBuilder;
use log::{debug, info};
use mongodb::Database;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, DateTime, Document, doc};
use std::sync::Arc;

pub const USER_COLLECTION: &str = "users";

/// 手机号只保存国内号码部分：去掉第一次出现的 `+86`（不限于开头）
pub fn normalize_phone(phone: &str) -> String {
    phone.replacen("+86", "", 1)
}

/// 创建账号所需的字段，`password` 为已加盐哈希后的摘要
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub phone: String,
    pub name: String,
    pub nickname: String,
    pub password: String,
    pub salt: String,
}

/// `update_dev_path` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevUpdate {
    Applied(DevCounter),
    /// 未知的计数器路径，未做任何修改
    Ignored,
}

#[derive(Clone)]
pub struct UserService {
    pub dao: Arc<dyn Repository<AccountEntity>>,
}

impl UserService {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<AccountEntity>(USER_COLLECTION);
        Self::with_repository(Arc::new(BaseRepository::new(collection)))
    }

    pub fn with_repository(dao: Arc<dyn Repository<AccountEntity>>) -> Self {
        Self { dao }
    }

    /// 创建 email / phone / name 唯一索引
    pub async fn init_indexes(db: &Database) -> Result<(), StoreError> {
        index_create(db.collection::<Document>(USER_COLLECTION), AccountEntity::index_models()).await
    }

    /// 添加用户
    pub async fn add(&self, data: NewAccount) -> Result<(), StoreError> {
        let account = AccountEntity {
            id: ObjectId::new().to_hex(),
            email: data.email.to_lowercase(),
            phone: normalize_phone(&data.phone),
            name: data.name.to_lowercase(),
            raw_name: data.name,
            level: 0,
            create_time: DateTime::now(),
            auth: vec![],
            info: Profile { nickname: Some(data.nickname), ..Default::default() },
            secure: SecureInfo { password: data.password, salt: data.salt },
            dev: DevStats::default(),
        };
        self.dao.insert(&account).await?;
        info!("account created: id={}, name={}", account.id, account.name);
        Ok(())
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<AccountEntity>, StoreError> {
        self.dao.find_one(QueryBuilder::new().eq("email", email.to_lowercase()).build()).await
    }

    /// `id` 不是合法 ObjectId 时返回 `InvalidId`
    pub async fn get_by_id(&self, id: &str) -> Result<Option<AccountEntity>, StoreError> {
        self.dao.find_by_id(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<AccountEntity>, StoreError> {
        self.dao.find_one(QueryBuilder::new().eq("name", name.to_lowercase()).build()).await
    }

    pub async fn get_by_phone(&self, phone: &str) -> Result<Option<AccountEntity>, StoreError> {
        self.dao.find_one(QueryBuilder::new().eq("phone", normalize_phone(phone)).build()).await
    }

    /// 计数器以 `$inc` 在存储端原子增减，`delta` 可为负数
    pub async fn update_dev(&self, id: &str, counter: DevCounter, delta: i64) -> Result<(), StoreError> {
        let mut inc = Document::new();
        inc.insert(counter.field_path(), delta);
        self.dao.update_by_id(id, doc! { "$inc": inc }).await
    }

    /// 按字符串路径（`app.own` 等）更新计数器，未知路径静默忽略
    pub async fn update_dev_path(&self, id: &str, path: &str, delta: i64) -> Result<DevUpdate, StoreError> {
        match path.parse::<DevCounter>() {
            Ok(counter) => {
                self.update_dev(id, counter, delta).await?;
                Ok(DevUpdate::Applied(counter))
            }
            Err(_) => {
                debug!("update_dev_path: ignore unknown counter '{}' for {}", path, id);
                Ok(DevUpdate::Ignored)
            }
        }
    }

    /// 更新用户登陆邮箱，唯一性由索引保证
    pub async fn update_email(&self, id: &str, email: &str) -> Result<(), StoreError> {
        self.dao.update_by_id(id, doc! { "$set": { "email": email.to_lowercase() } }).await
    }

    pub async fn update_level(&self, id: &str, level: i32) -> Result<(), StoreError> {
        self.dao.update_by_id(id, doc! { "$set": { "level": level } }).await
    }

    pub async fn update_phone(&self, id: &str, phone: &str) -> Result<(), StoreError> {
        self.dao.update_by_id(id, doc! { "$set": { "phone": normalize_phone(phone) } }).await
    }

    /// 整体替换个人资料，未提供的字段会被清除
    pub async fn update_info(&self, id: &str, info: &Profile) -> Result<(), StoreError> {
        let info = bson::to_bson(info)?;
        self.dao.update_by_id(id, doc! { "$set": { "info": info } }).await
    }

    /// `password` 为已加盐哈希后的摘要
    pub async fn update_password(&self, id: &str, password: &str, salt: &str) -> Result<(), StoreError> {
        self.dao
            .update_by_id(id, doc! { "$set": { "secure": { "password": password, "salt": salt } } })
            .await
    }
}
