use crate::errors::StoreError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Serialize, de::DeserializeOwned};

/// 解析 24 位十六进制 ObjectId，格式不合法时返回 `InvalidId`
pub fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// 文档存储的通用访问接口
///
/// 读取不到文档返回 `Ok(None)`，按 id 更新不存在的文档是静默的空操作。
#[async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    async fn insert(&self, entity: &T) -> Result<(), StoreError>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError>;
    async fn find_many(&self, filter: Document) -> Result<Vec<T>, StoreError>;
    /// `update` 必须是 `$set` / `$inc` 等操作符文档
    async fn update_by_id(&self, id: &str, update: Document) -> Result<(), StoreError>;
    /// `id` 不是合法 ObjectId 时返回 `InvalidId`
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError>;
}

pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>, // 线程安全的数据库连接池
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<T> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn insert(&self, entity: &T) -> Result<(), StoreError> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let obj_id = parse_object_id(id)?;
        self.find_one(doc! { "_id": obj_id }).await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<T>, StoreError> {
        let cursor = self.collection.find(filter).await?;
        let result: Vec<T> = cursor.try_collect().await?;
        Ok(result)
    }

    async fn update_by_id(&self, id: &str, update: Document) -> Result<(), StoreError> {
        let obj_id = parse_object_id(id)?;
        self.collection.update_one(doc! { "_id": obj_id }, update).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_object_id("not-an-id"), Err(StoreError::InvalidId("not-an-id".into())));
    }
}
