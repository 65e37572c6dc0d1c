use crate::errors::StoreError;
use crate::index_trait::MongoIndexModelProvider;
use crate::repository_util::{Repository, parse_object_id};
use async_trait::async_trait;
use log::debug;
use mongodb::IndexModel;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use tokio::sync::Mutex;

/// 进程内文档存储
///
/// 行为与 MongoDB 驱动保持一致：唯一索引、点路径等值过滤、`$set` / `$inc` 更新。
/// 所有写操作在同一把锁内完成，`$inc` 对并发调用是原子的。
pub struct MemoryRepository<T> {
    docs: Mutex<Vec<Document>>,
    unique_keys: Vec<Vec<String>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::with_indexes(vec![])
    }
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只有 `unique` 索引会被强制
    pub fn with_indexes(models: Vec<IndexModel>) -> Self {
        let unique_keys = models
            .into_iter()
            .filter(|model| model.options.as_ref().and_then(|o| o.unique).unwrap_or(false))
            .map(|model| model.keys.keys().cloned().collect())
            .collect();
        Self { docs: Mutex::new(vec![]), unique_keys, _marker: PhantomData }
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }

    fn check_unique(&self, docs: &[Document], candidate: &Document, skip: Option<usize>) -> Result<(), StoreError> {
        for keys in &self.unique_keys {
            let duplicate = docs.iter().enumerate().any(|(idx, other)| {
                Some(idx) != skip
                    && keys.iter().all(|key| {
                        bson_eq(get_path(candidate, key).unwrap_or(&Bson::Null), get_path(other, key).unwrap_or(&Bson::Null))
                    })
            });
            if duplicate {
                return Err(StoreError::ConstraintViolation(format!("duplicate key on index [{}]", keys.join(", "))));
            }
        }
        Ok(())
    }
}

impl<T: MongoIndexModelProvider> MemoryRepository<T> {
    /// 按实体声明的索引创建
    pub fn indexed() -> Self {
        Self::with_indexes(T::index_models())
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn insert(&self, entity: &T) -> Result<(), StoreError> {
        let mut doc = bson::to_document(entity)?;
        if !doc.contains_key("_id") {
            doc.insert("_id", ObjectId::new());
        }
        let mut docs = self.docs.lock().await;
        if docs.iter().any(|other| other.get("_id") == doc.get("_id")) {
            return Err(StoreError::ConstraintViolation("duplicate key on index [_id]".to_string()));
        }
        self.check_unique(&docs, &doc, None)?;
        docs.push(doc);
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        let found = {
            let docs = self.docs.lock().await;
            docs.iter().find(|doc| matches_filter(doc, &filter)).cloned()
        };
        match found {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let obj_id = parse_object_id(id)?;
        self.find_one(bson::doc! { "_id": obj_id }).await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<T>, StoreError> {
        let found: Vec<Document> = {
            let docs = self.docs.lock().await;
            docs.iter().filter(|doc| matches_filter(doc, &filter)).cloned().collect()
        };
        found.into_iter().map(|doc| bson::from_document(doc).map_err(StoreError::from)).collect()
    }

    async fn update_by_id(&self, id: &str, update: Document) -> Result<(), StoreError> {
        let obj_id = Bson::ObjectId(parse_object_id(id)?);
        let mut docs = self.docs.lock().await;
        let Some(idx) = docs.iter().position(|doc| doc.get("_id") == Some(&obj_id)) else {
            debug!("update_by_id: no document with _id {}", id);
            return Ok(());
        };
        let mut updated = docs[idx].clone();
        apply_update(&mut updated, &update)?;
        self.check_unique(&docs, &updated, Some(idx))?;
        docs[idx] = updated;
        Ok(())
    }
}

fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

fn set_path(doc: &mut Document, path: &str, value: Bson) -> Result<(), StoreError> {
    let Some((head, rest)) = path.split_once('.') else {
        doc.insert(path, value);
        return Ok(());
    };
    let missing = match doc.get(head) {
        None | Some(Bson::Null) => true,
        Some(Bson::Document(_)) => false,
        Some(_) => {
            return Err(StoreError::ConstraintViolation(format!("cannot create field '{}' in non-document '{}'", rest, head)));
        }
    };
    if missing {
        doc.insert(head, Document::new());
    }
    let inner = doc.get_document_mut(head).map_err(|e| StoreError::Codec(format!("{:?}", e)))?;
    set_path(inner, rest, value)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// 数值按值比较（`1` 与 `1i64` 相等），其余按 BSON 相等
fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| bson_eq(get_path(doc, key).unwrap_or(&Bson::Null), expected))
}

fn inc_value(current: Option<&Bson>, delta: &Bson) -> Result<Bson, StoreError> {
    let sum = match (current.unwrap_or(&Bson::Int32(0)), delta) {
        // int32 溢出时提升为 int64，与服务端一致
        (Bson::Int32(a), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(v) => Bson::Int32(v),
            None => Bson::Int64(*a as i64 + *b as i64),
        },
        (Bson::Int32(a), Bson::Int64(b)) => Bson::Int64(checked_inc(*a as i64, *b)?),
        (Bson::Int64(a), Bson::Int32(b)) => Bson::Int64(checked_inc(*a, *b as i64)?),
        (Bson::Int64(a), Bson::Int64(b)) => Bson::Int64(checked_inc(*a, *b)?),
        (a, b) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => Bson::Double(x + y),
            _ => {
                return Err(StoreError::ConstraintViolation(format!(
                    "cannot apply $inc to {:?} with {:?}",
                    a.element_type(),
                    b.element_type()
                )));
            }
        },
    };
    Ok(sum)
}

fn checked_inc(a: i64, b: i64) -> Result<i64, StoreError> {
    a.checked_add(b)
        .ok_or_else(|| StoreError::ConstraintViolation(format!("$inc overflows int64: {} + {}", a, b)))
}

fn apply_update(doc: &mut Document, update: &Document) -> Result<(), StoreError> {
    if update.is_empty() {
        return Err(StoreError::Codec("update document must not be empty".to_string()));
    }
    for (op, fields) in update {
        let fields = fields
            .as_document()
            .ok_or_else(|| StoreError::Codec(format!("operator {} expects a document", op)))?;
        match op.as_str() {
            "$set" => {
                for (path, value) in fields {
                    set_path(doc, path, value.clone())?;
                }
            }
            "$inc" => {
                for (path, delta) in fields {
                    let value = inc_value(get_path(doc, path), delta)?;
                    set_path(doc, path, value)?;
                }
            }
            other => return Err(StoreError::Codec(format!("unsupported update operator {}", other))),
        }
    }
    Ok(())
}
