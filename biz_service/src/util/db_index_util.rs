use common::errors::StoreError;
use log::{error, info};
use mongodb::bson::Document;
use mongodb::error::ErrorKind;
use mongodb::{Collection, IndexModel};

/// 集合尚未创建时 listIndexes 返回的错误码
const NAMESPACE_NOT_FOUND: i32 = 26;

async fn existing_index_names(coll: &Collection<Document>) -> Result<Vec<String>, StoreError> {
    match coll.list_index_names().await {
        Ok(names) => Ok(names),
        Err(e) => match e.kind.as_ref() {
            ErrorKind::Command(ce) if ce.code == NAMESPACE_NOT_FOUND => Ok(vec![]),
            _ => Err(e.into()),
        },
    }
}

/// 按名称比对，只创建集合中尚不存在的索引
pub async fn index_create(coll: Collection<Document>, target_list: Vec<IndexModel>) -> Result<(), StoreError> {
    let existing = existing_index_names(&coll).await?;
    for target in target_list {
        let name = target.options.as_ref().and_then(|o| o.name.clone());
        if name.as_ref().is_some_and(|n| existing.contains(n)) {
            continue;
        }
        match coll.create_index(target.clone()).await {
            Ok(_) => info!("✅ 创建索引成功: {}.{}", coll.name(), target.keys),
            Err(e) => {
                error!("❌ 创建索引失败: {:?}", e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}
