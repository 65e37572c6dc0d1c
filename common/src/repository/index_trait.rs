use mongodb::IndexModel;

/// 实体声明的集合索引，一般由 `#[derive(MongoIndexModelProvider)]` 生成
pub trait MongoIndexModelProvider {
    fn index_models() -> Vec<IndexModel>;
}
