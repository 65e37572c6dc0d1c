pub mod index_trait;
pub mod memory_repository;
pub mod query_builder;
pub mod repository_util;

pub use index_trait::MongoIndexModelProvider;
pub use memory_repository::MemoryRepository;
pub use query_builder::QueryBuilder;
pub use repository_util::{BaseRepository, Repository, parse_object_id};
