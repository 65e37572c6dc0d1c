use mongodb::bson::{Bson, Document};

/// 等值过滤条件构造器，字段支持点路径（如 `dev.app.own`）
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    current: Document,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.current.insert(field, value.into());
        self
    }

    pub fn build(self) -> Document {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_build_eq() {
        let filter = QueryBuilder::new().eq("status", "pending").eq("level", 2).build();
        assert_eq!(filter, doc! { "status": "pending", "level": 2 });
    }

    #[test]
    fn test_empty_builder() {
        assert_eq!(QueryBuilder::new().build(), doc! {});
    }
}
