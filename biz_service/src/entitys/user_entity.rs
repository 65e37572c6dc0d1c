use crate::entitys::{deserialize_object_id_as_hex_string, serialize_hex_string_as_object_id};
use common::index_trait::MongoIndexModelProvider;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// 用户账号，存储于 `users` 集合
///
/// 邮箱、手机、用户名三者各自唯一；用户名以小写形式建立索引，`raw_name` 保留原始大小写。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MongoDeriveMongoIndex)]
#[serde(rename_all = "camelCase")]
#[mongo_index(fields["email"], unique)]
#[mongo_index(fields["phone"], unique)]
#[mongo_index(fields["name"], unique)]
pub struct AccountEntity {
    /// ObjectId（十六进制字符串形式）
    #[serde(
        rename = "_id",
        serialize_with = "serialize_hex_string_as_object_id",
        deserialize_with = "deserialize_object_id_as_hex_string"
    )]
    pub id: String,
    /// 登录邮箱，全小写
    pub email: String,
    /// 登录手机，不含 +86
    pub phone: String,
    /// 用户名，全小写，用于索引
    pub name: String,
    /// 原始用户名
    pub raw_name: String,
    /// 用户等级
    #[serde(default)]
    pub level: i32,
    /// 注册时间
    pub create_time: DateTime,
    /// 已绑定的外部应用
    #[serde(default)]
    pub auth: Vec<AppBinding>,
    #[serde(default)]
    pub info: Profile,
    pub secure: SecureInfo,
    #[serde(default)]
    pub dev: DevStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppBinding {
    /// 应用的 ObjectId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

/// 个人资料，字段均可选；未设置的字段不写入文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Profile {
    /// 头像URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// 个人简介
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<DateTime>,
    /// 联系邮箱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// 昵称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// 联系电话
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 个人URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureInfo {
    /// 经过加盐与多次哈希的密码
    pub password: String,
    /// 盐
    pub salt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DevStats {
    #[serde(default)]
    pub app: DevCount,
    #[serde(default)]
    pub org: DevCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DevCount {
    #[serde(default)]
    pub own: i64,
    #[serde(default)]
    pub member: i64,
}

/// 开发者计数器，字符串形式即 `dev` 下的字段路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
pub enum DevCounter {
    #[strum(serialize = "app.own")]
    AppOwn,
    #[strum(serialize = "app.member")]
    AppMember,
    #[strum(serialize = "org.own")]
    OrgOwn,
    #[strum(serialize = "org.member")]
    OrgMember,
}

impl DevCounter {
    /// 文档中的完整字段路径，例如 `dev.app.own`
    pub fn field_path(&self) -> String {
        format!("dev.{}", self.as_ref())
    }

    pub fn read(&self, dev: &DevStats) -> i64 {
        match self {
            DevCounter::AppOwn => dev.app.own,
            DevCounter::AppMember => dev.app.member,
            DevCounter::OrgOwn => dev.org.own,
            DevCounter::OrgMember => dev.org.member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};
    use strum::IntoEnumIterator;

    fn sample() -> AccountEntity {
        AccountEntity {
            id: ObjectId::new().to_hex(),
            email: "a@example.com".into(),
            phone: "13800000000".into(),
            name: "alice".into(),
            raw_name: "Alice".into(),
            level: 0,
            create_time: DateTime::now(),
            auth: vec![],
            info: Profile { nickname: Some("ally".into()), ..Default::default() },
            secure: SecureInfo { password: "digest".into(), salt: "salt".into() },
            dev: DevStats::default(),
        }
    }

    #[test]
    fn test_document_layout() {
        let account = sample();
        let doc = bson::to_document(&account).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap().to_hex(), account.id);
        assert_eq!(doc.get_str("rawName").unwrap(), "Alice");
        assert!(doc.get_datetime("createTime").is_ok());
        assert_eq!(doc.get_document("info").unwrap(), &doc! { "nickname": "ally" });
        assert_eq!(doc.get_document("dev").unwrap(), &doc! { "app": { "own": 0_i64, "member": 0_i64 }, "org": { "own": 0_i64, "member": 0_i64 } });

        let back: AccountEntity = bson::from_document(doc).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_missing_defaults() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "email": "b@example.com",
            "phone": "1",
            "name": "bob",
            "rawName": "Bob",
            "createTime": DateTime::now(),
            "secure": { "password": "p", "salt": "s" },
        };
        let account: AccountEntity = bson::from_document(doc).unwrap();
        assert_eq!(account.level, 0);
        assert_eq!(account.dev, DevStats::default());
        assert_eq!(account.info, Profile::default());
        assert!(account.auth.is_empty());
    }

    #[test]
    fn test_unique_indexes() {
        let models = AccountEntity::index_models();
        let keys: Vec<String> = models.iter().map(|m| m.keys.keys().next().unwrap().clone()).collect();
        assert_eq!(keys, vec!["email", "phone", "name"]);
        for model in &models {
            let options = model.options.as_ref().unwrap();
            assert_eq!(options.unique, Some(true));
        }
        assert_eq!(models[0].options.as_ref().unwrap().name.as_deref(), Some("email_1"));
    }

    #[test]
    fn test_dev_counter_paths() {
        let paths: Vec<String> = DevCounter::iter().map(|c| c.field_path()).collect();
        assert_eq!(paths, vec!["dev.app.own", "dev.app.member", "dev.org.own", "dev.org.member"]);
        assert_eq!("org.member".parse::<DevCounter>().unwrap(), DevCounter::OrgMember);
        assert!("bogus.path".parse::<DevCounter>().is_err());
        assert!("dev.app.own".parse::<DevCounter>().is_err());
    }
}
