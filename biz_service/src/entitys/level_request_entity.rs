use crate::entitys::{deserialize_object_id_as_hex_string, serialize_hex_string_as_object_id};
use common::index_trait::MongoIndexModelProvider;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// 等级申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// 用户等级变更申请，存储于 `level_request` 集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MongoDeriveMongoIndex)]
#[serde(rename_all = "camelCase")]
#[mongo_index(fields["userId"])]
#[mongo_index(fields["status", "createTime"], name("status_create_time"))]
pub struct LevelRequestEntity {
    #[serde(
        rename = "_id",
        serialize_with = "serialize_hex_string_as_object_id",
        deserialize_with = "deserialize_object_id_as_hex_string"
    )]
    pub id: String,
    /// 申请人
    pub user_id: String,
    /// 提交时的等级
    pub current_level: i32,
    /// 申请的目标等级
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    pub create_time: DateTime,
}
