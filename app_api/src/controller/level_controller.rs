use crate::handlers::level_handler::LevelController;
use crate::result::{result_data, result_list};
use actix_web::HttpResponse;
use actix_web::web::Bytes;
use async_trait::async_trait;
use biz_service::biz_service::level_request_service::LevelRequestService;
use biz_service::biz_service::user_service::UserService;
use biz_service::entitys::level_request_entity::LevelRequestEntity;
use common::config::LevelEntry;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequestDto {
    #[validate(length(equal = 24, message = "userId 格式错误"))]
    pub user_id: String,
    #[validate(range(min = 0, message = "等级不能为负数"))]
    pub level: i32,
    #[validate(length(max = 200, message = "申请理由过长"))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LevelView {
    pub level: i32,
    pub name: String,
}

impl From<&LevelEntry> for LevelView {
    fn from(entry: &LevelEntry) -> Self {
        Self { level: entry.level, name: entry.name.clone() }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequestView {
    pub id: String,
    pub user_id: String,
    pub current_level: i32,
    pub level: i32,
    pub reason: Option<String>,
    pub status: String,
    /// 毫秒时间戳
    pub create_time: i64,
}

impl From<LevelRequestEntity> for LevelRequestView {
    fn from(entity: LevelRequestEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            current_level: entity.current_level,
            level: entity.level,
            reason: entity.reason,
            status: entity.status.to_string(),
            create_time: entity.create_time.timestamp_millis(),
        }
    }
}

pub struct LevelCtrl {
    levels: Vec<LevelEntry>,
    user_service: UserService,
    request_service: LevelRequestService,
}

impl LevelCtrl {
    pub fn new(levels: Vec<LevelEntry>, user_service: UserService, request_service: LevelRequestService) -> Self {
        Self { levels, user_service, request_service }
    }
}

#[async_trait(?Send)]
impl LevelController for LevelCtrl {
    async fn get(&self) -> Result<HttpResponse, AppError> {
        let list: Vec<LevelView> = self.levels.iter().map(LevelView::from).collect();
        Ok(HttpResponse::Ok().json(result_list(list)))
    }

    async fn get_users(&self) -> Result<HttpResponse, AppError> {
        let pending = self.request_service.list_pending().await?;
        let list: Vec<LevelRequestView> = pending.into_iter().map(LevelRequestView::from).collect();
        Ok(HttpResponse::Ok().json(result_list(list)))
    }

    async fn post_users(&self, body: Bytes) -> Result<HttpResponse, AppError> {
        let dto: LevelRequestDto = serde_json::from_slice(&body)?;
        dto.validate()?;
        if !self.levels.iter().any(|entry| entry.level == dto.level) {
            return Err(AppError::Validation(format!("unknown level {}", dto.level)));
        }
        let account = self.user_service.get_by_id(&dto.user_id).await?.ok_or(AppError::NotFound)?;
        if account.level == dto.level {
            return Err(AppError::Validation(format!("already at level {}", dto.level)));
        }
        let id = self.request_service.submit(&account, dto.level, dto.reason).await?;
        Ok(HttpResponse::Ok().json(result_data(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::level_handler;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use biz_service::biz_service::user_service::NewAccount;
    use biz_service::entitys::user_entity::AccountEntity;
    use common::MemoryRepository;
    use mongodb::bson::oid::ObjectId;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn levels() -> Vec<LevelEntry> {
        vec![LevelEntry { level: 0, name: "normal".into() }, LevelEntry { level: 1, name: "developer".into() }]
    }

    async fn setup() -> (web::Data<LevelCtrl>, String) {
        let users = UserService::with_repository(Arc::new(MemoryRepository::<AccountEntity>::indexed()));
        let requests = LevelRequestService::with_repository(Arc::new(MemoryRepository::<LevelRequestEntity>::indexed()));
        users
            .add(NewAccount {
                email: "dev@example.com".into(),
                phone: "13800000000".into(),
                name: "Dev".into(),
                nickname: "dev".into(),
                password: "digest".into(),
                salt: "salt".into(),
            })
            .await
            .unwrap();
        let user_id = users.get_by_name("dev").await.unwrap().unwrap().id;
        (web::Data::new(LevelCtrl::new(levels(), users, requests)), user_id)
    }

    fn apply(body: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/level/users").set_json(body)
    }

    #[actix_web::test]
    async fn test_list_levels() {
        let (ctrl, _) = setup().await;
        let app = test::init_service(App::new().configure(|cfg| level_handler::configure(cfg, ctrl.clone()))).await;
        let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/level/").to_request()).await;
        assert_eq!(body, json!({"code":200,"data":[{"level":0,"name":"normal"},{"level":1,"name":"developer"}]}));
    }

    #[actix_web::test]
    async fn test_apply_then_list_pending() {
        let (ctrl, user_id) = setup().await;
        let app = test::init_service(App::new().configure(|cfg| level_handler::configure(cfg, ctrl.clone()))).await;

        let resp = test::call_service(&app, apply(json!({"userId": user_id, "level": 1, "reason": "apps"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/level/users").to_request()).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["userId"], json!(user_id));
        assert_eq!(data[0]["currentLevel"], json!(0));
        assert_eq!(data[0]["level"], json!(1));
        assert_eq!(data[0]["status"], json!("pending"));
    }

    #[actix_web::test]
    async fn test_apply_rejections() {
        let (ctrl, user_id) = setup().await;
        let app = test::init_service(App::new().configure(|cfg| level_handler::configure(cfg, ctrl.clone()))).await;

        let unknown_level = apply(json!({"userId": user_id, "level": 7})).to_request();
        assert_eq!(test::call_service(&app, unknown_level).await.status(), StatusCode::BAD_REQUEST);

        let same_level = apply(json!({"userId": user_id, "level": 0})).to_request();
        assert_eq!(test::call_service(&app, same_level).await.status(), StatusCode::BAD_REQUEST);

        let negative = apply(json!({"userId": user_id, "level": -1})).to_request();
        assert_eq!(test::call_service(&app, negative).await.status(), StatusCode::BAD_REQUEST);

        let short_id = apply(json!({"userId": "abc", "level": 1})).to_request();
        assert_eq!(test::call_service(&app, short_id).await.status(), StatusCode::BAD_REQUEST);

        let missing_user = apply(json!({"userId": ObjectId::new().to_hex(), "level": 1})).to_request();
        assert_eq!(test::call_service(&app, missing_user).await.status(), StatusCode::NOT_FOUND);

        // 24 位但不是十六进制
        let bad_hex = apply(json!({"userId": "zzzzzzzzzzzzzzzzzzzzzzzz", "level": 1})).to_request();
        assert_eq!(test::call_service(&app, bad_hex).await.status(), StatusCode::BAD_REQUEST);

        let malformed = test::TestRequest::post().uri("/level/users").set_payload("{not json").to_request();
        assert_eq!(test::call_service(&app, malformed).await.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/level/users").to_request()).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
