use crate::controller::level_controller::{LevelRequestDto, LevelRequestView, LevelView};
use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use async_trait::async_trait;
use common::errors::AppError;

/// 用户等级相关接口的实现方
///
/// 路由本身不解析请求、不做校验，直接把调用交给控制器。
#[async_trait(?Send)]
pub trait LevelController: 'static {
    /// 获得用户等级列表
    async fn get(&self) -> Result<HttpResponse, AppError>;
    /// 获取申请列表
    async fn get_users(&self) -> Result<HttpResponse, AppError>;
    /// 申请修改用户等级，`body` 为原始请求体
    async fn post_users(&self, body: Bytes) -> Result<HttpResponse, AppError>;
}

pub fn configure<C: LevelController>(cfg: &mut web::ServiceConfig, ctrl: web::Data<C>) {
    cfg.service(
        web::scope("/level")
            .app_data(ctrl)
            .service(web::resource("").route(web::get().to(level_list::<C>)))
            .service(web::resource("/").route(web::get().to(level_list::<C>)))
            .service(
                web::resource("/users")
                    .route(web::get().to(level_users::<C>))
                    .route(web::post().to(level_apply::<C>)),
            ),
    );
}

#[utoipa::path(
    get,
    path = "/level/",
    tag = "Level",
    summary = "获得用户等级列表",
    responses(
        (status = 200, description = "等级列表", body = [LevelView])
    )
)]
pub async fn level_list<C: LevelController>(ctrl: web::Data<C>) -> Result<HttpResponse, AppError> {
    ctrl.get().await
}

#[utoipa::path(
    get,
    path = "/level/users",
    tag = "Level",
    summary = "获取待审核的等级申请",
    responses(
        (status = 200, description = "申请列表", body = [LevelRequestView])
    )
)]
pub async fn level_users<C: LevelController>(ctrl: web::Data<C>) -> Result<HttpResponse, AppError> {
    ctrl.get_users().await
}

#[utoipa::path(
    post,
    path = "/level/users",
    tag = "Level",
    summary = "申请修改用户等级",
    request_body = LevelRequestDto,
    responses(
        (status = 200, description = "返回申请 id"),
        (status = 400, description = "参数错误"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn level_apply<C: LevelController>(ctrl: web::Data<C>, body: Bytes) -> Result<HttpResponse, AppError> {
    ctrl.post_users(body).await
}
