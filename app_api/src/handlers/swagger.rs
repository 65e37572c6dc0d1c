use crate::controller::level_controller::{LevelRequestDto, LevelRequestView, LevelView};
use actix_web::{HttpResponse, get, web};
use common::errors::AppError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::common_handler::status,
        crate::handlers::level_handler::level_list,
        crate::handlers::level_handler::level_users,
        crate::handlers::level_handler::level_apply,
    ),
    components(schemas(LevelView, LevelRequestDto, LevelRequestView)),
    tags(
        (name = "Common", description = "Service endpoints"),
        (name = "Level", description = "用户等级")
    )
)]
struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}

#[get("/openapi.json")]
async fn openapi_json() -> Result<HttpResponse, AppError> {
    let json = ApiDoc::openapi().to_json()?;
    Ok(HttpResponse::Ok().content_type("application/json").body(json))
}
