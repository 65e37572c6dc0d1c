use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use app_api::controller::level_controller::LevelCtrl;
use app_api::handlers;
use biz_service::biz_service::init_indexes;
use biz_service::biz_service::level_request_service::LevelRequestService;
use biz_service::biz_service::user_service::UserService;
use common::config::{AppConfig, SysConfig};
use common::db::init_db;
use log::{LevelFilter, warn};
use std::str::FromStr;
use std::time::Duration;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 读取配置文件，可通过第一个参数指定
    let config_file = std::env::args().nth(1).unwrap_or_else(|| "api-config.toml".to_string());
    let app_cfg = AppConfig::new(&config_file).with_context(|| format!("failed to load {}", config_file))?;
    //初始化日志
    init_log(&app_cfg.get_sys());

    let db = init_db(&app_cfg.get_database()).await.context("MongoDB init error")?;
    init_indexes(&db).await?;
    let level_ctrl = web::Data::new(LevelCtrl::new(
        app_cfg.get_level().levels,
        UserService::new(&db),
        LevelRequestService::new(&db),
    ));

    let server = app_cfg.get_server();
    let address_and_port = format!("{}:{}", server.host, server.port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // 配置 控制器
            .configure(|cfg| {
                handlers::configure(cfg, level_ctrl.clone());
            })
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(Duration::from_secs(600))) // 允许 10 分钟超时
    .bind(address_and_port)?
    .run()
    .await?;
    Ok(())
}

fn init_log(sys: &SysConfig) {
    let level = sys
        .log_level
        .as_deref()
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();
}
