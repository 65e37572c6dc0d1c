pub mod common_handler;
pub mod level_handler;
pub mod swagger;

use actix_web::web;
use level_handler::LevelController;

pub fn configure<C: LevelController>(cfg: &mut web::ServiceConfig, level_ctrl: web::Data<C>) {
    common_handler::configure(cfg);
    swagger::configure(cfg);
    level_handler::configure(cfg, level_ctrl);
}
