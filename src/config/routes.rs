use actix_web::web;

use crate::controllers::{
    auth_controller::AuthController, otp_controller::OtpController,
    task_controller::TaskController, user_controller::UserController,
};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/auth/login", web::post().to(AuthController::login))
        .route("/api/auth/register", web::post().to(AuthController::register))
        .route("/api/otp/send", web::post().to(OtpController::send))
        .route("/api/otp/verify", web::post().to(OtpController::verify))
        .route("/api/user/profile", web::get().to(UserController::profile))
        .route("/api/tasks/{user_id}", web::get().to(TaskController::list))
        .route("/api/new-task", web::post().to(TaskController::create))
        .route(
            "/api/tasks/status/{task_id}",
            web::patch().to(TaskController::update_status),
        )
        .route(
            "/api/tasks/edit/{task_id}",
            web::put().to(TaskController::edit),
        )
        .route(
            "/api/tasks/delete/{task_id}",
            web::delete().to(TaskController::delete),
        );
}
