pub mod auth_controller;
pub mod otp_controller;
pub mod task_controller;
pub mod user_controller;
