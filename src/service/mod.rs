pub mod email_service;
pub mod otp_registry;
pub mod task_service;
pub mod token_service;
pub mod user_service;
