use std::fs;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::Value;
use tracing::info;

use crate::errors::DeliveryError;
use crate::service::otp_registry::OtpMailer;

const OTP_TEMPLATE_PATH: &str = "./templates/otp_email.html";

pub struct EmailService {
    mailer: SmtpTransport,
    from_address: String,
    platform_name: String,
}

impl EmailService {
    pub fn new(
        smtp_host: &str,
        smtp_user: &str,
        smtp_pass: &str,
        platform_name: &str,
    ) -> Result<Self, DeliveryError> {
        let creds = Credentials::new(smtp_user.to_string(), smtp_pass.to_string());

        let mailer = SmtpTransport::relay(smtp_host)?.credentials(creds).build();

        Ok(Self {
            mailer,
            from_address: smtp_user.to_string(),
            platform_name: platform_name.to_string(),
        })
    }

    fn load_template(path: &str) -> Result<String, DeliveryError> {
        Ok(fs::read_to_string(path)?)
    }

    fn render(template: &str, data: &Value) -> String {
        let mut body = template.to_owned();
        if let Some(map) = data.as_object() {
            for (key, value) in map {
                let placeholder = format!("{{{{{key}}}}}");
                body = body.replace(&placeholder, value.as_str().unwrap_or_default());
            }
        }
        body
    }

    pub fn send_email(
        &self,
        to: &str,
        subject: &str,
        template_path: &str,
        data: &Value,
    ) -> Result<(), DeliveryError> {
        let body = Self::render(&Self::load_template(template_path)?, data);

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.mailer.send(&email)?;
        info!(to, subject, "sent mail");

        Ok(())
    }
}

impl OtpMailer for EmailService {
    fn send_code(&self, to: &str, code: &str) -> Result<(), DeliveryError> {
        let data = serde_json::json!({
            "otp": code,
            "platformName": self.platform_name,
        });
        self.send_email(to, "Verification Code", OTP_TEMPLATE_PATH, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholders() {
        let template = "<p>Hi from {{platformName}}, your code is {{otp}}.</p>";
        let data = serde_json::json!({ "platformName": "Taskdeck", "otp": "042137" });

        assert_eq!(
            EmailService::render(template, &data),
            "<p>Hi from Taskdeck, your code is 042137.</p>"
        );
    }

    #[test]
    fn render_ignores_unknown_placeholders() {
        let template = "{{otp}} and {{mystery}}";
        let data = serde_json::json!({ "otp": "000042" });

        assert_eq!(EmailService::render(template, &data), "000042 and {{mystery}}");
    }
}
