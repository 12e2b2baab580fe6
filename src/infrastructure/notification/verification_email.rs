use tera::{Context, Tera};

use crate::domain::registration::errors::NotificationError;
use crate::domain::registration::value_objects::VerificationToken;

const TEMPLATE_NAME: &str = "user_verification.html";
const TEMPLATE_SOURCE: &str = include_str!("../../../templates/email/user_verification.html");

pub const VERIFICATION_SUBJECT: &str = "Verify your email address";

/// Rendered verification message
#[derive(Debug, Clone)]
pub struct VerificationEmail {
  pub subject: String,
  pub html_body: String,
}

/// Renders verification emails from the embedded HTML template
pub struct VerificationEmailComposer {
  tera: Tera,
  frontend_base_url: String,
}

impl VerificationEmailComposer {
  /// Creates a composer that links to `{frontend_base_url}/verify`
  pub fn new(frontend_base_url: impl Into<String>) -> Result<Self, NotificationError> {
    let mut tera = Tera::default();
    tera
      .add_raw_template(TEMPLATE_NAME, TEMPLATE_SOURCE)
      .map_err(|e| NotificationError::Template(e.to_string()))?;

    let frontend_base_url = frontend_base_url.into().trim_end_matches('/').to_string();

    Ok(Self {
      tera,
      frontend_base_url,
    })
  }

  /// Link the recipient follows to verify their address
  pub fn verification_url(&self, token: &VerificationToken) -> String {
    format!("{}/verify?token={}", self.frontend_base_url, token.as_str())
  }

  pub fn compose(&self, token: &VerificationToken) -> Result<VerificationEmail, NotificationError> {
    let mut context = Context::new();
    context.insert("subject", VERIFICATION_SUBJECT);
    context.insert("verification_url", &self.verification_url(token));

    let html_body = self
      .tera
      .render(TEMPLATE_NAME, &context)
      .map_err(|e| NotificationError::Template(e.to_string()))?;

    Ok(VerificationEmail {
      subject: VERIFICATION_SUBJECT.to_string(),
      html_body,
    })
  }
}
