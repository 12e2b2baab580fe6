use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::verification_email::VerificationEmailComposer;
use crate::domain::registration::errors::NotificationError;
use crate::domain::registration::ports::Notifier;
use crate::domain::registration::value_objects::{Email, VerificationToken};
use crate::infrastructure::config::EmailConfig;

/// Notifier that delivers verification emails over authenticated SMTP (STARTTLS)
pub struct SmtpNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  sender: Mailbox,
  composer: VerificationEmailComposer,
}

impl SmtpNotifier {
  /// Creates a new notifier from the `email` config section
  ///
  /// No connection is opened here; the transport connects per send.
  pub fn new(config: &EmailConfig) -> Result<Self, NotificationError> {
    let sender = sender_mailbox(&config.sender_name, &config.sender_email)?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
      .map_err(|e| NotificationError::Transport(e.to_string()))?
      .port(config.smtp_port)
      .credentials(Credentials::new(
        config.smtp_username.clone(),
        config.smtp_password.clone(),
      ))
      .build();

    Ok(Self {
      transport,
      sender,
      composer: VerificationEmailComposer::new(config.frontend_base_url.clone())?,
    })
  }

  fn build_message(
    &self,
    address: &Email,
    token: &VerificationToken,
  ) -> Result<Message, NotificationError> {
    let recipient: Address = address
      .as_str()
      .parse()
      .map_err(|e: lettre::address::AddressError| {
        NotificationError::InvalidAddress(format!("{}: {}", address, e))
      })?;
    let email = self.composer.compose(token)?;

    Message::builder()
      .from(self.sender.clone())
      .to(Mailbox::new(None, recipient))
      .subject(email.subject)
      .header(ContentType::TEXT_HTML)
      .body(email.html_body)
      .map_err(|e| NotificationError::MessageBuild(e.to_string()))
  }
}

fn sender_mailbox(name: &str, email: &str) -> Result<Mailbox, NotificationError> {
  let address: Address = email
    .parse()
    .map_err(|e: lettre::address::AddressError| {
      NotificationError::InvalidAddress(format!("{}: {}", email, e))
    })?;
  let name = if name.trim().is_empty() {
    None
  } else {
    Some(name.to_string())
  };

  Ok(Mailbox::new(name, address))
}

#[async_trait]
impl Notifier for SmtpNotifier {
  async fn send_verification_email(
    &self,
    address: &Email,
    token: &VerificationToken,
  ) -> Result<(), NotificationError> {
    let message = self.build_message(address, token)?;

    self
      .transport
      .send(message)
      .await
      .map_err(|e| NotificationError::Transport(e.to_string()))?;

    tracing::debug!(recipient = %address, "Verification email sent");

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> EmailConfig {
    EmailConfig {
      smtp_host: "smtp.example.com".to_string(),
      smtp_port: 587,
      smtp_username: "mailer".to_string(),
      smtp_password: "secret".to_string(),
      sender_name: "Registrar".to_string(),
      sender_email: "no-reply@example.com".to_string(),
      frontend_base_url: "https://app.example.com".to_string(),
    }
  }

  #[test]
  fn test_message_is_addressed_to_recipient() {
    let notifier = SmtpNotifier::new(&config()).unwrap();
    let address = Email::new("user@email.com").unwrap();

    let message = notifier
      .build_message(&address, &VerificationToken::new("abc"))
      .unwrap();

    let envelope = message.envelope();
    assert_eq!(
      envelope.from().map(|a| a.to_string()),
      Some("no-reply@example.com".to_string())
    );
    assert_eq!(
      envelope.to().iter().map(|a| a.to_string()).collect::<Vec<_>>(),
      vec!["user@email.com".to_string()]
    );
  }

  #[test]
  fn test_invalid_sender_is_rejected() {
    let mut config = config();
    config.sender_email = "not an address".to_string();

    assert!(matches!(
      SmtpNotifier::new(&config),
      Err(NotificationError::InvalidAddress(_))
    ));
  }

  #[test]
  fn test_blank_sender_name_is_omitted() {
    let mailbox = sender_mailbox(" ", "no-reply@example.com").unwrap();

    assert!(mailbox.name.is_none());
  }
}
