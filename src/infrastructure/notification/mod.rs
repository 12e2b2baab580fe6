mod smtp_notifier;
mod verification_email;

pub use smtp_notifier::SmtpNotifier;
pub use verification_email::{VerificationEmail, VerificationEmailComposer};
