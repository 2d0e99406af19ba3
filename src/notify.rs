//! Fire-and-forget mail notification.
//!
//! Invoked in-line after a successful deletion, before the deletion is
//! committed. Nothing consumes a return value and nothing retries; a real
//! transport would slot in behind the same trait.

/// Fire-and-forget notification interface.
pub trait MailService: Send + Sync + std::fmt::Debug {
    fn send_email(&self, subject: &str, message: &str);
}

/// Mail service that only writes to the application log.
#[derive(Debug)]
pub struct LocalMailService {
    mail_from: String,
    mail_to: String,
}

impl LocalMailService {
    pub fn new(mail_from: String, mail_to: String) -> Self {
        Self { mail_from, mail_to }
    }
}

impl MailService for LocalMailService {
    fn send_email(&self, subject: &str, message: &str) {
        log::info!(
            "Mail from {} to {}, with LocalMailService",
            self.mail_from,
            self.mail_to
        );
        log::info!("Subject: {}", subject);
        log::info!("Message: {}", message);
    }
}
