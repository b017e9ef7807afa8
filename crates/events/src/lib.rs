//! Dükkan outbound notifications.
//!
//! - [`delivery`]: SMTP email delivery ([`SmtpMailer`]) implementing the core
//!   mail port.
//! - [`template`]: HTML rendering of the cart reminder email.
//! - [`ReminderDispatcher`]: cooldown-guarded cart reminder sending.

pub mod delivery;
pub mod reminder;
pub mod template;

pub use delivery::email::{EmailConfig, EmailError, SmtpMailer};
pub use reminder::ReminderDispatcher;
