//! Infrastructure layer: invoice storage backends and email notifications.

pub mod database;
pub mod notification;

pub use database::{
    open_database, DatabaseConfig, DatabaseError, DatabaseKind, DatabaseResult, InvoiceDatabase,
};
pub use notification::{EmailService, EmailSettings, LogMailer, MailError, MailMessage, Mailer};
