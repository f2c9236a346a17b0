//! Email notifications: the "invoice created" mail and the daily report.

mod mail;
mod report;
mod scheduler;
mod service;

pub use mail::{LogMailer, MailError, MailMessage, Mailer, RecordingMailer};
pub use report::{DailyReport, ReportOperation};
pub use scheduler::{spawn_daily_report, until_next_midnight};
pub use service::{EmailService, EmailSettings};
