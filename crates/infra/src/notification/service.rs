use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Days, Local, NaiveDate};

use invoicebook_invoicing::Invoice;

use super::mail::{MailError, MailMessage, Mailer};
use super::report::{DailyReport, ReportOperation};

pub const INVOICE_CREATED_SUBJECT: &str = "New Invoice has been added.";
pub const DAILY_REPORT_SUBJECT: &str = "Daily report of invoices.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    /// Address receiving both the per-invoice mails and the daily report.
    pub recipient: String,
    pub report_enabled: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            recipient: "invoices@localhost".to_string(),
            report_enabled: false,
        }
    }
}

/// Sends invoice notifications and collects the daily report.
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    settings: EmailSettings,
    report: Mutex<DailyReport>,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, settings: EmailSettings) -> Self {
        Self {
            mailer,
            settings,
            report: Mutex::new(DailyReport::new()),
        }
    }

    pub fn add_to_report(&self, operation: ReportOperation, number: impl Into<String>) {
        self.lock_report().record(operation, number);
    }

    /// Snapshot of the entries waiting for the next report.
    pub fn report(&self) -> DailyReport {
        self.lock_report().clone()
    }

    pub async fn send_invoice_created_mail(&self, invoice: &Invoice) -> Result<(), MailError> {
        self.send(INVOICE_CREATED_SUBJECT, invoice_created_body(invoice))
            .await
    }

    /// Send the report covering yesterday.
    pub async fn send_report(&self) -> bool {
        let yesterday = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN);
        self.send_report_for(yesterday).await
    }

    /// Send the report for `date` and clear what was sent.
    ///
    /// Returns `false` when reports are disabled or the mail could not be sent;
    /// in the latter case the entries are kept for the next attempt.
    pub async fn send_report_for(&self, date: NaiveDate) -> bool {
        if !self.settings.report_enabled {
            return false;
        }

        let snapshot = self.report();
        match self.send(DAILY_REPORT_SUBJECT, snapshot.render(date)).await {
            Ok(()) => {
                self.lock_report().remove_sent(&snapshot);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to send the daily report");
                false
            }
        }
    }

    async fn send(&self, subject: &str, body: String) -> Result<(), MailError> {
        tracing::info!(subject, "sending mail");
        self.mailer
            .send(MailMessage {
                to: self.settings.recipient.clone(),
                subject: subject.to_string(),
                body,
            })
            .await
    }

    fn lock_report(&self) -> std::sync::MutexGuard<'_, DailyReport> {
        self.report.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn invoice_created_body(invoice: &Invoice) -> String {
    let buyer = invoice.buyer();
    let mut body = String::new();
    let _ = write!(
        body,
        "\n\nInvoice number: {}\n\nBuyer:\n{}\n{}\n{} {}\nNIP: {}\n\nInvoice entries:\n",
        invoice.invoice_number(),
        buyer.name,
        buyer.address.street_address,
        buyer.address.postal_code,
        buyer.address.city,
        buyer.tax_identification_number,
    );
    for entry in invoice.invoice_entries() {
        let _ = writeln!(
            body,
            "name: {}, quantity: {}, value: {}, tax value: {}, vat rate: {}",
            entry.description(),
            entry.quantity(),
            entry.value(),
            entry.vat_value(),
            entry.vat_rate(),
        );
    }
    body
}
