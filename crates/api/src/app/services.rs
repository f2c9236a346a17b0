//! Service wiring: the invoice service over the configured database plus the
//! email notification service.

use std::sync::Arc;

use invoicebook_core::InvoiceId;
use invoicebook_infra::notification::{EmailService, EmailSettings, LogMailer, Mailer, ReportOperation};
use invoicebook_infra::{open_database, DatabaseResult, InvoiceDatabase};
use invoicebook_invoicing::Invoice;

use crate::config::AppConfig;

/// Invoice operations with their notification side effects.
///
/// Successful saves, updates and deletes are recorded in the daily report; a
/// save also sends the "invoice created" mail. Mail failures are logged and
/// never fail the operation.
pub struct InvoiceService {
    database: Arc<dyn InvoiceDatabase>,
    email: Arc<EmailService>,
}

impl InvoiceService {
    pub fn new(database: Arc<dyn InvoiceDatabase>, email: Arc<EmailService>) -> Self {
        Self { database, email }
    }

    pub async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        let id = self.database.save(invoice.clone()).await?;
        let invoice = invoice.with_id(id);

        self.email
            .add_to_report(ReportOperation::InvoiceAdded, invoice.invoice_number());
        if let Err(err) = self.email.send_invoice_created_mail(&invoice).await {
            tracing::error!(invoice_id = %id, error = %err, "failed to send invoice created mail");
        }
        Ok(id)
    }

    pub async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        self.database.get_by_id(id).await
    }

    pub async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        self.database.list().await
    }

    pub async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        let number = invoice.invoice_number().to_string();
        let updated = self.database.update(id, invoice).await?;
        if updated {
            self.email.add_to_report(ReportOperation::InvoiceModified, number);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        let deleted = self.database.delete(id).await?;
        if deleted {
            self.email
                .add_to_report(ReportOperation::InvoiceRemoved, id.to_string());
        }
        Ok(deleted)
    }
}

/// Shared application services, handed to handlers through an `Extension`.
pub struct AppServices {
    pub invoices: InvoiceService,
    pub email: Arc<EmailService>,
}

impl AppServices {
    pub fn new(
        database: Arc<dyn InvoiceDatabase>,
        mailer: Arc<dyn Mailer>,
        settings: EmailSettings,
    ) -> Self {
        let email = Arc::new(EmailService::new(mailer, settings));
        Self {
            invoices: InvoiceService::new(database, email.clone()),
            email,
        }
    }
}

/// Open the configured database and wire the services around it.
pub async fn build_services(config: &AppConfig) -> DatabaseResult<AppServices> {
    let database = open_database(&config.database).await?;
    Ok(AppServices::new(
        database,
        Arc::new(LogMailer),
        config.email.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use invoicebook_infra::database::InMemoryDatabase;
    use invoicebook_infra::notification::RecordingMailer;
    use invoicebook_invoicing::{Address, Company, Vat};
    use rust_decimal::Decimal;

    fn invoice(number: &str) -> Invoice {
        let company = Company::new(
            "XYZ",
            "123-456-78-90",
            Address::new("Baker Street 1/2", "12-345", "Warsaw"),
        );
        Invoice::new(
            number,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            company.clone(),
            company,
        )
        .with_entry("Tire", 4, Decimal::ONE, Vat::Vat23)
    }

    fn services() -> (Arc<RecordingMailer>, AppServices) {
        let mailer = Arc::new(RecordingMailer::new());
        let services = AppServices::new(
            Arc::new(InMemoryDatabase::new()),
            mailer.clone(),
            EmailSettings::default(),
        );
        (mailer, services)
    }

    #[tokio::test]
    async fn save_records_report_and_sends_mail() {
        let (mailer, services) = services();
        let id = services.invoices.save(invoice("FV/1")).await.unwrap();

        assert_eq!(id, InvoiceId::FIRST);
        assert_eq!(
            services.email.report().entries(ReportOperation::InvoiceAdded),
            ["FV/1"]
        );
        assert_eq!(mailer.sent()[0].subject, "New Invoice has been added.");
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_save() {
        let (mailer, services) = services();
        mailer.set_failing(true);

        let id = services.invoices.save(invoice("FV/1")).await.unwrap();
        assert!(services.invoices.get_by_id(id).await.unwrap().is_some());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn only_successful_changes_are_reported() {
        let (_mailer, services) = services();
        let id = services.invoices.save(invoice("FV/1")).await.unwrap();
        let missing = InvoiceId::new(42);

        assert!(!services.invoices.update(missing, invoice("FV/x")).await.unwrap());
        assert!(!services.invoices.delete(missing).await.unwrap());
        assert!(services.invoices.update(id, invoice("FV/1b")).await.unwrap());
        assert!(services.invoices.delete(id).await.unwrap());

        let report = services.email.report();
        assert_eq!(report.entries(ReportOperation::InvoiceModified), ["FV/1b"]);
        assert_eq!(report.entries(ReportOperation::InvoiceRemoved), ["1"]);
    }
}
