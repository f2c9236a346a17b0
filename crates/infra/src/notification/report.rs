use std::fmt::{self, Write as _};

use chrono::NaiveDate;

/// Kinds of change collected in the daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportOperation {
    InvoiceAdded,
    InvoiceModified,
    InvoiceRemoved,
}

impl ReportOperation {
    pub const ALL: [ReportOperation; 3] = [
        ReportOperation::InvoiceAdded,
        ReportOperation::InvoiceModified,
        ReportOperation::InvoiceRemoved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportOperation::InvoiceAdded => "INVOICE_ADDED",
            ReportOperation::InvoiceModified => "INVOICE_MODIFIED",
            ReportOperation::InvoiceRemoved => "INVOICE_REMOVED",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            ReportOperation::InvoiceAdded => "Added invoices:",
            ReportOperation::InvoiceModified => "Modified invoices:",
            ReportOperation::InvoiceRemoved => "Removed invoices:",
        }
    }
}

impl fmt::Display for ReportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice numbers (or ids, for removals) touched since the last report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyReport {
    added: Vec<String>,
    modified: Vec<String>,
    removed: Vec<String>,
}

impl DailyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: ReportOperation, number: impl Into<String>) {
        self.list_mut(operation).push(number.into());
    }

    pub fn entries(&self, operation: ReportOperation) -> &[String] {
        match operation {
            ReportOperation::InvoiceAdded => &self.added,
            ReportOperation::InvoiceModified => &self.modified,
            ReportOperation::InvoiceRemoved => &self.removed,
        }
    }

    pub fn is_empty(&self) -> bool {
        ReportOperation::ALL
            .iter()
            .all(|op| self.entries(*op).is_empty())
    }

    /// Drop the entries that went out with `sent`, keeping anything recorded
    /// after that snapshot was taken.
    pub fn remove_sent(&mut self, sent: &DailyReport) {
        for operation in ReportOperation::ALL {
            let count = sent.entries(operation).len();
            let list = self.list_mut(operation);
            let count = count.min(list.len());
            list.drain(..count);
        }
    }

    /// Mail body for the report covering `date`.
    pub fn render(&self, date: NaiveDate) -> String {
        let mut body = String::new();
        let _ = write!(body, "\nReport of invoices - date: {date}\n");
        for operation in ReportOperation::ALL {
            let _ = write!(body, "\n{}\n", operation.heading());
            let entries = self.entries(operation);
            if entries.is_empty() {
                body.push_str("No invoices.\n");
            }
            for number in entries {
                body.push_str(number);
                body.push('\n');
            }
        }
        body
    }

    fn list_mut(&mut self, operation: ReportOperation) -> &mut Vec<String> {
        match operation {
            ReportOperation::InvoiceAdded => &mut self.added,
            ReportOperation::InvoiceModified => &mut self.modified,
            ReportOperation::InvoiceRemoved => &mut self.removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sections_in_order() {
        let mut report = DailyReport::new();
        report.record(ReportOperation::InvoiceAdded, "FV/1");
        report.record(ReportOperation::InvoiceAdded, "FV/2");
        report.record(ReportOperation::InvoiceRemoved, "7");

        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(
            report.render(date),
            "\nReport of invoices - date: 2024-03-14\n\
             \nAdded invoices:\nFV/1\nFV/2\n\
             \nModified invoices:\nNo invoices.\n\
             \nRemoved invoices:\n7\n"
        );
    }

    #[test]
    fn remove_sent_keeps_later_entries() {
        let mut report = DailyReport::new();
        report.record(ReportOperation::InvoiceModified, "FV/1");
        let snapshot = report.clone();
        report.record(ReportOperation::InvoiceModified, "FV/2");

        report.remove_sent(&snapshot);
        assert_eq!(report.entries(ReportOperation::InvoiceModified), ["FV/2"]);
        assert!(!report.is_empty());

        let snapshot = report.clone();
        report.remove_sent(&snapshot);
        assert!(report.is_empty());
    }
}
