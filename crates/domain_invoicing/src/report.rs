//! Revenue reporting
//!
//! Aggregates invoices issued within a date range. Every invoice total is
//! recomputed through the calculation engine; nothing is read from stored
//! totals. Sums saturate at the `Decimal` bounds, and an invoice whose own
//! amounts cannot be computed is left out with a warning.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::invoice::InvoiceStatus;
use crate::ports::InvoiceRecord;

/// Client label used when an invoice has no resolvable client
pub const UNKNOWN_CLIENT_LABEL: &str = "Nepoznat";

/// Number of clients listed in [`RevenueReport::top_clients`]
pub const TOP_CLIENTS: usize = 5;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Maj", "Jun", "Jul", "Avg", "Sep", "Okt", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRevenue {
    pub client_name: String,
    pub total: Decimal,
    pub invoice_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub total: Decimal,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub total: Decimal,
    pub invoice_count: u32,
}

impl MonthRevenue {
    /// Short label such as `Maj 2024`
    pub fn label(&self) -> String {
        let parsed = self.month.split_once('-').and_then(|(year, month)| {
            let index = month.parse::<usize>().ok()?.checked_sub(1)?;
            MONTH_NAMES.get(index).map(|name| format!("{} {}", name, year))
        });
        parsed.unwrap_or_else(|| self.month.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub status: InvoiceStatus,
    pub invoice_count: u32,
    pub total: Decimal,
}

/// Revenue figures for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Sum of all invoice totals, VAT included
    pub total_revenue: Decimal,
    pub invoice_count: u32,
    pub paid_count: u32,
    /// Total revenue minus the revenue of paid invoices
    pub unpaid_amount: Decimal,
    /// Highest total first
    pub by_client: Vec<ClientRevenue>,
    /// Highest total first
    pub by_product: Vec<ProductRevenue>,
    /// Chronological
    pub by_month: Vec<MonthRevenue>,
    /// Statuses in draft, sent, paid order; only those present
    pub status_summary: Vec<StatusSummary>,
}

impl RevenueReport {
    /// Builds the report from invoices issued in `[from, to]`
    ///
    /// Records outside the range are ignored.
    pub fn build(records: &[InvoiceRecord], from: NaiveDate, to: NaiveDate) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut paid_revenue = Decimal::ZERO;
        let mut invoice_count = 0u32;
        let mut paid_count = 0u32;

        let mut clients: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();
        let mut products: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        let mut months: BTreeMap<String, (Decimal, u32)> = BTreeMap::new();
        let mut statuses: BTreeMap<u8, (InvoiceStatus, u32, Decimal)> = BTreeMap::new();

        for record in records {
            let invoice = &record.invoice;
            let issue_date = invoice.header.issue_date;
            if issue_date < from || issue_date > to {
                continue;
            }

            let Some(calculation) = invoice.checked_calculate() else {
                warn!(invoice_number = %invoice.number(), "Invoice amounts out of range, left out of the report");
                continue;
            };
            let invoice_total = calculation.total;

            for (item, calc) in invoice.items().iter().zip(&calculation.item_calculations) {
                let entry = products
                    .entry(item.product_name.clone())
                    .or_insert((Decimal::ZERO, Decimal::ZERO));
                entry.0 = entry.0.saturating_add(calc.total);
                entry.1 = entry.1.saturating_add(item.quantity);
            }

            invoice_count += 1;
            total_revenue = total_revenue.saturating_add(invoice_total);
            if invoice.is_paid() {
                paid_count += 1;
                paid_revenue = paid_revenue.saturating_add(invoice_total);
            }

            let client_name = record
                .client_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_CLIENT_LABEL)
                .to_string();
            let client = clients.entry(client_name).or_insert((Decimal::ZERO, 0));
            client.0 = client.0.saturating_add(invoice_total);
            client.1 += 1;

            let month_key = format!("{:04}-{:02}", issue_date.year(), issue_date.month());
            let month = months.entry(month_key).or_insert((Decimal::ZERO, 0));
            month.0 = month.0.saturating_add(invoice_total);
            month.1 += 1;

            let status = invoice.header.status;
            let summary = statuses
                .entry(status_rank(status))
                .or_insert((status, 0, Decimal::ZERO));
            summary.1 += 1;
            summary.2 = summary.2.saturating_add(invoice_total);
        }

        let mut by_client: Vec<ClientRevenue> = clients
            .into_iter()
            .map(|(client_name, (total, invoice_count))| ClientRevenue {
                client_name,
                total,
                invoice_count,
            })
            .collect();
        // BTreeMap order breaks ties by name
        by_client.sort_by(|a, b| b.total.cmp(&a.total));

        let mut by_product: Vec<ProductRevenue> = products
            .into_iter()
            .map(|(product_name, (total, quantity))| ProductRevenue {
                product_name,
                total,
                quantity,
            })
            .collect();
        by_product.sort_by(|a, b| b.total.cmp(&a.total));

        let by_month = months
            .into_iter()
            .map(|(month, (total, invoice_count))| MonthRevenue {
                month,
                total,
                invoice_count,
            })
            .collect();

        let status_summary = statuses
            .into_values()
            .map(|(status, invoice_count, total)| StatusSummary {
                status,
                invoice_count,
                total,
            })
            .collect();

        Self {
            from,
            to,
            total_revenue,
            invoice_count,
            paid_count,
            unpaid_amount: total_revenue.saturating_sub(paid_revenue),
            by_client,
            by_product,
            by_month,
            status_summary,
        }
    }

    /// The best clients by revenue
    pub fn top_clients(&self) -> &[ClientRevenue] {
        &self.by_client[..self.by_client.len().min(TOP_CLIENTS)]
    }

    /// Mean invoice total, zero when there are no invoices
    pub fn average_invoice(&self) -> Decimal {
        if self.invoice_count == 0 {
            Decimal::ZERO
        } else {
            self.total_revenue / Decimal::from(self.invoice_count)
        }
    }

    /// Share of total revenue as a percentage, zero when there is no revenue
    pub fn share_of_revenue(&self, amount: Decimal) -> Decimal {
        if self.total_revenue.is_zero() {
            Decimal::ZERO
        } else {
            amount / self.total_revenue * Decimal::ONE_HUNDRED
        }
    }
}

fn status_rank(status: InvoiceStatus) -> u8 {
    match status {
        InvoiceStatus::Draft => 0,
        InvoiceStatus::Sent => 1,
        InvoiceStatus::Paid => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label() {
        let month = MonthRevenue {
            month: "2024-05".to_string(),
            total: Decimal::ZERO,
            invoice_count: 0,
        };
        assert_eq!(month.label(), "Maj 2024");

        let odd = MonthRevenue {
            month: "2024-13".to_string(),
            ..month
        };
        assert_eq!(odd.label(), "2024-13");
    }

    #[test]
    fn test_empty_report() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let report = RevenueReport::build(&[], from, to);

        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert_eq!(report.invoice_count, 0);
        assert_eq!(report.average_invoice(), Decimal::ZERO);
        assert_eq!(report.share_of_revenue(Decimal::ONE), Decimal::ZERO);
        assert!(report.top_clients().is_empty());
    }
}
