//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::ClientId;
use domain_invoicing::{InvoiceDefaults, InvoiceDraft, InvoiceStatus, NewInvoiceItem, PaymentMethod};
use domain_party::Client;

use crate::fixtures::date;

/// Builder for invoice drafts
///
/// Starts with a fresh client, an issue date of 2024-03-15 and no rows.
pub struct InvoiceDraftBuilder {
    draft: InvoiceDraft,
}

impl Default for InvoiceDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceDraftBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), date(2024, 3, 15))
            .with_client(ClientId::new())
            .with_items(Vec::new());
        Self { draft }
    }

    /// Sets the client
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.draft.client_id = Some(client_id);
        self
    }

    /// Leaves the client unset
    pub fn without_client(mut self) -> Self {
        self.draft.client_id = None;
        self
    }

    /// Sets the issue and traffic date
    pub fn issued(mut self, issue_date: NaiveDate) -> Self {
        self.draft.issue_date = Some(issue_date);
        self.draft.traffic_date = Some(issue_date);
        self
    }

    /// Leaves the issue date unset
    pub fn without_issue_date(mut self) -> Self {
        self.draft.issue_date = None;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.draft.due_date = Some(due_date);
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.draft.status = status;
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.draft.payment_method = method;
        self
    }

    /// Appends a row
    pub fn item(mut self, item: NewInvoiceItem) -> Self {
        self.draft.items.push(item);
        self
    }

    /// Builds the draft
    pub fn build(self) -> InvoiceDraft {
        self.draft
    }
}

/// Builder for clients
pub struct ClientBuilder {
    name: String,
    pib: String,
    mb: String,
    email: Option<String>,
    city: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new builder with a valid PIB and MB
    pub fn new() -> Self {
        Self {
            name: "Restoran Dunav".to_string(),
            pib: "100200300".to_string(),
            mb: "12345678".to_string(),
            email: None,
            city: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn pib(mut self, pib: impl Into<String>) -> Self {
        self.pib = pib.into();
        self
    }

    pub fn mb(mut self, mb: impl Into<String>) -> Self {
        self.mb = mb.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Builds the client
    pub fn build(self) -> Client {
        let mut client = Client::new(self.name, &self.pib, &self.mb);
        client.email = self.email;
        client.city = self.city;
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_item_a;

    #[test]
    fn test_default_draft_validates_once_it_has_a_row() {
        let draft = InvoiceDraftBuilder::new().item(scenario_item_a()).build();
        let validated = draft.validate().unwrap();
        assert_eq!(validated.header.issue_date, date(2024, 3, 15));
        assert_eq!(validated.items.len(), 1);
    }

    #[test]
    fn test_draft_without_client_is_rejected() {
        let draft = InvoiceDraftBuilder::new()
            .without_client()
            .item(scenario_item_a())
            .build();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_client_builder() {
        let client = ClientBuilder::new().name("Kafana Stari Grad").city("Vrsac").build();
        assert_eq!(client.name, "Kafana Stari Grad");
        assert_eq!(client.city.as_deref(), Some("Vrsac"));
        assert!(client.ensure_valid().is_ok());
    }
}
