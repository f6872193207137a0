// In-Memory Repositories
//
// Implements every repository trait over a single mutex-guarded state so the
// HTTP stack can be exercised without MySQL. Cross-table effects (payment
// receives adjusting invoice payment amounts) follow the MySQL repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use ledgerdesk::core::{AppError, PageRequest, Result, ServiceError, SortOrder};
use ledgerdesk::middleware::{hash_api_key, ApiKeyRecord, ApiKeyStore};
use ledgerdesk::modules::bills::models::{Bill, BillDetails, BillListFilter, BillSortColumn};
use ledgerdesk::modules::bills::BillRepository;
use ledgerdesk::modules::contacts::models::{Contact, ContactDetails, ContactService};
use ledgerdesk::modules::contacts::ContactRepository;
use ledgerdesk::modules::payment_receives::models::{PaymentReceive, PaymentReceiveDetails};
use ledgerdesk::modules::payment_receives::PaymentReceiveRepository;
use ledgerdesk::modules::sales_invoices::models::{Receivable, SaleInvoice, SaleInvoiceDetails};
use ledgerdesk::modules::sales_invoices::SaleInvoiceRepository;
use ledgerdesk::modules::settings::{Setting, SettingRepository};
use ledgerdesk::modules::users::models::{SystemUser, UserDetails};
use ledgerdesk::modules::users::UserRepository;
use ledgerdesk::Repositories;

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<SystemUser>,
    contacts: Vec<Contact>,
    bills: Vec<Bill>,
    invoices: Vec<SaleInvoice>,
    payments: Vec<PaymentReceive>,
    settings: Vec<(i64, Setting)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn page_of<T: Clone>(items: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let rows = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (rows, total)
}

/// Shared in-memory database
#[derive(Clone, Default)]
pub struct MemoryDb {
    state: Arc<Mutex<State>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            contacts: Arc::new(self.clone()),
            bills: Arc::new(self.clone()),
            sale_invoices: Arc::new(self.clone()),
            payment_receives: Arc::new(self.clone()),
            settings: Arc::new(self.clone()),
        }
    }

    /// Insert an active user directly, returning its id
    pub fn seed_user(
        &self,
        tenant_id: i64,
        first_name: &str,
        email: &str,
        phone_number: Option<&str>,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        state.users.push(SystemUser {
            id,
            tenant_id,
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            phone_number: phone_number.map(str::to_string),
            active: true,
            invite_accepted_at: Some(now),
            last_login_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn user(&self, id: i64) -> Option<SystemUser> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn invoice(&self, id: i64) -> Option<SaleInvoice> {
        let state = self.state.lock().unwrap();
        state.invoices.iter().find(|i| i.id == id).cloned()
    }

    pub fn bill_count(&self, tenant_id: i64) -> usize {
        let state = self.state.lock().unwrap();
        state.bills.iter().filter(|b| b.tenant_id == tenant_id).count()
    }

    pub fn set_setting(&self, tenant_id: i64, group: &str, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .settings
            .retain(|(t, s)| !(*t == tenant_id && s.group == group && s.key == key));
        state.settings.push((
            tenant_id,
            Setting {
                group: group.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            },
        ));
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SystemUser>, i64)> {
        let state = self.state.lock().unwrap();
        let users: Vec<SystemUser> = state
            .users
            .iter()
            .filter(|u| u.tenant_id == tenant_id && u.deleted_at.is_none())
            .cloned()
            .collect();
        Ok(page_of(users, page))
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SystemUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.tenant_id == tenant_id && u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, tenant_id: i64, email: &str) -> Result<Option<SystemUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.tenant_id == tenant_id && u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_phone_number(
        &self,
        tenant_id: i64,
        phone_number: &str,
    ) -> Result<Option<SystemUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| {
                u.tenant_id == tenant_id
                    && u.phone_number.as_deref() == Some(phone_number)
                    && u.deleted_at.is_none()
            })
            .cloned())
    }

    async fn update_details(&self, tenant_id: i64, id: i64, details: &UserDetails) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.tenant_id == tenant_id && u.id == id)
        {
            user.first_name = details.first_name.clone();
            user.last_name = details.last_name.clone();
            user.email = details.email.clone();
            user.phone_number = details.phone_number.clone();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_active(&self, tenant_id: i64, id: i64, active: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.tenant_id == tenant_id && u.id == id)
        {
            user.active = active;
        }
        Ok(())
    }

    async fn soft_delete(&self, tenant_id: i64, id: i64, deleted_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.tenant_id == tenant_id && u.id == id)
        {
            user.deleted_at = Some(deleted_at);
        }
        Ok(())
    }
}

fn apply_contact_details(contact: &mut Contact, details: &ContactDetails) {
    contact.salutation = details.salutation.clone();
    contact.first_name = details.first_name.clone();
    contact.last_name = details.last_name.clone();
    contact.company_name = details.company_name.clone();
    contact.display_name = details.display_name.clone();
    contact.email = details.email.clone();
    contact.work_phone = details.work_phone.clone();
    contact.currency_code = details.currency_code.clone();
    contact.note = details.note.clone();
    contact.active = details.active;
    contact.updated_at = Utc::now();
}

#[async_trait]
impl ContactRepository for MemoryDb {
    async fn create(
        &self,
        tenant_id: i64,
        service: ContactService,
        details: &ContactDetails,
    ) -> Result<Contact> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        let mut contact = Contact {
            id,
            tenant_id,
            contact_service: service,
            salutation: None,
            first_name: None,
            last_name: None,
            company_name: None,
            display_name: String::new(),
            email: None,
            work_phone: None,
            currency_code: None,
            note: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        apply_contact_details(&mut contact, details);
        state.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, tenant_id: i64, id: i64, details: &ContactDetails) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(contact) = state
            .contacts
            .iter_mut()
            .find(|c| c.tenant_id == tenant_id && c.id == id)
        {
            apply_contact_details(contact, details);
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: i64,
        service: ContactService,
        id: i64,
    ) -> Result<Option<Contact>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .contacts
            .iter()
            .find(|c| c.tenant_id == tenant_id && c.contact_service == service && c.id == id)
            .cloned())
    }

    async fn list(
        &self,
        tenant_id: i64,
        service: ContactService,
        page: PageRequest,
    ) -> Result<(Vec<Contact>, i64)> {
        let mut contacts = self.list_all(tenant_id, service, None).await?;
        contacts.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));
        Ok(page_of(contacts, page))
    }

    async fn list_all(
        &self,
        tenant_id: i64,
        service: ContactService,
        ids: Option<&[i64]>,
    ) -> Result<Vec<Contact>> {
        let state = self.state.lock().unwrap();
        let mut contacts: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|c| c.tenant_id == tenant_id && c.contact_service == service)
            .filter(|c| ids.map_or(true, |ids| ids.contains(&c.id)))
            .cloned()
            .collect();
        contacts.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));
        Ok(contacts)
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .contacts
            .retain(|c| !(c.tenant_id == tenant_id && c.id == id));
        Ok(())
    }
}

fn apply_bill_details(bill: &mut Bill, details: &BillDetails, opened_at: Option<DateTime<Utc>>) {
    bill.vendor_id = details.vendor_id;
    bill.bill_number = details.bill_number.clone();
    bill.reference_no = details.reference_no.clone();
    bill.bill_date = details.bill_date;
    bill.due_date = details.due_date;
    bill.amount = details.amount;
    bill.note = details.note.clone();
    bill.opened_at = opened_at;
    bill.entries = details.entries.clone();
    bill.updated_at = Utc::now();
}

#[async_trait]
impl BillRepository for MemoryDb {
    async fn create(
        &self,
        tenant_id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<Bill> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        let mut bill = Bill {
            id,
            tenant_id,
            vendor_id: 0,
            bill_number: String::new(),
            reference_no: None,
            bill_date: details.bill_date,
            due_date: details.due_date,
            amount: Decimal::ZERO,
            note: None,
            opened_at: None,
            created_at: now,
            updated_at: now,
            entries: Vec::new(),
        };
        apply_bill_details(&mut bill, details, opened_at);
        state.bills.push(bill.clone());
        Ok(bill)
    }

    async fn update(
        &self,
        tenant_id: i64,
        id: i64,
        details: &BillDetails,
        opened_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(bill) = state
            .bills
            .iter_mut()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
        {
            apply_bill_details(bill, details, opened_at);
        }
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<Bill>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bills
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
            .cloned())
    }

    async fn find_by_number(&self, tenant_id: i64, bill_number: &str) -> Result<Option<Bill>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bills
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.bill_number == bill_number)
            .cloned())
    }

    async fn list(&self, tenant_id: i64, filter: &BillListFilter) -> Result<(Vec<Bill>, i64)> {
        let state = self.state.lock().unwrap();
        let mut bills: Vec<Bill> = state
            .bills
            .iter()
            .filter(|b| b.tenant_id == tenant_id)
            .map(|b| Bill {
                entries: Vec::new(),
                ..b.clone()
            })
            .collect();

        bills.sort_by(|a, b| {
            let ordering = match filter.sort_column {
                BillSortColumn::BillDate => a.bill_date.cmp(&b.bill_date),
                BillSortColumn::DueDate => a.due_date.cmp(&b.due_date),
                BillSortColumn::BillNumber => a.bill_number.cmp(&b.bill_number),
                BillSortColumn::Amount => a.amount.cmp(&b.amount),
                BillSortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then(a.id.cmp(&b.id));
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(page_of(bills, filter.page))
    }

    async fn mark_open(&self, tenant_id: i64, id: i64, opened_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(bill) = state
            .bills
            .iter_mut()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
        {
            bill.opened_at = Some(opened_at);
        }
        Ok(())
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.bills.retain(|b| !(b.tenant_id == tenant_id && b.id == id));
        Ok(())
    }

    async fn count_by_vendor(&self, tenant_id: i64, vendor_id: i64) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bills
            .iter()
            .filter(|b| b.tenant_id == tenant_id && b.vendor_id == vendor_id)
            .count() as i64)
    }
}

#[async_trait]
impl SaleInvoiceRepository for MemoryDb {
    async fn create(
        &self,
        tenant_id: i64,
        details: &SaleInvoiceDetails,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<SaleInvoice> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = Utc::now();
        let invoice = SaleInvoice {
            id,
            tenant_id,
            customer_id: details.customer_id,
            invoice_no: details.invoice_no.clone(),
            reference_no: details.reference_no.clone(),
            invoice_date: details.invoice_date,
            due_date: details.due_date,
            amount: details.amount,
            payment_amount: Decimal::ZERO,
            invoice_message: details.invoice_message.clone(),
            delivered_at,
            created_at: now,
            updated_at: now,
            entries: details.entries.clone(),
        };
        state.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<SaleInvoice>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .invoices
            .iter()
            .find(|i| i.tenant_id == tenant_id && i.id == id)
            .cloned())
    }

    async fn find_by_number(
        &self,
        tenant_id: i64,
        invoice_no: &str,
    ) -> Result<Option<SaleInvoice>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .invoices
            .iter()
            .find(|i| i.tenant_id == tenant_id && i.invoice_no == invoice_no)
            .cloned())
    }

    async fn find_by_ids(&self, tenant_id: i64, ids: &[i64]) -> Result<Vec<SaleInvoice>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .invoices
            .iter()
            .filter(|i| i.tenant_id == tenant_id && ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list(&self, tenant_id: i64, page: PageRequest) -> Result<(Vec<SaleInvoice>, i64)> {
        let state = self.state.lock().unwrap();
        let invoices: Vec<SaleInvoice> = state
            .invoices
            .iter()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect();
        Ok(page_of(invoices, page))
    }

    async fn mark_delivered(
        &self,
        tenant_id: i64,
        id: i64,
        delivered_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(invoice) = state
            .invoices
            .iter_mut()
            .find(|i| i.tenant_id == tenant_id && i.id == id)
        {
            invoice.delivered_at = Some(delivered_at);
        }
        Ok(())
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .invoices
            .retain(|i| !(i.tenant_id == tenant_id && i.id == id));
        Ok(())
    }

    async fn count_by_customer(&self, tenant_id: i64, customer_id: i64) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .invoices
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.customer_id == customer_id)
            .count() as i64)
    }

    async fn list_receivables(
        &self,
        tenant_id: i64,
        as_date: NaiveDate,
        customer_ids: Option<&[i64]>,
    ) -> Result<Vec<Receivable>> {
        let state = self.state.lock().unwrap();

        let mut paid: HashMap<i64, Decimal> = HashMap::new();
        for payment in state
            .payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.payment_date <= as_date)
        {
            for entry in &payment.entries {
                *paid.entry(entry.invoice_id).or_default() += entry.payment_amount;
            }
        }

        Ok(state
            .invoices
            .iter()
            .filter(|i| {
                i.tenant_id == tenant_id
                    && i.delivered_at.is_some()
                    && i.invoice_date <= as_date
                    && customer_ids.map_or(true, |ids| ids.contains(&i.customer_id))
            })
            .map(|i| Receivable {
                invoice_id: i.id,
                customer_id: i.customer_id,
                invoice_date: i.invoice_date,
                due_date: i.due_date,
                amount: i.amount,
                paid_amount: paid.get(&i.id).copied().unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl PaymentReceiveRepository for MemoryDb {
    async fn create(
        &self,
        tenant_id: i64,
        details: &PaymentReceiveDetails,
    ) -> Result<PaymentReceive> {
        let mut state = self.state.lock().unwrap();

        // All or nothing, like the MySQL transaction
        for entry in &details.entries {
            let fits = state.invoices.iter().any(|i| {
                i.tenant_id == tenant_id
                    && i.id == entry.invoice_id
                    && i.payment_amount + entry.payment_amount <= i.amount
            });
            if !fits {
                return Err(AppError::Service(ServiceError::InvalidPaymentAmount));
            }
        }
        for entry in &details.entries {
            if let Some(invoice) = state
                .invoices
                .iter_mut()
                .find(|i| i.tenant_id == tenant_id && i.id == entry.invoice_id)
            {
                invoice.payment_amount += entry.payment_amount;
            }
        }

        let id = state.next_id();
        let payment = PaymentReceive {
            id,
            tenant_id,
            customer_id: details.customer_id,
            payment_date: details.payment_date,
            payment_receive_no: details.payment_receive_no.clone(),
            reference_no: details.reference_no.clone(),
            description: details.description.clone(),
            amount: details.amount,
            created_at: Utc::now(),
            entries: details.entries.clone(),
        };
        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, tenant_id: i64, id: i64) -> Result<Option<PaymentReceive>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .payments
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.id == id)
            .cloned())
    }

    async fn find_by_number(
        &self,
        tenant_id: i64,
        payment_receive_no: &str,
    ) -> Result<Option<PaymentReceive>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .payments
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.payment_receive_no == payment_receive_no)
            .cloned())
    }

    async fn list(
        &self,
        tenant_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<PaymentReceive>, i64)> {
        let state = self.state.lock().unwrap();
        let payments: Vec<PaymentReceive> = state
            .payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect();
        Ok(page_of(payments, page))
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state
            .payments
            .iter()
            .position(|p| p.tenant_id == tenant_id && p.id == id)
        else {
            return Ok(());
        };

        let payment = state.payments.remove(pos);
        for entry in &payment.entries {
            if let Some(invoice) = state
                .invoices
                .iter_mut()
                .find(|i| i.tenant_id == tenant_id && i.id == entry.invoice_id)
            {
                invoice.payment_amount =
                    (invoice.payment_amount - entry.payment_amount).max(Decimal::ZERO);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SettingRepository for MemoryDb {
    async fn list(&self, tenant_id: i64) -> Result<Vec<Setting>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .settings
            .iter()
            .filter(|(t, _)| *t == tenant_id)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn get(&self, tenant_id: i64, group: &str, key: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .settings
            .iter()
            .find(|(t, s)| *t == tenant_id && s.group == group && s.key == key)
            .map(|(_, s)| s.value.clone()))
    }

    async fn upsert(&self, tenant_id: i64, options: &[Setting]) -> Result<()> {
        for option in options {
            self.set_setting(tenant_id, &option.group, &option.key, &option.value);
        }
        Ok(())
    }
}

/// API key store with fixed keys
pub struct MemoryApiKeys {
    keys: HashMap<String, ApiKeyRecord>,
}

impl MemoryApiKeys {
    /// `(api_key, tenant_id, is_active)` triples
    pub fn new(keys: &[(&str, i64, bool)]) -> Self {
        let keys = keys
            .iter()
            .enumerate()
            .map(|(idx, (key, tenant_id, is_active))| {
                (
                    hash_api_key(key),
                    ApiKeyRecord {
                        id: idx as i64 + 1,
                        tenant_id: *tenant_id,
                        is_active: *is_active,
                    },
                )
            })
            .collect();
        Self { keys }
    }
}

#[async_trait]
impl ApiKeyStore for MemoryApiKeys {
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>> {
        Ok(self.keys.get(key_hash).cloned())
    }

    async fn touch(&self, _id: i64) -> Result<()> {
        Ok(())
    }
}
