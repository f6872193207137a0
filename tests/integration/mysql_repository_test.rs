// Integration tests for the MySQL repositories
//
// These run against a real database (TEST_DATABASE_URL) and are ignored by
// default. Run with `cargo test --test mysql_repository_test -- --ignored`.

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{NaiveDate, Utc};
use helpers::*;
use ledgerdesk::core::{AppError, ItemEntry, ItemEntryRequest, PageRequest, ServiceError, SortOrder};
use ledgerdesk::middleware::{hash_api_key, ApiKeyStore, MySqlApiKeyStore};
use ledgerdesk::modules::bills::models::{BillDetails, BillListFilter, BillSortColumn};
use ledgerdesk::modules::bills::{BillRepository, MySqlBillRepository};
use ledgerdesk::modules::contacts::models::{ContactDetails, ContactService};
use ledgerdesk::modules::contacts::{ContactRepository, MySqlContactRepository};
use ledgerdesk::modules::payment_receives::models::{PaymentReceiveDetails, PaymentReceiveEntry};
use ledgerdesk::modules::payment_receives::{
    MySqlPaymentReceiveRepository, PaymentReceiveRepository,
};
use ledgerdesk::modules::sales_invoices::models::SaleInvoiceDetails;
use ledgerdesk::modules::sales_invoices::{MySqlSaleInvoiceRepository, SaleInvoiceRepository};
use ledgerdesk::modules::settings::{MySqlSettingRepository, Setting, SettingRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::MySqlPool;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(description: &str, quantity: Decimal, rate: Decimal) -> ItemEntry {
    ItemEntry::new(
        1,
        &ItemEntryRequest {
            description: description.to_string(),
            quantity,
            rate,
        },
    )
    .unwrap()
}

fn contact_details(display_name: &str) -> ContactDetails {
    ContactDetails {
        salutation: None,
        first_name: None,
        last_name: None,
        company_name: Some(display_name.to_string()),
        display_name: display_name.to_string(),
        email: None,
        work_phone: None,
        currency_code: None,
        note: None,
        active: true,
    }
}

fn invoice_details(customer_id: i64, invoice_no: &str, amount: Decimal) -> SaleInvoiceDetails {
    SaleInvoiceDetails {
        customer_id,
        invoice_no: invoice_no.to_string(),
        reference_no: None,
        invoice_date: date(2024, 1, 1),
        due_date: date(2024, 1, 31),
        invoice_message: None,
        delivered: true,
        amount,
        entries: vec![entry("Consulting", dec!(1), amount)],
    }
}

async fn create_customer(pool: &MySqlPool, tenant_id: i64, name: &str) -> i64 {
    MySqlContactRepository::new(pool.clone())
        .create(tenant_id, ContactService::Customer, &contact_details(name))
        .await
        .expect("Failed to create customer")
        .id
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_contact_repository() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let repo = MySqlContactRepository::new(pool.clone());

    let zed = repo
        .create(tenant_id, ContactService::Customer, &contact_details("Zed Ltd"))
        .await
        .unwrap();
    let acme = repo
        .create(tenant_id, ContactService::Customer, &contact_details("Acme"))
        .await
        .unwrap();
    repo.create(tenant_id, ContactService::Vendor, &contact_details("Paper Co"))
        .await
        .unwrap();

    let (customers, total) = repo
        .list(
            tenant_id,
            ContactService::Customer,
            PageRequest { page: 1, page_size: 10 },
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(customers[0].display_name, "Acme");

    let only_zed = repo
        .list_all(tenant_id, ContactService::Customer, Some(&[zed.id][..]))
        .await
        .unwrap();
    assert_eq!(only_zed.len(), 1);

    // Customers are not vendors
    assert!(repo
        .find_by_id(tenant_id, ContactService::Vendor, acme.id)
        .await
        .unwrap()
        .is_none());

    let mut details = contact_details("Acme Corp");
    details.email = Some("billing@acme.example".to_string());
    repo.update(tenant_id, acme.id, &details).await.unwrap();
    let updated = repo
        .find_by_id(tenant_id, ContactService::Customer, acme.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.display_name, "Acme Corp");
    assert_eq!(updated.email.as_deref(), Some("billing@acme.example"));

    repo.delete(tenant_id, zed.id).await.unwrap();
    assert!(repo
        .find_by_id(tenant_id, ContactService::Customer, zed.id)
        .await
        .unwrap()
        .is_none());
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_bill_repository() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let vendor_id = MySqlContactRepository::new(pool.clone())
        .create(tenant_id, ContactService::Vendor, &contact_details("Paper Co"))
        .await
        .unwrap()
        .id;
    let repo = MySqlBillRepository::new(pool.clone());

    let mut details = BillDetails {
        vendor_id,
        bill_number: "B-1".to_string(),
        reference_no: None,
        bill_date: date(2024, 1, 1),
        due_date: date(2024, 1, 31),
        note: None,
        open: false,
        amount: dec!(30.02),
        entries: vec![entry("Paper", dec!(3), dec!(10.005))],
    };
    let bill = repo.create(tenant_id, &details, None).await.unwrap();
    assert!(bill.opened_at.is_none());

    let loaded = repo.find_by_id(tenant_id, bill.id).await.unwrap().unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.amount, dec!(30.02));

    details.amount = dec!(50);
    details.entries = vec![entry("Toner", dec!(1), dec!(50))];
    repo.update(tenant_id, bill.id, &details, Some(Utc::now()))
        .await
        .unwrap();
    let loaded = repo.find_by_id(tenant_id, bill.id).await.unwrap().unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.entries[0].description, "Toner");
    assert!(loaded.is_open());

    let found = repo.find_by_number(tenant_id, "B-1").await.unwrap();
    assert_eq!(found.map(|b| b.id), Some(bill.id));
    assert_eq!(repo.count_by_vendor(tenant_id, vendor_id).await.unwrap(), 1);

    let filter = BillListFilter {
        page: PageRequest { page: 1, page_size: 10 },
        sort_column: BillSortColumn::Amount,
        sort_order: SortOrder::Desc,
    };
    let (bills, total) = repo.list(tenant_id, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(bills[0].id, bill.id);

    repo.delete(tenant_id, bill.id).await.unwrap();
    assert!(repo.find_by_id(tenant_id, bill.id).await.unwrap().is_none());
}

/// A number taken between the service's check and the insert surfaces as
/// the matching business error, not a database failure
#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_duplicate_numbers_map_to_service_errors() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let customer_id = create_customer(&pool, tenant_id, "Acme").await;
    let vendor_id = MySqlContactRepository::new(pool.clone())
        .create(tenant_id, ContactService::Vendor, &contact_details("Paper Co"))
        .await
        .unwrap()
        .id;

    let bills = MySqlBillRepository::new(pool.clone());
    let bill_details = |bill_number: &str| BillDetails {
        vendor_id,
        bill_number: bill_number.to_string(),
        reference_no: None,
        bill_date: date(2024, 1, 1),
        due_date: date(2024, 1, 31),
        note: None,
        open: false,
        amount: dec!(10),
        entries: vec![entry("Paper", dec!(1), dec!(10))],
    };
    bills.create(tenant_id, &bill_details("B-1"), None).await.unwrap();
    let second = bills.create(tenant_id, &bill_details("B-2"), None).await.unwrap();

    let err = bills.create(tenant_id, &bill_details("B-1"), None).await.unwrap_err();
    assert!(matches!(err, AppError::Service(ServiceError::BillNumberExists)));
    let err = bills
        .update(tenant_id, second.id, &bill_details("B-1"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Service(ServiceError::BillNumberExists)));

    let invoices = MySqlSaleInvoiceRepository::new(pool.clone());
    let invoice = invoices
        .create(tenant_id, &invoice_details(customer_id, "INV-1", dec!(100)), Some(Utc::now()))
        .await
        .unwrap();
    let err = invoices
        .create(tenant_id, &invoice_details(customer_id, "INV-1", dec!(100)), Some(Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Service(ServiceError::SaleInvoiceNumberExists)));

    let payments = MySqlPaymentReceiveRepository::new(pool.clone());
    let payment = PaymentReceiveDetails {
        customer_id,
        payment_date: date(2024, 1, 10),
        payment_receive_no: "PR-1".to_string(),
        reference_no: None,
        description: None,
        amount: dec!(10),
        entries: vec![PaymentReceiveEntry {
            invoice_id: invoice.id,
            payment_amount: dec!(10),
        }],
    };
    payments.create(tenant_id, &payment).await.unwrap();
    let err = payments.create(tenant_id, &payment).await.unwrap_err();
    assert!(matches!(err, AppError::Service(ServiceError::PaymentReceiveNoExists)));

    // The rejected payment left the invoice balance alone
    let loaded = invoices.find_by_id(tenant_id, invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded.payment_amount, dec!(10));
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_payment_receive_updates_invoice_balance() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let customer_id = create_customer(&pool, tenant_id, "Acme").await;
    let invoices = MySqlSaleInvoiceRepository::new(pool.clone());
    let payments = MySqlPaymentReceiveRepository::new(pool.clone());

    let invoice = invoices
        .create(tenant_id, &invoice_details(customer_id, "INV-1", dec!(100)), Some(Utc::now()))
        .await
        .unwrap();

    let payment_details = |no: &str, amount: Decimal, payment_date: NaiveDate| PaymentReceiveDetails {
        customer_id,
        payment_date,
        payment_receive_no: no.to_string(),
        reference_no: None,
        description: None,
        amount,
        entries: vec![PaymentReceiveEntry {
            invoice_id: invoice.id,
            payment_amount: amount,
        }],
    };

    let first = payments
        .create(tenant_id, &payment_details("PR-1", dec!(60), date(2024, 1, 10)))
        .await
        .unwrap();
    let loaded = invoices.find_by_id(tenant_id, invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded.payment_amount, dec!(60));

    // The balance guard rejects overpayment and rolls back the whole payment
    let rejected = payments
        .create(tenant_id, &payment_details("PR-2", dec!(50), date(2024, 2, 10)))
        .await;
    assert!(rejected.is_err());
    assert!(payments.find_by_number(tenant_id, "PR-2").await.unwrap().is_none());

    payments
        .create(tenant_id, &payment_details("PR-3", dec!(40), date(2024, 2, 10)))
        .await
        .unwrap();

    // Receivables only count payments dated up to the report date
    let receivables = invoices
        .list_receivables(tenant_id, date(2024, 1, 31), None)
        .await
        .unwrap();
    assert_eq!(receivables.len(), 1);
    assert_eq!(receivables[0].paid_amount, dec!(60));
    assert_eq!(receivables[0].due_amount(), dec!(40));

    let receivables = invoices
        .list_receivables(tenant_id, date(2024, 3, 1), Some(&[customer_id][..]))
        .await
        .unwrap();
    assert_eq!(receivables[0].due_amount(), dec!(0));

    payments.delete(tenant_id, first.id).await.unwrap();
    let loaded = invoices.find_by_id(tenant_id, invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded.payment_amount, dec!(40));
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_receivables_skip_drafts_and_future_invoices() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let customer_id = create_customer(&pool, tenant_id, "Acme").await;
    let invoices = MySqlSaleInvoiceRepository::new(pool.clone());

    invoices
        .create(tenant_id, &invoice_details(customer_id, "INV-1", dec!(100)), None)
        .await
        .unwrap();
    let mut future = invoice_details(customer_id, "INV-2", dec!(100));
    future.invoice_date = date(2024, 6, 1);
    future.due_date = date(2024, 6, 30);
    invoices
        .create(tenant_id, &future, Some(Utc::now()))
        .await
        .unwrap();

    let receivables = invoices
        .list_receivables(tenant_id, date(2024, 3, 1), None)
        .await
        .unwrap();
    assert!(receivables.is_empty());
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_setting_repository_upsert() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let repo = MySqlSettingRepository::new(pool.clone());

    let setting = |value: &str| Setting {
        group: "organization".to_string(),
        key: "name".to_string(),
        value: value.to_string(),
    };

    repo.upsert(tenant_id, &[setting("Acme")]).await.unwrap();
    repo.upsert(tenant_id, &[setting("Acme Holdings")]).await.unwrap();

    assert_eq!(
        repo.get(tenant_id, "organization", "name").await.unwrap().as_deref(),
        Some("Acme Holdings")
    );
    assert_eq!(repo.list(tenant_id).await.unwrap().len(), 1);
    assert!(repo.get(tenant_id, "organization", "base_currency").await.unwrap().is_none());
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_api_key_store() {
    let pool = create_test_pool().await;
    let tenant_id = create_test_tenant(&pool).await;
    let api_key = format!("test-key-{}", uuid::Uuid::new_v4());

    sqlx::query("INSERT INTO api_keys (tenant_id, key_hash) VALUES (?, ?)")
        .bind(tenant_id)
        .bind(hash_api_key(&api_key))
        .execute(&pool)
        .await
        .unwrap();

    let store = MySqlApiKeyStore::new(pool.clone());
    let record = store
        .find_by_hash(&hash_api_key(&api_key))
        .await
        .unwrap()
        .expect("key must be found");
    assert_eq!(record.tenant_id, tenant_id);
    assert!(record.is_active);

    store.touch(record.id).await.unwrap();
    assert!(store.find_by_hash(&hash_api_key("missing")).await.unwrap().is_none());
}
