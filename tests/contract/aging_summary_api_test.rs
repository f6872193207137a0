// Contract tests for GET /financial-statements/ar-aging-summary

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use helpers::*;
use serde_json::{json, Value};

const REPORT: &str = "/financial-statements/ar-aging-summary";

/// Response carries organization, data rows, columns and the echoed query
#[actix_web::test]
async fn test_aging_summary_structure() {
    let db = MemoryDb::new();
    db.set_setting(TENANT_A, "organization", "name", "Bigcapital LLC");
    db.set_setting(TENANT_A, "organization", "base_currency", "EUR");
    let app = init_app!(db);

    let resp = test::call_service(
        &app,
        get_as(TENANT_A_KEY, &format!("{}?as_date=2024-06-30", REPORT)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["organization_name"], "Bigcapital LLC");
    assert_eq!(body["base_currency"], "EUR");
    assert!(body["data"]["customers"].as_array().unwrap().is_empty());

    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(
        columns[0],
        json!({
            "from_period": "2024-06-30",
            "to_period": "2024-05-31",
            "before_days": 0,
            "to_days": 30,
        })
    );
    assert_eq!(columns[2]["to_period"], Value::Null);
    assert_eq!(columns[2]["to_days"], Value::Null);

    let query = &body["query"];
    assert_eq!(query["as_date"], "2024-06-30");
    assert_eq!(query["aging_days_before"], 30);
    assert_eq!(query["aging_periods"], 3);
    assert_eq!(query["none_zero"], true);
    assert_eq!(query["number_format"]["precision"], 2);
    assert_eq!(query["number_format"]["format_money"], "total");
    assert!(query.get("customers_ids").is_none());
}

/// Organization defaults apply when nothing was saved
#[actix_web::test]
async fn test_aging_summary_organization_defaults() {
    let db = MemoryDb::new();
    let app = init_app!(db);

    let body: Value =
        test::call_and_read_body_json(&app, get_as(TENANT_A_KEY, REPORT).to_request()).await;
    assert_eq!(body["organization_name"], "");
    assert_eq!(body["base_currency"], "USD");
}

/// Invoices land in the bucket matching how overdue they are
#[actix_web::test]
async fn test_aging_summary_buckets_receivables() {
    let db = MemoryDb::new();
    let app = init_app!(db);

    let acme: Value = test::call_and_read_body_json(
        &app,
        post_as(TENANT_A_KEY, "/customers", &TestDataFactory::customer_payload("Acme")).to_request(),
    )
    .await;
    let acme_id = acme["id"].as_i64().unwrap();

    let globex: Value = test::call_and_read_body_json(
        &app,
        post_as(TENANT_A_KEY, "/customers", &TestDataFactory::customer_payload("Globex"))
            .to_request(),
    )
    .await;
    let globex_id = globex["id"].as_i64().unwrap();

    let invoices = [
        // not yet due
        (acme_id, "INV-1", "2024-06-01", "2024-07-15", "1000", true),
        // 20 days overdue
        (acme_id, "INV-2", "2024-05-01", "2024-06-10", "500", true),
        // 45 days overdue
        (globex_id, "INV-3", "2024-04-01", "2024-05-16", "2500", true),
        // draft invoices are not receivables
        (globex_id, "INV-4", "2024-04-01", "2024-05-16", "9999", false),
        // dated after the report date
        (globex_id, "INV-5", "2024-07-02", "2024-07-30", "7777", true),
    ];
    let mut invoice_ids = Vec::new();
    for (customer_id, no, invoice_date, due_date, amount, delivered) in invoices {
        let payload = TestDataFactory::sale_invoice_payload(
            customer_id,
            no,
            invoice_date,
            due_date,
            amount,
            delivered,
        );
        let resp = test::call_service(
            &app,
            post_as(TENANT_A_KEY, "/sales/invoices", &payload).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200, "creating {}", no);
        let body: Value = test::read_body_json(resp).await;
        invoice_ids.push(body["id"].as_i64().unwrap());
    }

    // Part payment of INV-2 before the report date, INV-3 paid after it
    let payments = [
        (acme_id, "PR-1", "2024-06-20", invoice_ids[1], "200"),
        (globex_id, "PR-2", "2024-07-05", invoice_ids[2], "2500"),
    ];
    for (customer_id, no, payment_date, invoice_id, amount) in payments {
        let payload = TestDataFactory::payment_receive_payload(
            customer_id,
            no,
            payment_date,
            &[(invoice_id, amount)],
        );
        let resp = test::call_service(
            &app,
            post_as(TENANT_A_KEY, "/sales/payment_receives", &payload).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200, "creating {}", no);
    }

    let body: Value = test::call_and_read_body_json(
        &app,
        get_as(TENANT_A_KEY, &format!("{}?as_date=2024-06-30", REPORT)).to_request(),
    )
    .await;

    let customers = body["data"]["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 2);

    let acme_row = &customers[0];
    assert_eq!(acme_row["customer_name"], "Acme");
    assert_eq!(acme_row["current"]["formatted_amount"], "1,000.00");
    assert_eq!(acme_row["aging"][0]["formatted_amount"], "300.00");
    assert_eq!(acme_row["aging"][1]["formatted_amount"], "");
    assert_eq!(acme_row["total"]["formatted_amount"], "$1,300.00");

    let globex_row = &customers[1];
    assert_eq!(globex_row["customer_name"], "Globex");
    assert_eq!(globex_row["current"]["formatted_amount"], "");
    assert_eq!(globex_row["aging"][1]["formatted_amount"], "2,500.00");
    assert_eq!(globex_row["total"]["formatted_amount"], "$2,500.00");

    let total = &body["data"]["total"];
    assert_eq!(total["current"]["formatted_amount"], "$1,000.00");
    assert_eq!(total["aging"][0]["formatted_amount"], "$300.00");
    assert_eq!(total["aging"][1]["formatted_amount"], "$2,500.00");
    assert_eq!(total["total"]["formatted_amount"], "$3,800.00");
}

/// customers_ids restricts the rows; none_zero=false keeps empty customers
#[actix_web::test]
async fn test_aging_summary_customer_filter() {
    let db = MemoryDb::new();
    let app = init_app!(db);

    let mut ids = Vec::new();
    for name in ["Acme", "Globex", "Initech"] {
        let body: Value = test::call_and_read_body_json(
            &app,
            post_as(TENANT_A_KEY, "/customers", &TestDataFactory::customer_payload(name))
                .to_request(),
        )
        .await;
        ids.push(body["id"].as_i64().unwrap());
    }

    let uri = format!(
        "{}?as_date=2024-06-30&none_zero=false&customers_ids={},{}",
        REPORT, ids[0], ids[2]
    );
    let body: Value = test::call_and_read_body_json(&app, get_as(TENANT_A_KEY, &uri).to_request()).await;

    let names: Vec<&str> = body["data"]["customers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["customer_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Acme", "Initech"]);
    assert_eq!(body["query"]["customers_ids"], json!([ids[0], ids[2]]));

    // Default none_zero drops customers with nothing outstanding
    let body: Value = test::call_and_read_body_json(
        &app,
        get_as(TENANT_A_KEY, &format!("{}?as_date=2024-06-30", REPORT)).to_request(),
    )
    .await;
    assert!(body["data"]["customers"].as_array().unwrap().is_empty());
}

/// Custom windows and number format options
#[actix_web::test]
async fn test_aging_summary_custom_options() {
    let db = MemoryDb::new();
    let app = init_app!(db);

    let uri = format!(
        "{}?as_date=2024-06-30&aging_days_before=15&aging_periods=5\
         &number_format%5Bprecision%5D=0&number_format%5Bformat_money%5D=always\
         &number_format%5Bnegative_format%5D=parentheses",
        REPORT
    );
    let body: Value = test::call_and_read_body_json(&app, get_as(TENANT_A_KEY, &uri).to_request()).await;

    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 5);
    assert_eq!(columns[1]["before_days"], 16);
    assert_eq!(columns[1]["to_days"], 30);
    assert_eq!(columns[4]["before_days"], 61);

    let number_format = &body["query"]["number_format"];
    assert_eq!(number_format["precision"], 0);
    assert_eq!(number_format["format_money"], "always");
    assert_eq!(number_format["negative_format"], "parentheses");
}

/// Out-of-range options are rejected
#[actix_web::test]
async fn test_aging_summary_invalid_query() {
    let db = MemoryDb::new();
    let app = init_app!(db);

    for query in [
        "as_date=30-06-2024",
        "aging_days_before=0",
        "aging_days_before=501",
        "aging_periods=13",
        "customers_ids=1,abc",
        "number_format%5Bprecision%5D=9",
    ] {
        let resp = test::call_service(
            &app,
            get_as(TENANT_A_KEY, &format!("{}?{}", REPORT, query)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400, "query {}", query);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["type"], "VALIDATION_ERROR", "query {}", query);
    }
}
