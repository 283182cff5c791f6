//! Dashboard panels and the mutations behind them.

use frontier_integration_tests::{
    TestApp, active_rows, business_info_row, location, message_row, sale_row, team_row,
};
use frontier_site::remote::{MemoryDataService, Mutation, Table};
use serde_json::{Value, json};

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in page"))
}

fn id_of(app: &TestApp, table: Table, column: &str, value: &str) -> String {
    app.data
        .rows(table)
        .into_iter()
        .find(|row| row[column] == value)
        .and_then(|row| row["id"].as_str().map(str::to_string))
        .unwrap_or_else(|| panic!("no {table} row with {column} = {value}"))
}

const SPRING_CLEARANCE: [(&str, &str); 6] = [
    ("title", "Spring Clearance"),
    ("dates", "May 3-4, 2025"),
    ("location", "Leland, NC"),
    ("description", "Furniture and garden tools"),
    ("image_url", ""),
    ("status", "upcoming"),
];

// ============================================================================
// Sales
// ============================================================================

#[tokio::test]
async fn test_created_sale_listed_first() {
    let data = MemoryDataService::new().with_rows(
        Table::Sales,
        [sale_row("Winter Estate", "2025-01-10T09:00:00Z")],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;

    let response = app.post_form("/admin/sales", &SPRING_CLEARANCE).await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    let dashboard = app.page("/admin").await;
    assert!(dashboard.contains("Sale created successfully"));
    assert!(position(&dashboard, "Spring Clearance") < position(&dashboard, "Winter Estate"));

    let public = app.page("/sales").await;
    assert!(position(&public, "Spring Clearance") < position(&public, "Winter Estate"));

    let stored = app.data.rows(Table::Sales);
    let created = stored
        .iter()
        .find(|row| row["title"] == "Spring Clearance")
        .expect("sale stored");
    assert_eq!(created["image_url"], Value::Null);
    assert_eq!(created["status"], "upcoming");
}

#[tokio::test]
async fn test_flash_shown_once() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;

    app.post_form("/admin/sales", &SPRING_CLEARANCE).await;
    assert!(app.page("/admin").await.contains("Sale created successfully"));
    assert!(!app.page("/admin").await.contains("Sale created successfully"));
}

#[tokio::test]
async fn test_invalid_status_never_written() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;

    let mut form = SPRING_CLEARANCE;
    form[5] = ("status", "cancelled");
    let response = app.post_form("/admin/sales", &form).await;
    assert_eq!(location(&response).as_deref(), Some("/admin?sale=new"));
    assert!(app.mutations_on(Table::Sales).is_empty());

    let body = app.page("/admin?sale=new").await;
    assert!(body.contains("Error saving sale: invalid status"));
    assert!(body.contains("Add New Sale"));
}

#[tokio::test]
async fn test_blank_required_field_reopens_form() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;

    let mut form = SPRING_CLEARANCE;
    form[0] = ("title", "   ");
    let response = app.post_form("/admin/sales", &form).await;
    assert_eq!(location(&response).as_deref(), Some("/admin?sale=new"));
    assert!(app.mutations_on(Table::Sales).is_empty());

    let body = app.page("/admin?sale=new").await;
    assert!(body.contains("Error saving sale: title is required"));
    assert!(body.contains("value=\"May 3-4, 2025\""));
}

#[tokio::test]
async fn test_failed_create_keeps_typed_values() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;
    app.data.fail_table(Table::Sales);

    let mut form = SPRING_CLEARANCE;
    form[0] = ("title", "Garage Full of Tools");
    let response = app.post_form("/admin/sales", &form).await;
    assert_eq!(location(&response).as_deref(), Some("/admin?sale=new"));

    let body = app.page("/admin?sale=new").await;
    assert!(body.contains("Error saving sale"));
    assert!(body.contains("value=\"Garage Full of Tools\""));
    assert!(body.contains("Furniture and garden tools"));

    app.data.restore_table(Table::Sales);
    let reopened = app.page("/admin?sale=new").await;
    assert!(!reopened.contains("Garage Full of Tools"));
}

#[tokio::test]
async fn test_failed_update_keeps_typed_values() {
    let data = MemoryDataService::new().with_rows(
        Table::Sales,
        [sale_row("Winter Estate", "2025-01-10T09:00:00Z")],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    let id = id_of(&app, Table::Sales, "title", "Winter Estate");
    app.page("/admin").await;
    app.data.fail_table(Table::Sales);

    let mut form = SPRING_CLEARANCE;
    form[0] = ("title", "Winter Estate Revised");
    let response = app.post_form(&format!("/admin/sales/{id}"), &form).await;
    let reopen = format!("/admin?sale={id}");
    assert_eq!(location(&response).as_deref(), Some(reopen.as_str()));

    let body = app.page(&reopen).await;
    assert!(body.contains("Edit Sale"));
    assert!(body.contains("value=\"Winter Estate Revised\""));
    assert_eq!(app.data.rows(Table::Sales)[0]["title"], "Winter Estate");
}

#[tokio::test]
async fn test_unknown_status_sale_can_be_corrected() {
    let mut legacy = sale_row("Legacy Listing", "2025-03-01T09:00:00Z");
    legacy["status"] = json!("postponed");
    let data = MemoryDataService::new().with_rows(
        Table::Sales,
        [sale_row("Winter Estate", "2025-01-10T09:00:00Z"), legacy],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;

    let dashboard = app.page("/admin").await;
    assert!(!dashboard.contains("Error loading data"));
    assert!(dashboard.contains("Winter Estate"));
    assert!(dashboard.contains("Legacy Listing"));
    assert!(dashboard.contains("badge--unknown\">postponed"));

    let id = id_of(&app, Table::Sales, "title", "Legacy Listing");
    assert!(app.page(&format!("/admin?sale={id}")).await.contains("Edit Sale"));

    let mut form = SPRING_CLEARANCE;
    form[0] = ("title", "Legacy Listing");
    form[5] = ("status", "active");
    let response = app.post_form(&format!("/admin/sales/{id}"), &form).await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    assert!(app.page("/sales").await.contains("Legacy Listing"));
}

#[tokio::test]
async fn test_update_sale() {
    let data = MemoryDataService::new().with_rows(
        Table::Sales,
        [sale_row("Winter Estate", "2025-01-10T09:00:00Z")],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    let id = id_of(&app, Table::Sales, "title", "Winter Estate");

    let edit = app.page(&format!("/admin?sale={id}")).await;
    assert!(edit.contains("Edit Sale"));
    assert!(edit.contains(&format!("action=\"/admin/sales/{id}\"")));

    let mut form = SPRING_CLEARANCE;
    form[0] = ("title", "Winter Estate (Day 2)");
    form[5] = ("status", "completed");
    let response = app.post_form(&format!("/admin/sales/{id}"), &form).await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    let rows = app.data.rows(Table::Sales);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Winter Estate (Day 2)");
    assert_eq!(rows[0]["status"], "completed");
    assert!(app.page("/admin").await.contains("Sale updated successfully"));
}

#[tokio::test]
async fn test_delete_removes_only_that_sale() {
    let data = MemoryDataService::new().with_rows(
        Table::Sales,
        [
            sale_row("Keep Me", "2025-01-10T09:00:00Z"),
            sale_row("Delete Me", "2025-02-10T09:00:00Z"),
        ],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    let id = id_of(&app, Table::Sales, "title", "Delete Me");

    let response = app
        .post_form(&format!("/admin/sales/{id}/delete"), &[])
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    let titles: Vec<Value> = app
        .data
        .rows(Table::Sales)
        .into_iter()
        .map(|row| row["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Keep Me")]);

    let body = app.page("/admin").await;
    assert!(body.contains("Sale deleted successfully"));
    assert!(!body.contains("Delete Me"));
}

// ============================================================================
// Team
// ============================================================================

#[tokio::test]
async fn test_team_member_added_and_shown_on_about() {
    let data =
        MemoryDataService::new().with_rows(Table::TeamMembers, [team_row("Zoe Park", "Appraiser")]);
    let app = TestApp::spawn(data).await;
    app.sign_in().await;

    let response = app
        .post_form(
            "/admin/team",
            &[
                ("name", "Adam Cole"),
                ("role", "Owner"),
                ("bio", "Runs every sale."),
                ("image_url", ""),
            ],
        )
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));
    assert!(app.page("/admin").await.contains("Team member added successfully"));

    let about = app.page("/about").await;
    assert!(position(&about, "Adam Cole") < position(&about, "Zoe Park"));
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_messages_paginated_five_per_page() {
    let data = MemoryDataService::new()
        .with_rows(Table::ContactMessages, (0..12).map(|n| message_row(n, false)));
    let app = TestApp::spawn(data).await;
    app.sign_in().await;

    let first = app.page("/admin").await;
    assert!(first.contains("12 unread"));
    assert!(first.contains("Sender 00"));
    assert!(first.contains("Sender 04"));
    assert!(!first.contains("Sender 05"));
    assert!(first.contains("href=\"/admin?page=3\""));
    assert!(first.contains("href=\"/admin?page=2\" class=\"pagination__link\" rel=\"next\""));
    assert!(!first.contains("rel=\"prev\""));

    let last = app.page("/admin?page=3").await;
    assert!(last.contains("Sender 10"));
    assert!(last.contains("Sender 11"));
    assert!(!last.contains("Sender 09"));
    assert!(last.contains("href=\"/admin?page=2\" class=\"pagination__link\" rel=\"prev\""));
    assert!(!last.contains("rel=\"next\""));

    let clamped = app.page("/admin?page=40").await;
    assert!(clamped.contains("Sender 11"));
}

#[tokio::test]
async fn test_paging_reuses_loaded_messages() {
    let data = MemoryDataService::new()
        .with_rows(Table::ContactMessages, (0..8).map(|n| message_row(n, false)));
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    assert!(app.page("/admin").await.contains("Sender 00"));

    app.data.fail_table(Table::ContactMessages);

    let second = app.page("/admin?page=2").await;
    assert!(second.contains("Sender 05"));
    assert!(second.contains("8 unread"));
    assert!(!second.contains("Error loading data"));

    let refreshed = app.page("/admin").await;
    assert!(refreshed.contains("Error loading data"));
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let data = MemoryDataService::new()
        .with_rows(Table::ContactMessages, (0..7).map(|n| message_row(n, false)));
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    let id = id_of(&app, Table::ContactMessages, "name", "Sender 06");

    for _ in 0..2 {
        let response = app
            .post_form(&format!("/admin/messages/{id}/read"), &[("page", "2")])
            .await;
        assert_eq!(location(&response).as_deref(), Some("/admin?page=2"));
    }

    let row = app
        .data
        .rows(Table::ContactMessages)
        .into_iter()
        .find(|row| row["id"] == id.as_str())
        .expect("message kept");
    assert_eq!(row["read"], json!(true));

    let updates = app
        .mutations_on(Table::ContactMessages)
        .into_iter()
        .filter(|m| matches!(m, Mutation::Update { .. }))
        .count();
    assert_eq!(updates, 2);

    let body = app.page("/admin?page=2").await;
    assert!(body.contains("6 unread"));
}

#[tokio::test]
async fn test_delete_message_returns_to_page() {
    let data = MemoryDataService::new()
        .with_rows(Table::ContactMessages, (0..3).map(|n| message_row(n, true)));
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    let id = id_of(&app, Table::ContactMessages, "name", "Sender 01");

    let response = app
        .post_form(&format!("/admin/messages/{id}/delete"), &[("page", "1")])
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));
    assert_eq!(app.data.rows(Table::ContactMessages).len(), 2);

    let body = app.page("/admin").await;
    assert!(body.contains("Message deleted successfully"));
    assert!(!body.contains("Sender 01"));
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_business_info_keeps_one_active_row() {
    let data =
        MemoryDataService::new().with_rows(Table::BusinessInfo, [business_info_row("Leland, NC")]);
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    assert!(app.page("/").await.contains("Leland, NC"));

    for address in ["Wilmington, NC", "Southport, NC"] {
        let response = app
            .post_form(
                "/admin/business-info",
                &[
                    ("address", address),
                    ("phone", "(910) 338-9258"),
                    ("email", "frontierestateservices@gmail.com"),
                ],
            )
            .await;
        assert_eq!(location(&response).as_deref(), Some("/admin"));
    }

    let active = active_rows(&app.data, Table::BusinessInfo);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["address"], "Southport, NC");

    // Layout cache is dropped on save
    let home = app.page("/").await;
    assert!(home.contains("Southport, NC"));
    assert!(!home.contains("Leland, NC"));
}

#[tokio::test]
async fn test_business_info_save_repairs_duplicate_active_rows() {
    let data = MemoryDataService::new().with_rows(
        Table::BusinessInfo,
        [business_info_row("Leland, NC"), business_info_row("Shallotte, NC")],
    );
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    assert!(!app.page("/admin").await.contains("Error loading data"));

    let response = app
        .post_form(
            "/admin/business-info",
            &[
                ("address", "Wilmington, NC"),
                ("phone", "(910) 338-9258"),
                ("email", "frontierestateservices@gmail.com"),
            ],
        )
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    let active = active_rows(&app.data, Table::BusinessInfo);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["address"], "Wilmington, NC");
    assert_eq!(app.data.rows(Table::BusinessInfo).len(), 2);

    let home = app.page("/").await;
    assert!(home.contains("Wilmington, NC"));
    assert!(app.page("/admin").await.contains("Business information updated"));
}

#[tokio::test]
async fn test_business_info_first_save_inserts_active_row() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;

    app.post_form(
        "/admin/business-info",
        &[
            ("address", "Wilmington, NC"),
            ("phone", "(910) 338-9258"),
            ("email", "frontierestateservices@gmail.com"),
        ],
    )
    .await;

    assert_eq!(active_rows(&app.data, Table::BusinessInfo).len(), 1);
    assert!(
        app.page("/admin")
            .await
            .contains("Business information updated successfully")
    );
}

#[tokio::test]
async fn test_social_links_rendered_in_footer() {
    let app = TestApp::spawn_empty().await;
    app.sign_in().await;

    let response = app
        .post_form(
            "/admin/social-links",
            &[
                ("facebook", "https://facebook.com/frontierestates"),
                ("instagram", ""),
                ("linkedin", ""),
            ],
        )
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));

    let active = active_rows(&app.data, Table::SocialLinks);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["instagram"], Value::Null);

    let home = app.page("/").await;
    assert!(home.contains("https://facebook.com/frontierestates"));
}

// ============================================================================
// Load errors
// ============================================================================

#[tokio::test]
async fn test_dashboard_load_error_banner() {
    let data =
        MemoryDataService::new().with_rows(Table::BusinessInfo, [business_info_row("Leland, NC")]);
    let app = TestApp::spawn(data).await;
    app.sign_in().await;
    app.data.fail_table(Table::Sales);

    let body = app.page("/admin").await;
    assert!(body.contains("Error loading data"));
    assert!(body.contains("Estate Sales Management"));
}
