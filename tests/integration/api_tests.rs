//! API integration tests
//!
//! Each test starts an in-process fake of the library service and drives the
//! real reqwest repository and services against it.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use library_desk::{
    config::AppConfig,
    models::{
        client::{ClientField, ClientKind, ClientStatus, OrganizationField},
        AddressField, RosterKind,
    },
    services::{
        clients::RegistrationPhase,
        loans::{ComposerPhase, LOAD_FAILED_MESSAGE},
    },
    AppError, AppState,
};

/// Copy id the fake answers with 409 and an error body
const TAKEN_COPY: i32 = 99;
/// Copy id the fake answers with 200 and an error body
const FINED_COPY: i32 = 98;

struct FakeLibrary {
    clients_body: Value,
    copies_body: Value,
    status_queries: Mutex<Vec<String>>,
    loans: Mutex<Vec<Value>>,
    registrations: Mutex<Vec<Value>>,
}

impl FakeLibrary {
    fn new() -> Self {
        Self {
            clients_body: json!({
                "clients": [
                    {
                        "idClient": 1,
                        "Type": "PF",
                        "CPF": "12345678900",
                        "Name": "Ana Souza",
                        "Birthdate": "1990-05-17",
                        "Phone": "41999998888",
                        "Email": "ana@example.com",
                        "Address": {
                            "Road": "Rua XV de Novembro",
                            "Neighbourhood": "Centro",
                            "Number": 700,
                            "City": "Curitiba",
                            "State": "PR",
                            "ZipCode": "80020000",
                            "Complement": ""
                        }
                    },
                    {
                        "idClient": 2,
                        "Type": "PJ",
                        "CNPJ": "11222333000181",
                        "Name": "Livraria Ltda",
                        "FantasyName": "Livraria",
                        "Phone": "4133334444",
                        "Email": "contato@livraria.com.br",
                        "Address": {
                            "Road": "Avenida Sete de Setembro",
                            "Neighbourhood": "Batel",
                            "Number": 1200,
                            "City": "Curitiba",
                            "State": "PR",
                            "ZipCode": "80230000",
                            "Complement": "Loja 3"
                        }
                    }
                ]
            }),
            copies_body: json!({
                "physical_books": [
                    copy_row(10, 9780441013593, "Dune", "Herbert, Frank None", "Central"),
                    {
                        "idPhysicalBook": 11,
                        "ISBN": 9780141439587u64,
                        "Title": "Emma",
                        "BranchName": "Norte",
                        "Status": "BORROWED"
                    },
                    copy_row(TAKEN_COPY, 9780199535675, "Ulysses", "Joyce, James None", "Central"),
                    copy_row(FINED_COPY, 9780691096124, "Walden", "Thoreau, Henry David", "Sul")
                ]
            }),
            status_queries: Mutex::new(Vec::new()),
            loans: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
        }
    }
}

/// A `physical_books` row the way the service builds it: integer ISBN, author
/// as "Last, First Middle" and no status field.
fn copy_row(id: i32, isbn: u64, title: &str, author: &str, branch: &str) -> Value {
    json!({
        "idPhysicalBook": id,
        "ISBN": isbn,
        "Title": title,
        "Author": author,
        "Publisher": "Penguin",
        "Edition": "1",
        "Language": "English",
        "BranchName": branch
    })
}

type Fake = Arc<FakeLibrary>;

async fn list_books() -> Json<Value> {
    Json(json!({
        "books": [
            { "ISBN": 9780441013593u64, "Title": "Dune", "Author": "Frank Herbert", "Review": "4.50" },
            { "ISBN": 9780141439587u64, "Title": "Emma", "Author": "Jane Austen", "Review": null }
        ]
    }))
}

async fn list_clients(
    State(fake): State<Fake>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(status) = params.get("status") {
        fake.status_queries.lock().unwrap().push(status.clone());
    }
    Json(fake.clients_body.clone())
}

async fn create_client(State(fake): State<Fake>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["CNPJ"] == json!("00000000000000") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "Error": "Invalid CNPJ" })));
    }
    fake.registrations.lock().unwrap().push(body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Client created successfully." })),
    )
}

async fn list_copies(State(fake): State<Fake>) -> Json<Value> {
    Json(fake.copies_body.clone())
}

async fn create_loan(State(fake): State<Fake>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["idPhysicalBook"].as_i64() {
        Some(id) if id == i64::from(TAKEN_COPY) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Book no longer available" })),
        ),
        Some(id) if id == i64::from(FINED_COPY) => (
            StatusCode::OK,
            Json(json!({ "error": "Client has pending fines" })),
        ),
        _ => {
            fake.loans.lock().unwrap().push(body);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Loan created successfully.",
                    "DueDate": "Mon, 02 Nov 2026 00:00:00 GMT"
                })),
            )
        }
    }
}

async fn spawn_fake(fake: Fake) -> SocketAddr {
    let app = Router::new()
        .route("/api/books", get(list_books))
        .route("/api/clients", get(list_clients).post(create_client))
        .route("/api/physicalBooks", get(list_copies))
        .route("/api/loans", post(create_loan))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn desk(addr: SocketAddr) -> AppState {
    let mut config = AppConfig::default();
    // No trailing slash on purpose: the `/api` segment must survive joins
    config.api.base_url = format!("http://{}/api", addr);
    AppState::new(config).unwrap()
}

#[tokio::test]
async fn test_loan_end_to_end() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake.clone()).await);

    let mut composer = state.services.loan_composer();
    composer.load_rosters().await.unwrap();

    assert_eq!(composer.clients().len(), 2);
    let copy_ids: Vec<i32> = composer.copies().iter().map(|c| c.id).collect();
    assert_eq!(copy_ids, vec![10, TAKEN_COPY, FINED_COPY]);

    composer.select(RosterKind::Client, 1).unwrap();
    composer.select(RosterKind::Copy, 10).unwrap();
    let receipt = composer.submit().await.unwrap();

    assert_eq!(receipt.message.as_deref(), Some("Loan created successfully."));
    assert_eq!(receipt.due_date.as_deref(), Some("Mon, 02 Nov 2026 00:00:00 GMT"));
    assert!(matches!(composer.phase(), ComposerPhase::Done(_)));
    assert_eq!(
        *fake.loans.lock().unwrap(),
        vec![json!({ "idClient": 1, "idPhysicalBook": 10, "BorroTimeSolicited": 14 })]
    );
    assert_eq!(*fake.status_queries.lock().unwrap(), vec!["active".to_string()]);
}

#[tokio::test]
async fn test_rejected_loan_shows_server_message() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake.clone()).await);

    let mut composer = state.services.loan_composer();
    composer.load_rosters().await.unwrap();
    composer.select(RosterKind::Client, 2).unwrap();
    composer.select(RosterKind::Copy, TAKEN_COPY).unwrap();

    let err = composer.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Submission(msg) if msg == "Book no longer available"));
    assert_eq!(
        composer.phase(),
        ComposerPhase::Ready {
            submit_error: Some("Book no longer available".to_string())
        }
    );
    assert_eq!(composer.selection().copy_id, Some(TAKEN_COPY));
    assert!(fake.loans.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_body_with_success_status_is_a_failure() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake).await);

    let mut composer = state.services.loan_composer();
    composer.load_rosters().await.unwrap();
    composer.select(RosterKind::Client, 1).unwrap();
    composer.select(RosterKind::Copy, FINED_COPY).unwrap();

    let err = composer.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Submission(msg) if msg == "Client has pending fines"));
}

#[tokio::test]
async fn test_missing_copies_key_loads_empty_roster() {
    let mut fake = FakeLibrary::new();
    fake.copies_body = json!({ "message": "nothing here" });
    let state = desk(spawn_fake(Arc::new(fake)).await);

    let mut composer = state.services.loan_composer();
    composer.load_rosters().await.unwrap();

    assert_eq!(composer.phase(), ComposerPhase::Ready { submit_error: None });
    assert_eq!(composer.clients().len(), 2);
    assert!(composer.copies().is_empty());
}

#[tokio::test]
async fn test_missing_clients_key_is_a_load_error() {
    let mut fake = FakeLibrary::new();
    fake.clients_body = json!({ "message": "nothing here" });
    let state = desk(spawn_fake(Arc::new(fake)).await);

    let mut composer = state.services.loan_composer();
    let err = composer.load_rosters().await.unwrap_err();

    assert!(matches!(err, AppError::Load(_)));
    assert_eq!(
        composer.phase(),
        ComposerPhase::Error {
            message: LOAD_FAILED_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_service_is_a_load_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = desk(addr);
    let mut composer = state.services.loan_composer();
    assert!(matches!(composer.load_rosters().await, Err(AppError::Load(_))));
    assert!(matches!(composer.phase(), ComposerPhase::Error { .. }));
}

fn fill_organization(
    registration: &mut library_desk::services::clients::ClientRegistration,
    cnpj: &str,
) {
    registration.set_kind(ClientKind::Organization).unwrap();
    let fields = [
        (ClientField::Email, "contato@livraria.com.br"),
        (ClientField::Phone, "4133334444"),
        (ClientField::Address(AddressField::Road), "Rua XV de Novembro"),
        (ClientField::Address(AddressField::Number), "700"),
        (ClientField::Address(AddressField::Neighbourhood), "Centro"),
        (ClientField::Address(AddressField::City), "Curitiba"),
        (ClientField::Address(AddressField::State), "PR"),
        (ClientField::Address(AddressField::ZipCode), "80020000"),
        (ClientField::Organization(OrganizationField::NationalId), cnpj),
        (ClientField::Organization(OrganizationField::LegalName), "Livraria Ltda"),
        (ClientField::Organization(OrganizationField::TradeName), "Livraria"),
    ];
    for (field, value) in fields {
        registration.set_field(field, value).unwrap();
    }
}

#[tokio::test]
async fn test_register_organization_payload() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake.clone()).await);

    let mut registration = state.services.clients.registration();
    fill_organization(&mut registration, "11222333000181");
    registration.submit().await.unwrap();

    assert!(matches!(registration.phase(), RegistrationPhase::Registered(_)));
    let posted = fake.registrations.lock().unwrap().clone();
    assert_eq!(
        posted,
        vec![json!({
            "Type": "PJ",
            "CNPJ": "11222333000181",
            "Name": "Livraria Ltda",
            "FantasyName": "Livraria",
            "Email": "contato@livraria.com.br",
            "Phone": "4133334444",
            "Address": {
                "Road": "Rua XV de Novembro",
                "Number": "700",
                "Neighbourhood": "Centro",
                "City": "Curitiba",
                "State": "PR",
                "ZipCode": "80020000"
            }
        })]
    );
}

#[tokio::test]
async fn test_register_rejected_by_service() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake.clone()).await);

    let mut registration = state.services.clients.registration();
    fill_organization(&mut registration, "00000000000000");

    let err = registration.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Submission(msg) if msg == "Invalid CNPJ"));
    assert!(matches!(
        registration.phase(),
        RegistrationPhase::Editing { submit_error: Some(_) }
    ));
    assert!(fake.registrations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_directory_and_catalogue() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake.clone()).await);

    let clients = state.services.clients.list(ClientStatus::All).await.unwrap();
    assert_eq!(clients[1].document.as_deref(), Some("11222333000181"));
    assert_eq!(*fake.status_queries.lock().unwrap(), vec!["all".to_string()]);

    let books = state.services.catalog.list_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].rating_label(), "4.50");
    assert_eq!(books[1].rating_label(), "N/A");
    assert_eq!(books[0].isbn, "9780441013593");

    let copies = state.services.catalog.list_copies().await.unwrap();
    let copy_ids: Vec<i32> = copies.iter().map(|c| c.id).collect();
    assert_eq!(copy_ids, vec![10, TAKEN_COPY, FINED_COPY]);
}

#[tokio::test]
async fn test_service_shaped_rosters_reach_ready() {
    let fake = Arc::new(FakeLibrary::new());
    let state = desk(spawn_fake(fake).await);

    let mut composer = state.services.loan_composer();
    composer.load_rosters().await.unwrap();
    assert_eq!(composer.phase(), ComposerPhase::Ready { submit_error: None });

    let ana = &composer.clients()[0];
    assert_eq!(ana.document.as_deref(), Some("12345678900"));
    let address = ana.address.as_ref().unwrap();
    assert_eq!(address.number.as_deref(), Some("700"));
    assert_eq!(address.complement, None);
    assert_eq!(
        address.to_string(),
        "Rua XV de Novembro, 700 - Centro - Curitiba/PR"
    );

    let livraria = &composer.clients()[1];
    assert_eq!(livraria.trade_name.as_deref(), Some("Livraria"));
    assert_eq!(
        livraria.address.as_ref().and_then(|a| a.complement.as_deref()),
        Some("Loja 3")
    );

    assert!(!composer.copies().is_empty());
    let dune = &composer.copies()[0];
    assert_eq!(dune.isbn.as_deref(), Some("9780441013593"));
    assert_eq!(dune.edition.as_deref(), Some("1"));
    assert_eq!(dune.to_string(), "Dune (copy ID:10) - Central");
}
