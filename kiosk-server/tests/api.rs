//! End-to-end tests through the axum router against the in-memory store

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use chrono::TimeZone;
use chrono_tz::Asia::Seoul;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use kiosk_server::clock::FixedClock;
use kiosk_server::sheets::{
    CellRef, MemoryStore, OrderColumnNames, RegistrationColumnNames, SheetStore, StoreResult,
    Table,
};
use kiosk_server::{AppState, Config, api};
use serde_json::{Value, json};
use tower::ServiceExt;

const PAID: &str = "2024111111";
const UNPAID: &str = "2024222222";
const OPTION: &str = "1주 구독 11.25(월)~12.1(일)";

struct Kiosk {
    app: Router,
    store: Arc<MemoryStore>,
    clock: Arc<FixedClock>,
}

fn registration(student_id: &str, name: &str, payment: &str) -> Vec<String> {
    [
        "2024. 11. 20 오후 3:00:00",
        OPTION,
        name,
        "010-0000-0000",
        student_id,
        "동의합니다",
        payment,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn order(student_id: &str, timestamp: &str) -> Vec<String> {
    vec![student_id.to_string(), "아메리카노".to_string(), timestamp.to_string()]
}

async fn kiosk() -> Kiosk {
    let store = Arc::new(MemoryStore::with_headers(
        &RegistrationColumnNames::default(),
        &OrderColumnNames::default(),
    ));
    store.push_row(Table::Registrations, registration(PAID, "김연세", "O"));
    store.push_row(Table::Registrations, registration(UNPAID, "이연세", ""));

    // Thursday 2024-11-28 14:00 in Seoul
    let clock = Arc::new(FixedClock::new(
        Seoul.with_ymd_and_hms(2024, 11, 28, 14, 0, 0).unwrap(),
    ));

    let config = Config::from_lookup(|name| (name == "STORE_BACKEND").then(|| "memory".to_string()))
        .unwrap();
    let state = AppState::with_store(&config, store.clone(), clock.clone())
        .await
        .unwrap();

    Kiosk {
        app: api::build_app(state, Duration::from_secs(5)),
        store,
        clock,
    }
}

impl Kiosk {
    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(self.app.clone(), request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(self.app.clone(), request).await
    }

    async fn check(&self, student_id: &str) -> (StatusCode, Value) {
        self.post("/api/check-student", json!({ "studentId": student_id }))
            .await
    }

    async fn order(&self, student_id: &str, beverage: &str) -> (StatusCode, Value) {
        self.post(
            "/api/place-order",
            json!({ "studentId": student_id, "beverage": beverage }),
        )
        .await
    }

    fn orders(&self) -> Vec<Vec<String>> {
        self.store.rows(Table::Orders)
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_unregistered_student_is_not_a_server_error() {
    let kiosk = kiosk().await;
    let (status, body) = kiosk.check("1999000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
    assert_eq!(
        body["message"],
        "해당 학번으로 등록되지 않았어요. QR 코드로 신청할 수 있도록 안내해주세요."
    );
}

#[tokio::test]
async fn test_empty_student_id_is_rejected_before_store_access() {
    let kiosk = kiosk().await;
    kiosk.store.set_offline(true);

    let (status, body) = kiosk.check("   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "학번을 입력해주세요.");

    let (status, _) = kiosk.post("/api/check-student", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let kiosk = kiosk().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/check-student")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(kiosk.app.clone(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn test_paid_student_without_orders_goes_to_menu() {
    let kiosk = kiosk().await;
    let (status, body) = kiosk.check(PAID).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    let data = &body["data"];
    assert_eq!(data["student"]["name"], "김연세");
    assert_eq!(data["drinksToday"], 0);
    assert_eq!(data["usageAllowed"], true);
    assert_eq!(data["paymentRequired"], false);
    assert_eq!(data["orderWindowOpen"], true);
    assert_eq!(data["window"]["start"], "2024-11-25");
    assert_eq!(data["window"]["end"], "2024-12-01");
    assert_eq!(data["nextStep"], "menu");
    assert!(data.get("warning").is_none());
}

#[tokio::test]
async fn test_unpaid_student_is_sent_to_payment() {
    let kiosk = kiosk().await;
    let (status, body) = kiosk.check(UNPAID).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "첫 결제 대상자에요!");
    assert_eq!(body["data"]["paymentRequired"], true);
    assert_eq!(body["data"]["warning"], "첫 결제 대상자에요!");
    assert_eq!(body["data"]["nextStep"], "payment");
}

#[tokio::test]
async fn test_place_order_appends_formatted_row() {
    let kiosk = kiosk().await;
    let (status, body) = kiosk.order(PAID, "카페라떼").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "주문이 완료되었습니다.");
    assert_eq!(body["data"]["drinksToday"], 1);
    assert_eq!(body["data"]["timestamp"], "2024. 11. 28. 오후 02:00:00");

    let orders = kiosk.orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1], vec![PAID, "카페라떼", "2024. 11. 28. 오후 02:00:00"]);

    let (_, body) = kiosk.check(PAID).await;
    assert_eq!(body["data"]["drinksToday"], 1);
    assert_eq!(body["data"]["lastOrderAt"], "2024-11-28T14:00:00+09:00");
}

#[tokio::test]
async fn test_cooldown_boundary() {
    let kiosk = kiosk().await;
    let (status, _) = kiosk.order(PAID, "아메리카노").await;
    assert_eq!(status, StatusCode::OK);

    kiosk.clock.advance(chrono::Duration::minutes(29));
    let (status, body) = kiosk.check(PAID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usageAllowed"], false);
    assert_eq!(body["data"]["cooldownActive"], true);
    assert_eq!(body["data"]["retryAfterMinutes"], 1);
    assert_eq!(body["data"]["nextStep"], "blocked");
    assert_eq!(body["message"], "김연세님이 음료수를 마신지 30분이 안지났어요.");

    let (status, body) = kiosk.order(PAID, "아메리카노").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 2002);
    assert_eq!(kiosk.orders().len(), 2);

    kiosk.clock.advance(chrono::Duration::minutes(1));
    let (status, body) = kiosk.order(PAID, "아메리카노").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["drinksToday"], 2);
}

#[tokio::test]
async fn test_daily_limit_blocks_regardless_of_cooldown() {
    let kiosk = kiosk().await;
    kiosk.store.push_row(Table::Orders, order(PAID, "2024. 11. 28. 오전 09:10:00"));
    kiosk.store.push_row(Table::Orders, order(PAID, "2024. 11. 28. 오전 11:45:30"));
    // Yesterday's order does not count
    kiosk.store.push_row(Table::Orders, order(PAID, "2024. 11. 27. 오후 05:00:00"));

    let (status, body) = kiosk.check(PAID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["drinksToday"], 2);
    assert_eq!(body["data"]["dailyLimitReached"], true);
    assert_eq!(body["data"]["usageAllowed"], true);
    assert_eq!(body["data"]["nextStep"], "blocked");
    assert_eq!(body["message"], "김연세님은 이미 2잔을 마셨어요.");

    let (status, body) = kiosk.order(PAID, "카페라떼").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 2001);
    assert_eq!(kiosk.orders().len(), 4);
}

#[tokio::test]
async fn test_malformed_timestamp_is_ignored() {
    let kiosk = kiosk().await;
    kiosk.store.push_row(Table::Orders, order(PAID, "어제 저녁쯤"));
    kiosk.store.push_row(Table::Orders, order(PAID, ""));

    let (status, body) = kiosk.check(PAID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["drinksToday"], 0);
    assert_eq!(body["data"]["usageAllowed"], true);
    assert_eq!(body["data"]["nextStep"], "menu");
}

#[tokio::test]
async fn test_payment_flow() {
    let kiosk = kiosk().await;

    let (status, body) = kiosk.order(UNPAID, "아메리카노").await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], 1002);
    assert_eq!(kiosk.orders().len(), 1);

    let (status, body) = kiosk
        .post("/api/confirm-payment", json!({ "studentId": UNPAID, "name": "이연세" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "결제 확인 완료");
    assert_eq!(body["data"]["alreadyPaid"], false);
    assert_eq!(kiosk.store.rows(Table::Registrations)[2][6], "O");

    let (status, body) = kiosk
        .post("/api/confirm-payment", json!({ "studentId": UNPAID }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alreadyPaid"], true);

    let (_, body) = kiosk.check(UNPAID).await;
    assert_eq!(body["data"]["nextStep"], "menu");

    let (status, _) = kiosk.order(UNPAID, "아메리카노").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_confirm_payment_unknown_student() {
    let kiosk = kiosk().await;
    let (status, body) = kiosk
        .post("/api/confirm-payment", json!({ "studentId": "1999000000" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "사용자를 찾을 수 없습니다.");
}

#[tokio::test]
async fn test_outside_subscription_window() {
    let kiosk = kiosk().await;
    kiosk
        .clock
        .set(Seoul.with_ymd_and_hms(2024, 12, 2, 9, 0, 0).unwrap());

    let (status, body) = kiosk.check(PAID).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderWindowOpen"], false);
    assert_eq!(body["data"]["nextStep"], "blocked");

    let (status, body) = kiosk.order(PAID, "아메리카노").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
    assert_eq!(
        body["message"],
        "아직 사용기간이 아닙니다. 기간이 시작되면 이용해주세요."
    );
}

#[tokio::test]
async fn test_order_validation() {
    let kiosk = kiosk().await;

    let (status, body) = kiosk.order(PAID, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "학번 또는 메뉴 정보가 없습니다.");

    let (status, body) = kiosk.order(PAID, "녹차").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2004);

    let (status, body) = kiosk.order("1999000000", "아메리카노").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);

    assert_eq!(kiosk.orders().len(), 1);
}

#[tokio::test]
async fn test_store_outage_is_generic_system_error() {
    let kiosk = kiosk().await;
    kiosk.store.set_offline(true);

    let (status, body) = kiosk.check(PAID).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 9002);
    assert_eq!(body["message"], "시스템 오류가 발생했습니다.");

    let (status, _) = kiosk.order(PAID, "아메리카노").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

/// Memory store whose reads stall once `stalled` is set
struct StallingStore {
    inner: Arc<MemoryStore>,
    stalled: AtomicBool,
}

#[async_trait::async_trait]
impl SheetStore for StallingStore {
    fn backend_name(&self) -> &'static str {
        "stalling"
    }

    async fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        if self.stalled.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        self.inner.fetch_rows(table).await
    }

    async fn update_cell(&self, table: Table, cell: CellRef, value: &str) -> StoreResult<()> {
        self.inner.update_cell(table, cell, value).await
    }

    async fn append_row(&self, table: Table, values: Vec<String>) -> StoreResult<()> {
        self.inner.append_row(table, values).await
    }
}

#[tokio::test]
async fn test_request_timeout_uses_envelope() {
    let inner = Arc::new(MemoryStore::with_headers(
        &RegistrationColumnNames::default(),
        &OrderColumnNames::default(),
    ));
    inner.push_row(Table::Registrations, registration(PAID, "김연세", "O"));
    let store = Arc::new(StallingStore {
        inner,
        stalled: AtomicBool::new(false),
    });
    let clock = Arc::new(FixedClock::new(
        Seoul.with_ymd_and_hms(2024, 11, 28, 14, 0, 0).unwrap(),
    ));
    let config = Config::from_lookup(|name| (name == "STORE_BACKEND").then(|| "memory".to_string()))
        .unwrap();
    let state = AppState::with_store(&config, store.clone(), clock).await.unwrap();
    let app = api::build_app(state, Duration::from_millis(100));

    store.stalled.store(true, Ordering::SeqCst);
    let request = Request::builder()
        .method("POST")
        .uri("/api/check-student")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "studentId": PAID }).to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 9005);
    assert_eq!(body["message"], "시스템 오류가 발생했습니다.");
}

#[tokio::test]
async fn test_concurrent_orders_for_one_student() {
    let kiosk = kiosk().await;
    let (a, b) = tokio::join!(
        kiosk.order(PAID, "아메리카노"),
        kiosk.order(PAID, "카페라떼"),
    );

    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]);
    assert_eq!(kiosk.orders().len(), 2);
}

#[tokio::test]
async fn test_menu_and_health() {
    let kiosk = kiosk().await;

    let (status, body) = kiosk.get("/api/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["beverages"], json!(["아메리카노", "카페라떼"]));

    let (status, body) = kiosk.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["timezone"], "Asia/Seoul");
}
