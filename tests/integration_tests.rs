//! Integration tests for Go-Out MCP
//!
//! These tests drive the tool registry end to end over the scripted
//! [`MockApi`], and the HTTP client against a local mockito server.

use go_out_mcp::api::{GoOutApi, GoOutClient, MockApi, MockShortener};
use go_out_mcp::config::Defaults;
use go_out_mcp::mcp::{McpServer, ToolRegistry};
use go_out_mcp::models::{
    EventsRequest, ParticipantStatus, ParticipantsRequest, RawEvent, RawOrder,
    RawParticipantStatistics, TrackingLinksResponse, UserRolesRequest, UserRolesResponse,
};
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn registry(api: Arc<MockApi>) -> ToolRegistry {
    ToolRegistry::with_api(api, Arc::new(MockShortener::new()), Defaults::default())
}

fn order(value: Value) -> RawOrder {
    serde_json::from_value(value).unwrap()
}

fn events(count: usize) -> Vec<RawEvent> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "_id": format!("ev{}", i),
                "Title": format!("Party #{}", i),
                "Url": format!("party-{}", i),
                "Adress": "Tel Aviv",
                "StartingDate": "2024-08-01T20:00:00.000Z",
                "EndingDate": "2024-08-02T04:00:00.000Z",
                "statistics": { "Accepted": i, "Hidden": 1 }
            }))
            .unwrap()
        })
        .collect()
}

fn referred_order(id: &str, referrer: &str, status: &str, companions: usize) -> RawOrder {
    let meta: Vec<Value> = (0..companions)
        .map(|i| json!({ "_id": format!("{}-c{}", id, i), "first_name": "Guest", "last_name": i.to_string() }))
        .collect();
    order(json!({
        "_id": id,
        "first_name": "Noa",
        "last_name": "Levi",
        "status": status,
        "has_ref": true,
        "ref": referrer,
        "ref_first_name": "Avi",
        "ref_last_name": "",
        "meta": meta
    }))
}

// ========== get_events ==========

#[tokio::test]
async fn test_get_events_stops_at_limit() {
    let api = Arc::new(MockApi::new());
    api.set_events(events(17), 5);

    let response = registry(api.clone())
        .call("get_events", json!({ "limit": 12 }))
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["count"], json!(12));
    assert_eq!(response["limit"], json!(12));
    assert_eq!(response["skip"], json!(0));
    assert_eq!(response["hasMore"], json!(true));

    let offsets: Vec<usize> = api.events_requests().iter().map(|r| r.skip).collect();
    assert_eq!(offsets, vec![0, 5, 10]);

    let first = &response["events"][0];
    assert_eq!(first["id"], json!("ev0"));
    assert_eq!(first["title"], json!("Party #0"));
    assert_eq!(first["address"], json!("Tel Aviv"));
    assert_eq!(
        first["statistics"],
        json!({ "accepted": 0, "pending": 0, "rejected": 0, "hidden": 1 })
    );
}

#[tokio::test]
async fn test_get_events_exhausts_source() {
    let api = Arc::new(MockApi::new());
    api.set_events(events(17), 5);

    let response = registry(api.clone())
        .call("get_events", json!({ "limit": 17, "isActive": false, "search": "party" }))
        .await;

    assert_eq!(response["count"], json!(17));
    assert_eq!(response["hasMore"], json!(false));

    let requests = api.events_requests();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|r| !r.is_active && r.search == "party"));
}

#[tokio::test]
async fn test_get_events_upstream_failure() {
    let api = Arc::new(MockApi::new());
    api.fail_events("Unauthorized");

    let response = registry(api).call("get_events", json!({})).await;
    assert_eq!(
        response,
        json!({ "success": false, "error": "Go-Out API error (500): Unauthorized" })
    );
}

// ========== get_event_participants ==========

#[tokio::test]
async fn test_participants_merge_and_flatten() {
    let api = Arc::new(MockApi::new());
    api.set_participants(
        ParticipantStatus::All,
        vec![order(json!({
            "_id": "o1",
            "first_name": "Dana",
            "last_name": "Cohen",
            "status": "Accepted",
            "gender": "female",
            "instagram_link": "dana.c",
            "dynamicField0": "Yes",
            "meta": [
                { "_id": "c1", "first_name": "Eli", "last_name": "Cohen", "gender": "male" },
                { "_id": "c2", "first_name": "Maya", "last_name": "Cohen" }
            ]
        }))],
    );
    api.set_participants(
        ParticipantStatus::Hidden,
        vec![order(json!({ "_id": "o2", "first_name": "Ron", "status": "Accepted", "hidden": true }))],
    );

    let response = registry(api.clone())
        .call("get_event_participants", json!({ "eventId": "ev1" }))
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["eventId"], json!("ev1"));
    assert_eq!(response["orderCount"], json!(2));
    assert_eq!(response["count"], json!(4));
    assert_eq!(response["status"], json!("All (including hidden)"));

    let participants = response["participants"].as_array().unwrap();
    let ids: Vec<&str> = participants
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["o1", "c1", "c2", "o2"]);

    let primary = &participants[0];
    assert_eq!(primary["isCompanion"], json!(false));
    assert!(primary.get("primaryParticipantName").is_none());
    assert_eq!(primary["instagramLink"], json!("https://www.instagram.com/dana.c"));
    assert_eq!(primary["dynamicFields"], json!({ "dynamicField0": "Yes" }));

    let companion = &participants[1];
    assert_eq!(companion["isCompanion"], json!(true));
    assert_eq!(companion["orderId"], json!("o1"));
    assert_eq!(companion["gender"], json!("male"));
    assert_eq!(companion["primaryParticipantName"], json!("Dana Cohen"));
    assert_eq!(companion["dynamicFields"], json!({ "dynamicField0": "Yes" }));

    // No own gender: inherits the order's
    assert_eq!(participants[2]["gender"], json!("female"));
    assert_eq!(participants[3]["hidden"], json!(true));

    assert_eq!(api.participant_requests().len(), 2);
}

#[tokio::test]
async fn test_participants_specific_status() {
    let api = Arc::new(MockApi::new());
    api.set_participants(
        ParticipantStatus::Pending,
        vec![order(json!({ "_id": "o1", "status": "Pending" }))],
    );

    let response = registry(api.clone())
        .call(
            "get_event_participants",
            json!({ "eventId": "ev1", "status": "Pending", "limit": 10, "skip": 20 }),
        )
        .await;

    assert_eq!(response["status"], json!("Pending"));
    assert_eq!(response["skip"], json!(20));
    assert_eq!(response["count"], json!(1));

    let requests = api.participant_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        ParticipantsRequest::new("ev1")
            .status(ParticipantStatus::Pending)
            .limit(10)
            .skip(20)
    );
}

#[tokio::test]
async fn test_participants_validation_happens_before_fetch() {
    let api = Arc::new(MockApi::new());
    let registry = registry(api.clone());

    let response = registry.call("get_event_participants", json!({})).await;
    assert_eq!(response["error"], json!("eventId is required"));

    let response = registry
        .call("get_event_participants", json!({ "eventId": "" }))
        .await;
    assert_eq!(response["error"], json!("eventId is required"));

    let response = registry
        .call("get_event_participants", json!({ "eventId": "ev1", "status": "Maybe" }))
        .await;
    assert_eq!(response["success"], json!(false));
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("All, Pending, Accepted, Rejected, Hidden"));

    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_participants_hidden_failure_fails_tool() {
    let api = Arc::new(MockApi::new());
    api.set_participants(ParticipantStatus::All, vec![order(json!({ "_id": "o1" }))]);
    api.fail_participants(ParticipantStatus::Hidden, "timeout");

    let response = registry(api)
        .call("get_event_participants", json!({ "eventId": "ev1" }))
        .await;
    assert_eq!(response["success"], json!(false));
    assert!(response["error"].as_str().unwrap().contains("timeout"));
}

// ========== get_event_statistics ==========

#[tokio::test]
async fn test_event_statistics_total_excludes_failed() {
    let api = Arc::new(MockApi::new());
    api.set_statistics(RawParticipantStatistics {
        accepted: Some(10),
        pending: Some(3),
        rejected: None,
        hidden: Some(2),
        failed: Some(4),
    });

    let response = registry(api)
        .call("get_event_statistics", json!({ "eventId": "ev1" }))
        .await;

    assert_eq!(
        response,
        json!({
            "success": true,
            "eventId": "ev1",
            "statistics": {
                "accepted": 10,
                "pending": 3,
                "rejected": 0,
                "hidden": 2,
                "failed": 4,
                "total": 15
            }
        })
    );
}

#[tokio::test]
async fn test_statistics_tools_require_event_id() {
    let api = Arc::new(MockApi::new());
    let registry = registry(api.clone());

    for tool in ["get_event_statistics", "get_salesman_statistics"] {
        let response = registry.call(tool, json!({})).await;
        assert_eq!(response["error"], json!("eventId is required"));
    }
    assert_eq!(api.call_count(), 0);

    registry
        .call("get_event_statistics", json!({ "eventId": "ev1" }))
        .await;
    assert_eq!(api.statistics_requests(), vec!["ev1".to_string()]);
    assert_eq!(api.call_count(), 1);
}

// ========== get_salesman_statistics ==========

fn user_roles() -> UserRolesResponse {
    serde_json::from_value(json!({
        "status": true,
        "users": [
            {
                "_id": "u1",
                "user_phone_number": "0501111111",
                "user_first_name": "Avi",
                "last_name": "Levi",
                "frees": 2,
                "paid": 1,
                "statistics": { "credit": 70 },
                "Views": 40
            },
            {
                "_id": "u2",
                "user_phone_number": "0502222222",
                "first_name": "Tal",
                "user_last_name": "Mor",
                "frees": 1,
                "paid": 4,
                "statistics": { "credit": 280 },
                "views": 10,
                "added_by": { "first_name": "Boss", "last_name": "One", "phone_number": "0500000000" }
            }
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_salesman_statistics() {
    let api = Arc::new(MockApi::new());
    api.set_user_roles(user_roles());
    api.set_tracking_links(
        serde_json::from_value(json!({
            "status": true,
            "Links": [{
                "link": "promo",
                "link_name": "Instagram promo",
                "referer": { "ref_first_name": "Shir", "ref_phone_number": "0503333333" },
                "frees": 2,
                "total_revenue": 700,
                "sold": 15,
                "views": 100
            }]
        }))
        .unwrap(),
    );

    let response = registry(api.clone())
        .call(
            "get_salesman_statistics",
            json!({ "eventId": "ev1", "search": "a", "skipNum": 10 }),
        )
        .await;

    assert_eq!(response["success"], json!(true));

    let salesmen = response["salesmen"].as_array().unwrap();
    let order: Vec<&str> = salesmen.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["promo", "u2", "u1"]);

    let link = &salesmen[0];
    assert_eq!(link["type"], json!("tracking_link"));
    assert_eq!(link["statistics"]["paidRegistrations"], json!(10));
    assert_eq!(link["statistics"]["totalRegistrations"], json!(12));
    assert_eq!(link["hiddenRegistrations"], json!(3));
    assert_eq!(link["referer"]["phoneNumber"], json!("0503333333"));

    let avi = &salesmen[2];
    assert_eq!(avi["type"], json!("salesman"));
    assert_eq!(avi["firstName"], json!("Avi"));
    assert_eq!(avi["lastName"], json!("Levi"));
    assert_eq!(avi["statistics"]["views"], json!(40));
    assert_eq!(avi["addedBy"], Value::Null);
    assert_eq!(avi["disabled"], json!(false));
    assert_eq!(avi["permissions"], json!({}));

    let summary = &response["summary"];
    assert_eq!(summary["totalSalesmen"], json!(3));
    assert_eq!(summary["totalRegistrations"], json!(20));
    assert_eq!(summary["totalFreeRegistrations"], json!(5));
    assert_eq!(summary["totalPaidRegistrations"], json!(15));
    assert_eq!(summary["totalViews"], json!(150));
    assert_eq!(summary["totalRevenue"].as_f64(), Some(1050.0));
    assert_eq!(summary["topSalesman"]["id"], json!("promo"));
    assert_eq!(summary["topSalesman"]["name"], json!("Instagram promo"));
    assert_eq!(summary["topSalesman"]["phoneNumber"], json!("0503333333"));
    assert_eq!(summary["topSalesman"]["type"], json!("tracking_link"));

    assert_eq!(
        api.user_roles_requests(),
        vec![UserRolesRequest::new("ev1").skip_num(10).search("a")]
    );
}

#[tokio::test]
async fn test_salesman_statistics_tolerates_tracking_link_failure() {
    let api = Arc::new(MockApi::new());
    api.set_user_roles(user_roles());
    api.fail_tracking_links("Service Unavailable");

    let response = registry(api)
        .call("get_salesman_statistics", json!({ "eventId": "ev1" }))
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["summary"]["totalSalesmen"], json!(2));
    assert_eq!(response["summary"]["topSalesman"]["id"], json!("u2"));
    assert_eq!(response["summary"]["topSalesman"]["name"], json!("Tal Mor"));
}

#[tokio::test]
async fn test_salesman_statistics_user_roles_failure() {
    let api = Arc::new(MockApi::new());
    api.fail_user_roles("Forbidden");
    api.set_tracking_links(TrackingLinksResponse::unavailable());

    let response = registry(api)
        .call("get_salesman_statistics", json!({ "eventId": "ev1" }))
        .await;
    assert_eq!(response["success"], json!(false));
    assert!(response["error"].as_str().unwrap().contains("Forbidden"));
}

#[tokio::test]
async fn test_salesman_statistics_empty() {
    let api = Arc::new(MockApi::new());

    let response = registry(api)
        .call("get_salesman_statistics", json!({ "eventId": "ev1" }))
        .await;
    assert_eq!(response["salesmen"], json!([]));
    assert_eq!(response["summary"]["totalSalesmen"], json!(0));
    assert_eq!(response["summary"]["topSalesman"], Value::Null);
}

// ========== get_participants_by_salesman ==========

#[tokio::test]
async fn test_participants_by_salesman() {
    let api = Arc::new(MockApi::new());
    api.set_participants(
        ParticipantStatus::All,
        vec![
            referred_order("o1", "050-123 4567", "Accepted", 2),
            referred_order("o2", "0529999999", "Accepted", 0),
            order(json!({ "_id": "o3", "has_ref": false, "ref": "0501234567", "status": "Accepted" })),
            referred_order("o4", "(050) 1234567", "Pending", 0),
        ],
    );
    api.set_participants(
        ParticipantStatus::Hidden,
        vec![referred_order("o5", "0501234567", "Hidden", 1)],
    );

    let response = registry(api.clone())
        .call(
            "get_participants_by_salesman",
            json!({ "eventId": "ev1", "salesmanId": "0501234567", "limit": 3, "skip": 1 }),
        )
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(
        response["salesman"],
        json!({
            "id": "050-123 4567",
            "firstName": "Avi",
            "lastName": null,
            "phoneNumber": "050-123 4567"
        })
    );
    assert_eq!(response["orderCount"], json!(3));
    assert_eq!(response["totalCount"], json!(6));
    assert_eq!(response["count"], json!(3));
    assert_eq!(response["skip"], json!(1));
    assert_eq!(response["limit"], json!(3));
    assert_eq!(response["status"], json!("All (including hidden)"));

    // o1 (3 rows), o4 (1 row), o5 (2 rows): accepted 3, pending 1, hidden 2
    assert_eq!(
        response["statistics"],
        json!({
            "totalRegistrations": 6,
            "accepted": 3,
            "hidden": 2,
            "hiddenPercentage": "66.67%",
            "pending": 1,
            "rejected": 0
        })
    );

    let ids: Vec<&str> = response["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["o1-c0", "o1-c1", "o4"]);

    let requests = api.participant_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.limit == 1000 && r.skip == 0));
}

#[tokio::test]
async fn test_participants_by_salesman_no_match() {
    let api = Arc::new(MockApi::new());
    api.set_participants(
        ParticipantStatus::All,
        vec![referred_order("o1", "0529999999", "Accepted", 0)],
    );

    let response = registry(api)
        .call(
            "get_participants_by_salesman",
            json!({ "eventId": "ev1", "salesmanId": "0501234567" }),
        )
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["salesman"], Value::Null);
    assert_eq!(response["totalCount"], json!(0));
    assert_eq!(response["statistics"]["hiddenPercentage"], json!("0.00%"));
    assert_eq!(response["participants"], json!([]));
}

#[tokio::test]
async fn test_participants_by_salesman_requires_salesman() {
    let api = Arc::new(MockApi::new());
    let response = registry(api.clone())
        .call("get_participants_by_salesman", json!({ "eventId": "ev1" }))
        .await;
    assert_eq!(response["error"], json!("salesmanId is required"));
    assert_eq!(api.call_count(), 0);
}

// ========== shorten_links ==========

#[tokio::test]
async fn test_shorten_links() {
    let shortener = Arc::new(MockShortener::new());
    shortener.fail_for("https://bad.example", "is.gd error: blocked");
    let registry = ToolRegistry::with_api(
        Arc::new(MockApi::new()),
        shortener.clone(),
        Defaults::default(),
    );

    let response = registry
        .call(
            "shorten_links",
            json!({ "urls": ["https://go-out.co/e/1", "https://bad.example"] }),
        )
        .await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["total"], json!(2));
    assert_eq!(response["successful"], json!(1));
    assert_eq!(response["failed"], json!(1));
    assert_eq!(
        response["results"][0],
        json!({ "original": "https://go-out.co/e/1", "shorturl": "https://is.gd/0", "success": true })
    );
    assert_eq!(response["results"][1]["error"], json!("is.gd error: blocked"));

    let single = registry
        .call("shorten_links", json!({ "urls": "https://go-out.co/e/2" }))
        .await;
    assert_eq!(single["total"], json!(1));

    let empty = registry.call("shorten_links", json!({ "urls": [] })).await;
    assert_eq!(empty["error"], json!("At least one URL is required"));

    let missing = registry.call("shorten_links", json!({})).await;
    assert_eq!(missing["error"], json!("urls parameter is required"));

    let blank = registry.call("shorten_links", json!({ "urls": "" })).await;
    assert_eq!(blank["error"], json!("urls parameter is required"));

    assert_eq!(shortener.calls().len(), 3);
}

// ========== MCP server ==========

#[test]
fn test_mcp_server_creation() {
    let server = McpServer::new(registry(Arc::new(MockApi::new())));
    assert!(server.is_ok());
}

// ========== GoOutClient over HTTP ==========

fn client(server: &mockito::ServerGuard) -> GoOutClient {
    GoOutClient::new(server.url(), "test-token", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_client_fetch_participants() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/getEventParticipants/")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "eventId": "ev1",
            "limit": 50,
            "skip": 0,
            "status": "Hidden",
            "userOnly": false,
            "hidden": true
        })))
        .with_status(200)
        .with_body(r#"[{"_id":"o1","first_name":"Dana","dynamicField3":"x"}]"#)
        .create_async()
        .await;

    let request = ParticipantsRequest::new("ev1")
        .status(ParticipantStatus::Hidden)
        .hidden(true);
    let orders = client(&server).fetch_participants(&request).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id.as_deref(), Some("o1"));
    assert_eq!(orders[0].extra.get("dynamicField3"), Some(&json!("x")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_null_participants_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/getEventParticipants/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let orders = client(&server)
        .fetch_participants(&ParticipantsRequest::new("ev1"))
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_client_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/getEventUserRoles")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = client(&server)
        .fetch_user_roles(&UserRolesRequest::new("ev1"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Go-Out API error (401): Unauthorized");
}

#[tokio::test]
async fn test_client_fetch_events_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/events/getMyEvents")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "skip": 5,
            "search": "summer",
            "status": false
        })))
        .with_status(200)
        .with_body(r#"{"events":[{"_id":"ev1","Title":"Summer"}]}"#)
        .create_async()
        .await;

    let response = client(&server)
        .fetch_events(&EventsRequest::new(false, "summer").skip(5))
        .await
        .unwrap();
    assert_eq!(response.into_events().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_statistics_encodes_event_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/getParticipantsStatistic/")
        .match_query(Matcher::UrlEncoded("eventId".into(), "ev 1/2".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(r#"{"Accepted":4,"Failed":1}"#)
        .create_async()
        .await;

    let stats = client(&server)
        .fetch_participant_statistics("ev 1/2")
        .await
        .unwrap();
    assert_eq!(stats.accepted, Some(4));
    assert_eq!(stats.failed, Some(1));
    assert_eq!(stats.pending, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_tracking_links() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/trackingLinks/getTrackingLinks")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({ "eventId": "ev1" })))
        .with_status(200)
        .with_body(r#"{"status":true,"Links":[{"link":"promo","sold":3}]}"#)
        .create_async()
        .await;

    let response = client(&server).fetch_tracking_links("ev1").await.unwrap();
    assert_eq!(response.status, Some(true));
    assert_eq!(response.links.unwrap()[0].link.as_deref(), Some("promo"));
}
