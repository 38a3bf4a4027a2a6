//! HTTP source tests against a local mock server.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wod_digest::config::{CrossfitDbConfig, N8Config};
use wod_digest::{CrossfitDbSource, N8Source, SourceError, SyncRunner, WeekRange, WodSource};
use wod_format::Source;

fn week() -> WeekRange {
    WeekRange::containing(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
}

fn crossfitdb(server: &MockServer) -> CrossfitDbSource {
    CrossfitDbSource::new(
        CrossfitDbConfig {
            api_url: format!("{}/api/v1/wods", server.uri()),
            username: "coach".to_string(),
            password: "secret".to_string(),
            user_id: "11".to_string(),
            app_id: "22".to_string(),
        },
        reqwest::Client::new(),
    )
}

fn n8(server: &MockServer) -> N8Source {
    N8Source::new(
        N8Config {
            api_url: format!("{}/api/activity", server.uri()),
            user_id: "77".to_string(),
        },
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn crossfitdb_sends_credentials_and_week() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/wods"))
        .and(query_param("username", "coach"))
        .and(query_param("password", "secret"))
        .and(query_param("user_id", "11"))
        .and(query_param("app_id", "22"))
        .and(query_param("start_date", "2025-03-03"))
        .and(query_param("end_date", "2025-03-07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wods": [
                {"id": 1, "date": "2025-03-04", "content": "<p>A) Strength</p><p>Back squat 5x5</p>"},
                {"id": 2, "date": "2025-03-05", "content": ""},
                {"id": "3", "date": "2025-03-03", "content": "<p>Row 500m</p>"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = crossfitdb(&server).fetch(&week()).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source_id, "1");
    assert_eq!(entries[0].weekday_label, "Martes");
    assert_eq!(entries[1].source_id, "3");
    assert_eq!(entries[1].iso_date, "2025-03-03");
}

#[tokio::test]
async fn crossfitdb_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/wods"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let err = crossfitdb(&server).fetch(&week()).await.unwrap_err();
    match err {
        SourceError::Status {
            source_name,
            status,
            body,
        } => {
            assert_eq!(source_name, Source::CrossfitDb);
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn crossfitdb_bad_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = crossfitdb(&server).fetch(&week()).await.unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
}

#[tokio::test]
async fn n8_keeps_only_this_weeks_wod_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity"))
        .and(query_param("timeLineFormat", "0"))
        .and(query_param("timeLineContent", "7"))
        .and(query_param("userID", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"TIPOWODs": [
                    {"id": 10, "notes": "WOD jueves 6 de marzo<br>a) fuerza<br>back squat"},
                    {"id": 11, "notes": "Recordad traer comba"}
                ]},
                {"TIPOWODs": [
                    {"id": 12, "notes": "WOD lunes 3 de marzo<br>amrap 12<br>• 10 burpees"},
                    {"id": 13, "notes": "WOD viernes 28 de febrero<br>for time"},
                    {"id": 14, "notes": "WOD sin fecha"}
                ]},
                {"other": true}
            ]
        })))
        .mount(&server)
        .await;

    let entries = n8(&server).fetch(&week()).await.unwrap();

    let ids: Vec<_> = entries.iter().map(|e| e.source_id.as_str()).collect();
    assert_eq!(ids, vec!["10", "12", "14"]);
    assert_eq!(entries[0].weekday_label, "Jueves");
    assert_eq!(entries[0].iso_date, "2025-03-06");
    assert_eq!(entries[1].weekday_label, "Lunes");
    // Undated WODs are kept with empty placeholders.
    assert_eq!(entries[2].iso_date, "");
}

#[tokio::test]
async fn n8_sync_renders_digest_in_weekday_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{"TIPOWODs": [
                {"id": 1, "notes": "WOD jueves 6 de marzo<br>a) metcon<br>amrap 12<br>• 10 burpees"},
                {"id": 2, "notes": "WOD lunes 3 de marzo<br>a) fuerza<br>back squat 5x5"}
            ]}]
        })))
        .mount(&server)
        .await;

    let source = n8(&server);
    let report = SyncRunner::dry_run("WODs de la semana")
        .run(&source, &week())
        .await
        .unwrap();

    assert_eq!(report.source, Source::N8);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.rendered, 2);
    let html = report.digest.unwrap().html;
    let lunes = html.find("WOD DEL Lunes 03/03/2025").unwrap();
    let jueves = html.find("WOD DEL Jueves 06/03/2025").unwrap();
    assert!(lunes < jueves);
    assert!(html.contains("<div class=\"section-header\">A) METCON</div>"));
    assert!(html.contains("<div class=\"workout-type\">AMRAP 12</div>"));
    assert!(html.contains("<li>10 Burpees</li>"));
    assert!(html.contains("<div class=\"subsection\">Back Squat 5X5</div>"));
}

#[tokio::test]
async fn n8_server_error_fails_only_that_source() {
    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&failing)
        .await;

    let working = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wods": []})))
        .mount(&working)
        .await;

    let sources: Vec<Box<dyn WodSource>> =
        vec![Box::new(n8(&failing)), Box::new(crossfitdb(&working))];
    let results = SyncRunner::dry_run("x").run_all(&sources, &week()).await;

    assert!(results[0].1.is_err());
    let report = results[1].1.as_ref().unwrap();
    assert_eq!(report.fetched, 0);
    assert!(report.digest.is_none());
}
