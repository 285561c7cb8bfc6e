//! HTTP behavior tests for the API client against a mock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedmon::client::ApiClient;
use schedmon::config::Config;
use schedmon::error::CliError;
use schedmon_types::{LimitKind, SchedulerControl};

fn test_client(server: &MockServer) -> ApiClient {
    let config = Config {
        api_url: server.uri(),
        ..Config::default()
    };
    ApiClient::new(&config).unwrap()
}

fn scheduler_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "pk": 7,
        "ctime": "2 hours ago",
        "waiting_process_count": 3,
        "running_process_count": 5,
        "running_calcjob_count": 4,
        "running_workflow_count": 1,
        "max_processes": 100,
        "max_calcjobs": 50,
        "max_workflows": 20,
        "running": true
    })
}

#[tokio::test]
async fn test_list_parses_schedulers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([scheduler_body("a"), scheduler_body("b")])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let schedulers = client.list().await.unwrap();

    assert_eq!(schedulers.len(), 2);
    assert_eq!(schedulers[0].name, "a");
    assert_eq!(schedulers[1].max_calcjobs, 50);
}

#[tokio::test]
async fn test_error_detail_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduler/delete"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Scheduler 'prod' is running, please stop it first."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.delete("prod").await.unwrap_err();

    match err {
        CliError::Api { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Scheduler 'prod' is running, please stop it first.");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_without_detail_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/data/prod"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.scheduler_data("prod").await.unwrap_err();

    match err {
        CliError::Api { status, detail } => {
            assert_eq!(status, 500);
            assert!(detail.contains("500"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_set_limit_posts_name_and_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduler/set_max_calcjobs"))
        .and(body_json(json!({ "name": "prod", "max_calcjobs": 25 })))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = scheduler_body("prod");
            body["max_calcjobs"] = json!(25);
            body
        }))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let scheduler = client
        .set_limit("prod", LimitKind::Calcjobs, 25)
        .await
        .unwrap();

    assert_eq!(scheduler.max_calcjobs, 25);
}

#[tokio::test]
async fn test_stop_sends_name_as_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduler/stop"))
        .and(query_param("name", "prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduler_body("prod")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.stop("prod").await.unwrap();
}

#[tokio::test]
async fn test_start_omits_unset_limits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scheduler/start"))
        .and(body_json(json!({
            "name": "prod",
            "max_calcjobs": 10,
            "foreground": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduler_body("prod")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let control = SchedulerControl {
        name: "prod".to_string(),
        max_calcjobs: Some(10),
        ..SchedulerControl::default()
    };
    client.start(&control).await.unwrap();
}
