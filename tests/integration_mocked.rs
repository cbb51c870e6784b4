/// Integration tests with a mocked advertising API
/// Exercises the HTTP transport end to end without hitting the real service
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freedan::api_error::NormalizedError;
use freedan::config::Config;
use freedan::errors::AdsError;
use freedan::label::Label;
use freedan::negative_keyword::NegativeKeyword;
use freedan::retry::RetryPolicy;
use freedan::selector::ReportRequest;
use freedan::service::AdsService;
use freedan::http_transport::HttpTransport;
use freedan::upload::{UploadOptions, UploadPayload, IS_LABEL_DIAGNOSTIC};

/// Helper function to create a service talking to the mock server
fn create_test_service(server: &MockServer) -> AdsService<HttpTransport> {
    let mut config = Config::new(&server.uri(), "dev-token", "access-token");
    config.client_customer_id = Some("123-456-7890".to_string());
    config.http_timeout_secs = 5;

    let transport = HttpTransport::new(&config).unwrap();
    AdsService::new(
        transport,
        RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5)),
    )
    .with_batch_polling(Duration::from_millis(1), 5)
}

fn negative_operations() -> Vec<freedan::operations::Operation> {
    let keyword = NegativeKeyword::new("free", "EXACT").unwrap();
    vec![
        keyword.add_adgroup_operation(11),
        keyword.add_adgroup_operation(12),
    ]
}

#[tokio::test]
async fn test_standard_upload_reports_partial_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .and(header("Authorization", "Bearer access-token"))
        .and(header("developerToken", "dev-token"))
        .and(header("clientCustomerId", "123-456-7890"))
        .and(header("validateOnly", "false"))
        .and(header("partialFailure", "true"))
        .and(body_partial_json(json!({
            "operations": [
                {"xsi_type": "AdGroupCriterionOperation", "operator": "ADD"},
                {"operator": "ADD"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"criterion": {"id": 1}}],
            "partialFailureErrors": [{
                "fieldPath": "operations[1].operand",
                "fieldPathElements": [{"field": "operations", "index": 1}],
                "errorString": "CriterionError.INVALID_KEYWORD_TEXT",
                "trigger": "free"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service
        .upload(
            &negative_operations(),
            &UploadOptions::standard("AdGroupCriterionService"),
        )
        .await
        .unwrap();

    assert_eq!(
        result.errors,
        vec![NormalizedError::new(
            1,
            "CriterionError.INVALID_KEYWORD_TEXT (trigger: free)"
        )]
    );
}

#[tokio::test]
async fn test_debug_upload_sends_validate_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .and(header("validateOnly", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service
        .upload(
            &negative_operations(),
            &UploadOptions::standard("AdGroupCriterionService").debug(true),
        )
        .await
        .unwrap();

    assert!(result.is_success());
}

#[tokio::test]
async fn test_live_upload_after_debug_upload_is_not_validate_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .and(header("validateOnly", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .and(header("validateOnly", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let options = UploadOptions::standard("AdGroupCriterionService");
    service
        .upload(&negative_operations(), &options.clone().debug(true))
        .await
        .unwrap();
    service
        .upload(&negative_operations(), &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fault_with_detail_becomes_operation_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/CampaignService/mutateLabel"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "fault": {
                "message": "[EntityNotFound.INVALID_ID @ operations[0]]",
                "detail": {"errors": [{
                    "fieldPath": "operations[0].operand.labelId",
                    "reason": "INVALID_ID"
                }]}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let label = Label::with_id("Brand", 3).unwrap();
    let result = service
        .upload(
            &[label.apply_on_campaign_operation(10).unwrap()],
            &UploadOptions::standard("CampaignService").label(true),
        )
        .await
        .unwrap();

    assert!(result.payload.is_none());
    assert_eq!(result.errors, vec![NormalizedError::new(0, "INVALID_ID")]);
}

#[tokio::test]
async fn test_fault_without_detail_gives_diagnostic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/CampaignService/mutate"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"fault": {"message": "Unmarshalling Error"}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let label = Label::with_id("Brand", 3).unwrap();
    let result = service
        .upload(
            &[label.apply_on_campaign_operation(10).unwrap()],
            &UploadOptions::standard("CampaignService"),
        )
        .await
        .unwrap();

    assert_eq!(result.diagnostic.as_deref(), Some(IS_LABEL_DIAGNOSTIC));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service
        .upload(
            &negative_operations(),
            &UploadOptions::standard("AdGroupCriterionService"),
        )
        .await
        .unwrap();

    assert!(result.is_success());
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AdGroupCriterionService/mutate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service
        .upload(
            &negative_operations(),
            &UploadOptions::standard("AdGroupCriterionService"),
        )
        .await;

    match result {
        Err(AdsError::Http { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid token");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/LabelService/get"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service.label_id("Brand").await;

    let err = result.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_accounts_are_paged() {
    let mock_server = MockServer::start().await;

    let first_page: Vec<_> = (0..500)
        .map(|i| json!({"name": format!("Account {}", i), "customerId": 1000 + i}))
        .collect();

    Mock::given(method("POST"))
        .and(path("/ManagedCustomerService/get"))
        .and(body_partial_json(json!({
            "selector": {"paging": {"startIndex": 0, "numberResults": 500}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalNumEntries": 501,
            "entries": first_page
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ManagedCustomerService/get"))
        .and(body_partial_json(json!({
            "selector": {
                "paging": {"startIndex": 500},
                "predicates": [{"field": "CanManageClients", "operator": "EQUALS", "values": ["FALSE"]}]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalNumEntries": 501,
            "entries": [{
                "name": "Last",
                "customerId": "302-203-1203",
                "currencyCode": "EUR",
                "accountLabels": [{"name": "Fashion", "id": 5}]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let accounts = service.accounts(Vec::new(), true).await.unwrap();

    assert_eq!(accounts.len(), 501);
    assert_eq!(accounts[0].id.as_deref(), Some("1000"));
    let last = &accounts[500];
    assert_eq!(last.name, "Last");
    assert_eq!(last.currency.as_deref(), Some("EUR"));
    assert!(last.has_label("Fashion"));
}

#[tokio::test]
async fn test_label_id_lookup_is_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/LabelService/get"))
        .and(body_partial_json(json!({
            "selector": {"predicates": [{"field": "LabelName", "values": ["Brand"]}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalNumEntries": 1,
            "entries": [{"id": 42, "name": "Brand"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    assert_eq!(service.label_id("Brand").await.unwrap(), Some(42));
    assert_eq!(service.label_id("Brand").await.unwrap(), Some(42));
}

#[tokio::test]
async fn test_batch_job_round_trip() {
    let mock_server = MockServer::start().await;
    let upload_url = format!("{}/upload/7", mock_server.uri());
    let download_url = format!("{}/results/7", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/BatchJobService/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "uploadUrl": upload_url
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload/7"))
        .and(body_partial_json(json!({"operations": [{"operator": "ADD"}]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/BatchJobService/status"))
        .and(body_partial_json(json!({"id": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "status": "DONE",
            "downloadUrl": download_url
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"index": 0, "result": {"criterion": {"id": 5}}},
            {"index": 1, "errors": [{"reason": "CRITERION_ALREADY_EXISTS"}]}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let result = service
        .upload(&negative_operations(), &UploadOptions::batch())
        .await
        .unwrap();

    assert_eq!(
        result.errors,
        vec![NormalizedError::new(1, "CRITERION_ALREADY_EXISTS")]
    );
    match result.payload {
        Some(UploadPayload::BatchResults { job_id, results }) => {
            assert_eq!(job_id, 7);
            assert_eq!(results.len(), 2);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_report_download() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reportdownload"))
        .and(header("includeZeroImpressions", "true"))
        .and(body_partial_json(json!({
            "reportType": "KEYWORDS_PERFORMANCE_REPORT",
            "downloadFormat": "CSV",
            "selector": {"fields": ["Criteria", "Clicks"]}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Keyword,Clicks\nred shoes,4\nblue shoes,0\n"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let request = ReportRequest::new("KEYWORDS_PERFORMANCE_REPORT", ["Criteria", "Clicks"])
        .last_days(30);
    let definition = service.report_definition(&request).unwrap();
    let report = service.download_report(&definition, true).await.unwrap();

    assert_eq!(report.columns, vec!["Keyword", "Clicks"]);
    assert_eq!(report.column("Clicks"), Some(vec!["4", "0"]));
}
