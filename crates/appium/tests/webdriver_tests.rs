//! WebDriver client tests against a mock Appium server.

use appium_flow::{cafe, run_flow, Driver, DriverError, Selector, WebDriver};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

// =============================================================================
// Helpers
// =============================================================================

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {"sessionId": "s1", "capabilities": {"platformName": "Android"}}
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn session(server: &MockServer) -> WebDriver {
    WebDriver::new_session(server.uri(), cafe::capabilities("10.0.0.9:5001", cafe::APP_PACKAGE, None))
        .await
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_new_session_sends_capabilities() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_json(json!({
            "capabilities": {
                "alwaysMatch": {
                    "platformName": "Android",
                    "appium:automationName": "UiAutomator2",
                    "appium:udid": "10.0.0.9:5001",
                    "appium:appPackage": "com.corellium.cafe"
                },
                "firstMatch": [{}]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": {"sessionId": "s1", "capabilities": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let driver = session(&server).await;
    assert_eq!(driver.session_id(), "s1");
}

#[tokio::test]
async fn test_find_click_and_type() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .and(body_json(json!({"using": "accessibility id", "value": "Cart"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": {ELEMENT_KEY: "e-cart"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/e-cart/click"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s1/element/e-cart/value"))
        .and(body_json(json!({"text": "Tester"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(1)
        .mount(&server)
        .await;

    let driver = session(&server).await;
    let element = driver
        .find_element(&Selector::accessibility_id("Cart"))
        .await
        .unwrap();
    driver.click(&element).await.unwrap();
    driver.add_value(&element, "Tester").await.unwrap();
}

#[tokio::test]
async fn test_no_such_element_is_webdriver_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": {
                "error": "no such element",
                "message": "An element could not be located",
                "stacktrace": ""
            }
        })))
        .mount(&server)
        .await;

    let driver = session(&server).await;
    let err = driver
        .find_element(&Selector::id("com.corellium.cafe:id/missing"))
        .await
        .unwrap_err();

    match err {
        DriverError::WebDriver { status, error, .. } => {
            assert_eq!(status, 404);
            assert_eq!(error, "no such element");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cafe_flow_replays_every_step() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/session/s1/element"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": {ELEMENT_KEY: "e1"}})))
        .expect(16)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/session/s1/element/e1/click$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(9)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/session/s1/element/e1/value$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(7)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
        .expect(1)
        .mount(&server)
        .await;

    let driver = session(&server).await;
    run_flow(&driver, &cafe::order_steps()).await.unwrap();
    driver.delete_session().await.unwrap();
}
