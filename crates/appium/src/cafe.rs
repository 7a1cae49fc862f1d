//! Cafe ordering flow for the Corellium Cafe demo app.
//!
//! Places an order as a guest: one cup of coffee, customer details, card
//! details, review, submit, and dismiss the confirmation dialog.

use serde_json::{json, Value};

use crate::flow::Step;
use crate::selector::Selector;

/// Package name of the cafe app.
pub const APP_PACKAGE: &str = "com.corellium.cafe";

fn app_id(name: &str) -> Selector {
    Selector::id(format!("{APP_PACKAGE}:id/{name}"))
}

fn tap(selector: Selector) -> Step {
    Step::Click(selector)
}

fn fill(name: &str, text: &str) -> Step {
    Step::AddValue(app_id(name), text.to_string())
}

/// Appium capabilities for an Android device reachable at `udid`
/// (typically `<wifi ip>:5001` on Corellium).
#[must_use]
pub fn capabilities(udid: &str, app_package: &str, app_activity: Option<&str>) -> Value {
    let mut caps = json!({
        "platformName": "Android",
        "appium:automationName": "UiAutomator2",
        "appium:udid": udid,
        "appium:appPackage": app_package,
    });
    if let Some(activity) = app_activity {
        caps["appium:appActivity"] = Value::String(activity.to_string());
    }
    caps
}

/// Steps of the guest ordering flow, in order.
#[must_use]
pub fn order_steps() -> Vec<Step> {
    vec![
        tap(app_id("guestButton")),
        tap(Selector::text("Cup of Coffee")),
        tap(app_id("fbAdd")),
        tap(Selector::accessibility_id("Cart")),
        tap(app_id("tvCheckout")),
        fill("firstnameEditText", "Tester"),
        fill("lastnameEditText", "Tester"),
        fill("phoneEditText", "1234567891"),
        tap(app_id("submitButton")),
        fill("etCCNumber", "123456789101112"),
        fill("etExpiration", "1223"),
        fill("etCVV", "123"),
        fill("etPostalCode", "12345"),
        tap(app_id("bvReviewOrder")),
        tap(app_id("bvSubmitOrder")),
        tap(Selector::id("android:id/button1")),
    ]
}
