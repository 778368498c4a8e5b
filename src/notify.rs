//! SMS notification through a Textbelt-compatible gateway
//!
//! Delivery is best effort: every failure ends up in the returned
//! [`DeliveryResult`] and never aborts the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::NotifierSettings;
use crate::models::SummerDayMatch;
use crate::{Result, SummerFinderError};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_remaining: Option<i64>,
}

impl DeliveryResult {
    fn failed(error: &SummerFinderError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl Notifier {
    pub fn new(settings: &NotifierSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .map_err(|e| {
                SummerFinderError::notification(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Send `message` to `phone`
    #[instrument(skip(self, message))]
    pub async fn notify(&self, phone: &str, message: &str) -> DeliveryResult {
        match self.send(phone, message).await {
            Ok(result) => {
                if result.success {
                    info!("SMS sent (quota remaining: {:?})", result.quota_remaining);
                } else {
                    warn!(
                        "SMS gateway rejected message: {}",
                        result.error.as_deref().unwrap_or("no reason given")
                    );
                }
                result
            }
            Err(e) => {
                warn!("{e}");
                DeliveryResult::failed(&e)
            }
        }
    }

    async fn send(&self, phone: &str, message: &str) -> Result<DeliveryResult> {
        let form = [
            ("phone", phone),
            ("message", message),
            ("key", self.api_key.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| SummerFinderError::notification(format!("SMS request failed: {e}")))?;

        response.json::<DeliveryResult>().await.map_err(|e| {
            SummerFinderError::notification(format!("Invalid SMS gateway response: {e}"))
        })
    }
}

/// Text sent for the best result of a search: the match as compact JSON
pub fn best_result_message(summer_day: &SummerDayMatch) -> Result<String> {
    Ok(serde_json::to_string(summer_day)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(server: &MockServer) -> Notifier {
        Notifier::new(&NotifierSettings {
            endpoint: format!("{}/text", server.uri()),
            api_key: "textbelt".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_notify_posts_form_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text"))
            .and(body_string_contains("phone=5555555555"))
            .and(body_string_contains("message=hello+there"))
            .and(body_string_contains("key=textbelt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "textId": "12345",
                "quotaRemaining": 40
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = notifier(&server).notify("5555555555", "hello there").await;

        assert!(result.success);
        assert_eq!(result.text_id.as_deref(), Some("12345"));
        assert_eq!(result.quota_remaining, Some(40));
    }

    #[tokio::test]
    async fn test_gateway_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "Out of quota"
            })))
            .mount(&server)
            .await;

        let result = notifier(&server).notify("5555555555", "hi").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Out of quota"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_never_raises() {
        let settings = NotifierSettings {
            endpoint: "http://127.0.0.1:1/text".to_string(),
            api_key: "textbelt".to_string(),
        };
        let result = Notifier::new(&settings)
            .unwrap()
            .notify("5555555555", "hi")
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("SMS request failed"));
    }

    #[test]
    fn test_best_result_message() {
        let summer_day = SummerDayMatch {
            name: "Lake Anna".to_string(),
            dist: 60.2,
            date: "2024-07-06".to_string(),
            day: "Saturday".to_string(),
            temp: 84.5,
            waterfront: "lake".to_string(),
        };
        let message = best_result_message(&summer_day).unwrap();
        let parsed: SummerDayMatch = serde_json::from_str(&message).unwrap();
        assert_eq!(parsed, summer_day);
        assert!(!message.contains('\n'));
    }
}
