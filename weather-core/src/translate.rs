//! Best-effort machine translation of weather descriptions.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{instrument, warn};

use crate::{WeatherError, model::Language};

const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate English `text` into `target`. Only called for non-English targets.
    async fn translate_remote(&self, text: &str, target: Language) -> Result<String, WeatherError>;

    /// Identity for English, otherwise delegates to the provider.
    async fn translate(&self, text: &str, target: Language) -> Result<String, WeatherError> {
        if target == Language::English {
            return Ok(text.to_string());
        }
        self.translate_remote(text, target).await
    }
}

/// Translates, falling back to `text` on failure. The returned error, if any,
/// is meant to be shown once as a non-blocking notice.
pub async fn translate_best_effort(
    translator: &dyn Translator,
    text: &str,
    target: Language,
) -> (String, Option<WeatherError>) {
    match translator.translate(text, target).await {
        Ok(translated) if !translated.trim().is_empty() => (translated, None),
        Ok(_) => (
            text.to_string(),
            Some(WeatherError::TranslationFailed("empty translation".to_string())),
        ),
        Err(e) => {
            warn!(target = target.code(), "translation failed: {}", e);
            let err = match e {
                WeatherError::TranslationFailed(_) => e,
                other => WeatherError::TranslationFailed(other.to_string()),
            };
            (text.to_string(), Some(err))
        }
    }
}

/// MyMemory translation API client.
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MmResponseData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct MmResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MmResponseData>,
    /// Number on success, sometimes a string on errors.
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<String>,
}

impl MmResponse {
    fn is_ok(&self) -> bool {
        match &self.response_status {
            serde_json::Value::Number(n) => n.as_u64() == Some(200),
            serde_json::Value::String(s) => s == "200",
            _ => false,
        }
    }
}

impl MyMemoryTranslator {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(TRANSLATE_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    #[instrument(skip(self), level = "debug")]
    async fn translate_remote(&self, text: &str, target: Language) -> Result<String, WeatherError> {
        let langpair = format!("en|{}", target.code());

        let res = self
            .http
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::TranslationFailed(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::TranslationFailed(format!("status {status}")));
        }

        let body: MmResponse = res
            .json()
            .await
            .map_err(|e| WeatherError::TranslationFailed(e.to_string()))?;

        if !body.is_ok() {
            let details = body.response_details.unwrap_or_else(|| "unknown error".to_string());
            return Err(WeatherError::TranslationFailed(details));
        }

        body.response_data
            .map(|d| d.translated_text)
            .ok_or_else(|| WeatherError::TranslationFailed("missing translation".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Default)]
    struct FailingTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate_remote(&self, _text: &str, _target: Language) -> Result<String, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(WeatherError::TranslationFailed("offline".into()))
        }
    }

    #[tokio::test]
    async fn english_is_identity_without_network() {
        let translator = FailingTranslator::default();
        let (text, notice) = translate_best_effort(&translator, "Clear sky", Language::English).await;
        assert_eq!(text, "Clear sky");
        assert!(notice.is_none());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_returns_original_with_one_notice() {
        let translator = FailingTranslator::default();
        let (text, notice) = translate_best_effort(&translator, "Clear sky", Language::Hindi).await;
        assert_eq!(text, "Clear sky");
        assert!(matches!(notice, Some(WeatherError::TranslationFailed(_))));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mymemory_translates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("q", "Clear sky"))
            .and(query_param("langpair", "en|hi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": {"translatedText": "साफ आसमान", "match": 1},
                "responseStatus": 200
            })))
            .mount(&mock_server)
            .await;

        let translator = MyMemoryTranslator::new(&mock_server.uri()).unwrap();
        let out = translator.translate("Clear sky", Language::Hindi).await.unwrap();
        assert_eq!(out, "साफ आसमान");
    }

    #[tokio::test]
    async fn mymemory_error_status_is_translation_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseData": {"translatedText": ""},
                "responseStatus": "403",
                "responseDetails": "INVALID LANGUAGE PAIR"
            })))
            .mount(&mock_server)
            .await;

        let translator = MyMemoryTranslator::new(&mock_server.uri()).unwrap();
        let err = translator.translate("Clear sky", Language::Marathi).await.unwrap_err();
        assert!(err.to_string().contains("INVALID LANGUAGE PAIR"));
    }
}
