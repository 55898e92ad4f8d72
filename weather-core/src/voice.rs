//! Voice search: microphone capture plus a speech-to-text provider.
//!
//! Capture shells out to ALSA's `arecord`, which writes raw 16-bit mono PCM
//! to stdout. A clip that never rises above the silence threshold is treated
//! as "nobody spoke" and reported as [`WeatherError::VoiceTimeout`] without
//! calling the recognizer.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, process::Stdio, time::Duration};
use tokio::{io::AsyncReadExt, process::Command};
use tracing::{debug, info, instrument};

use crate::WeatherError;

pub const SAMPLE_RATE_HZ: u32 = 16_000;
pub const LISTEN_WINDOW: Duration = Duration::from_secs(5);
const RECOGNIZE_TIMEOUT: Duration = Duration::from_secs(10);
/// RMS below this (about -36 dBFS) counts as silence.
const SILENCE_RMS: f64 = 500.0;

/// Captured mono 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Clip {
    pub fn from_le_bytes(bytes: &[u8], sample_rate: u32) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        Self { samples, sample_rate }
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| f64::from(s).powi(2)).sum();
        (sum / self.samples.len() as f64).sqrt()
    }

    pub fn is_silent(&self) -> bool {
        self.rms() < SILENCE_RMS
    }
}

#[async_trait]
pub trait AudioSource: Send + Sync + Debug {
    async fn capture(&self, window: Duration) -> Result<Clip, WeatherError>;
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    async fn recognize(&self, clip: &Clip) -> Result<String, WeatherError>;
}

/// Records from the default ALSA capture device.
#[derive(Debug, Clone)]
pub struct ArecordSource {
    program: String,
}

impl Default for ArecordSource {
    fn default() -> Self {
        Self { program: "arecord".to_string() }
    }
}

#[async_trait]
impl AudioSource for ArecordSource {
    #[instrument(skip(self), level = "debug")]
    async fn capture(&self, window: Duration) -> Result<Clip, WeatherError> {
        let secs = window.as_secs().max(1).to_string();
        let rate = SAMPLE_RATE_HZ.to_string();
        let mut child = Command::new(&self.program)
            .args(["-q", "-f", "S16_LE", "-c", "1", "-t", "raw", "-r", &rate, "-d", &secs])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WeatherError::VoiceService(format!("failed to start {}: {e}", self.program)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| WeatherError::VoiceService("recorder produced no output".to_string()))?;

        let mut bytes = Vec::new();
        // arecord stops on its own after `-d`; the extra second covers startup.
        let read = tokio::time::timeout(window + Duration::from_secs(1), stdout.read_to_end(&mut bytes)).await;
        let overran = match read {
            Err(_) => {
                debug!("recorder overran its window, killing it");
                let _ = child.kill().await;
                true
            }
            Ok(Err(e)) => {
                return Err(WeatherError::VoiceService(format!("failed to read recorder output: {e}")));
            }
            Ok(Ok(_)) => false,
        };

        let status = child
            .wait()
            .await
            .map_err(|e| WeatherError::VoiceService(format!("failed to wait for {}: {e}", self.program)))?;
        if !overran {
            // A killed recorder exits non-zero; only a clean finish is checked.
            if !status.success() {
                return Err(WeatherError::VoiceService(format!("{} exited with {status}", self.program)));
            }
            if bytes.is_empty() {
                return Err(WeatherError::VoiceService(format!("{} produced no audio", self.program)));
            }
        }

        let clip = Clip::from_le_bytes(&bytes, SAMPLE_RATE_HZ);
        debug!(samples = clip.samples.len(), rms = clip.rms(), "captured clip");
        Ok(clip)
    }
}

/// Google Cloud Speech-to-Text `speech:recognize` client.
#[derive(Debug, Clone)]
pub struct GoogleSpeechRecognizer {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GsAlternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct GsResult {
    #[serde(default)]
    alternatives: Vec<GsAlternative>,
}

#[derive(Debug, Deserialize)]
struct GsResponse {
    #[serde(default)]
    results: Vec<GsResult>,
}

impl GoogleSpeechRecognizer {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(RECOGNIZE_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    #[instrument(skip_all, level = "info")]
    async fn recognize(&self, clip: &Clip) -> Result<String, WeatherError> {
        let body = serde_json::json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": clip.sample_rate,
                "languageCode": "en-US",
            },
            "audio": { "content": STANDARD.encode(clip.to_le_bytes()) },
        });

        let res = self
            .http
            .post(format!("{}/v1/speech:recognize", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| WeatherError::VoiceService(e.without_url().to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::VoiceService(format!("status {status}")));
        }

        let parsed: GsResponse = res
            .json()
            .await
            .map_err(|e| WeatherError::VoiceService(e.without_url().to_string()))?;

        let transcript = parsed
            .results
            .into_iter()
            .flat_map(|r| r.alternatives)
            .map(|a| a.transcript.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or(WeatherError::VoiceUnrecognized)?;

        info!(%transcript, "speech recognized");
        Ok(transcript)
    }
}

/// Used when no speech API key is configured.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredRecognizer;

#[async_trait]
impl SpeechRecognizer for UnconfiguredRecognizer {
    async fn recognize(&self, _clip: &Clip) -> Result<String, WeatherError> {
        Err(WeatherError::VoiceService("no speech API key configured".to_string()))
    }
}

/// Rejects silent clips before they reach the recognizer.
pub fn ensure_speech(clip: &Clip) -> Result<(), WeatherError> {
    if clip.is_silent() {
        return Err(WeatherError::VoiceTimeout);
    }
    Ok(())
}
