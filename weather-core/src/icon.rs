//! Lazily fetched, never evicted cache of condition icons.

use image::{RgbaImage, imageops::FilterType};
use parking_lot::Mutex;
use reqwest::Client;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::debug;

use crate::WeatherError;

pub const ICON_SIZE: u32 = 70;
const ICON_TIMEOUT: Duration = Duration::from_secs(5);

/// A decoded icon, always `ICON_SIZE` x `ICON_SIZE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn decode(bytes: &[u8]) -> Result<Self, WeatherError> {
        let img = image::load_from_memory(bytes).map_err(|e| {
            debug!("icon decode failed: {}", e);
            WeatherError::IconUnavailable
        })?;
        let pixels = img.resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Triangle).to_rgba8();
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA at `(x, y)`; out-of-range coordinates are clamped.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width().saturating_sub(1));
        let y = y.min(self.height().saturating_sub(1));
        self.pixels.get_pixel(x, y).0
    }
}

#[derive(Debug)]
pub struct IconCache {
    http: Client,
    base_url: String,
    icons: Mutex<HashMap<String, Arc<Bitmap>>>,
}

impl IconCache {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(ICON_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            icons: Mutex::new(HashMap::new()),
        })
    }

    pub fn icon_url(&self, code: &str) -> String {
        format!("{}/{}@2x.png", self.base_url, code)
    }

    /// Cached icon for `code`, fetching it on a miss. Failures yield `None`.
    pub async fn get_icon(&self, code: &str) -> Option<Arc<Bitmap>> {
        if let Some(hit) = self.icons.lock().get(code) {
            debug!(code, "icon cache hit");
            return Some(Arc::clone(hit));
        }

        match self.fetch(code).await {
            Ok(bitmap) => {
                let bitmap = Arc::new(bitmap);
                // Overlapping misses produce equivalent bitmaps; last insert wins.
                self.icons.lock().insert(code.to_string(), Arc::clone(&bitmap));
                Some(bitmap)
            }
            Err(e) => {
                debug!(code, "icon unavailable: {}", e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.icons.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.lock().is_empty()
    }

    async fn fetch(&self, code: &str) -> Result<Bitmap, WeatherError> {
        let res = self
            .http
            .get(self.icon_url(code))
            .send()
            .await
            .map_err(|_| WeatherError::IconUnavailable)?;

        if !res.status().is_success() {
            return Err(WeatherError::IconUnavailable);
        }

        let bytes = res.bytes().await.map_err(|_| WeatherError::IconUnavailable)?;
        Bitmap::decode(&bytes)
    }
}
