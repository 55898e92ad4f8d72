//! Search/display state machine.
//!
//! The controller owns [`AppState`] and is driven from a single task (the UI
//! loop). Background work is spawned onto tokio and reports back only through
//! the [`AppEvent`] channel; nothing outside that loop mutates state.
//!
//! Per search: `Idle -> Fetching -> {Displaying, Failed}`. Every search gets a
//! sequence number and only the most recently issued one may settle the
//! state, so a slow earlier request can't overwrite a newer result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::VecDeque, fmt::Debug, sync::Arc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::{
    Config, WeatherError,
    animation::AnimationState,
    error::Severity,
    history::{HistoryList, title_case},
    icon::{Bitmap, IconCache},
    model::{Language, Rgb, Units, WeatherReading},
    provider::{WeatherProvider, provider_from_config},
    strings::{self, StringKey},
    style::{DEFAULT_STYLE, style_for},
    timezone::{TimeInfo, TimeZoneView, offers_alternate},
    translate::{MyMemoryTranslator, Translator, translate_best_effort},
    voice::{
        AudioSource, ArecordSource, GoogleSpeechRecognizer, LISTEN_WINDOW, SpeechRecognizer,
        UnconfiguredRecognizer, ensure_speech,
    },
};

#[async_trait]
pub trait IconSource: Send + Sync + Debug {
    async fn get_icon(&self, code: &str) -> Option<Arc<Bitmap>>;
}

#[async_trait]
impl IconSource for IconCache {
    async fn get_icon(&self, code: &str) -> Option<Arc<Bitmap>> {
        IconCache::get_icon(self, code).await
    }
}

/// External collaborators, shared with background tasks.
#[derive(Debug, Clone)]
pub struct Services {
    pub weather: Arc<dyn WeatherProvider>,
    pub icons: Arc<dyn IconSource>,
    pub translator: Arc<dyn Translator>,
    pub audio: Arc<dyn AudioSource>,
    pub speech: Arc<dyn SpeechRecognizer>,
}

impl Services {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let speech: Arc<dyn SpeechRecognizer> = match config.speech_api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                Arc::new(GoogleSpeechRecognizer::new(key.to_string(), &config.endpoints.speech)?)
            }
            _ => Arc::new(UnconfiguredRecognizer),
        };

        Ok(Self {
            weather: provider_from_config(config)?,
            icons: Arc::new(IconCache::new(&config.endpoints.icons)?),
            translator: Arc::new(MyMemoryTranslator::new(&config.endpoints.translation)?),
            audio: Arc::new(ArecordSource::default()),
            speech,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStatus {
    #[default]
    Idle,
    Listening,
    Recognizing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl From<&WeatherError> for Notice {
    fn from(err: &WeatherError) -> Self {
        Self { severity: err.severity(), message: err.user_message() }
    }
}

/// Result of a completed fetch, merged on the UI loop.
#[derive(Debug)]
pub struct FetchedWeather {
    pub reading: WeatherReading,
    pub icon: Option<Arc<Bitmap>>,
    pub description: String,
    pub translation_error: Option<WeatherError>,
    /// Language `description` was translated into.
    pub language: Language,
}

#[derive(Debug)]
pub enum AppEvent {
    FetchCompleted { seq: u64, outcome: Result<FetchedWeather, WeatherError> },
    VoiceRecognizing,
    VoiceCompleted(Result<String, WeatherError>),
}

/// What the weather card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub glyph: &'static str,
    pub icon: Option<Arc<Bitmap>>,
    pub humidity_pct: u8,
    pub wind: String,
    pub offers_alternate: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub phase: Phase,
    pub units: Units,
    pub language: Language,
    pub reading: Option<WeatherReading>,
    pub display: Option<DisplayState>,
    pub history: HistoryList,
    pub animation: AnimationState,
    pub time_view: TimeZoneView,
    pub voice: VoiceStatus,
    notices: VecDeque<Notice>,
    recognized_query: Option<String>,
}

impl AppState {
    pub fn new(units: Units, language: Language) -> Self {
        Self {
            phase: Phase::Idle,
            units,
            language,
            reading: None,
            display: None,
            history: HistoryList::new(),
            animation: AnimationState::new(DEFAULT_STYLE.color),
            time_view: TimeZoneView::default(),
            voice: VoiceStatus::Idle,
            notices: VecDeque::new(),
            recognized_query: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Fetching
    }

    /// Search, unit and history controls are disabled while fetching.
    pub fn controls_enabled(&self) -> bool {
        !self.is_loading()
    }

    pub fn background(&self) -> Rgb {
        self.animation.current()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

pub struct AppController {
    state: AppState,
    services: Services,
    events: UnboundedSender<AppEvent>,
    latest_seq: u64,
}

impl AppController {
    pub fn new(services: Services, events: UnboundedSender<AppEvent>, units: Units, language: Language) -> Self {
        Self { state: AppState::new(units, language), services, events, latest_seq: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn text(&self, key: StringKey) -> &'static str {
        strings::text(self.state.language, key)
    }

    /// Starts a search. Empty input raises an informational notice and no fetch.
    pub fn submit(&mut self, query: &str) -> Result<u64, WeatherError> {
        let city = query.trim();
        if city.is_empty() {
            let err = WeatherError::InvalidInput;
            self.state.notify(Notice::from(&err));
            return Err(err);
        }

        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.state.phase = Phase::Fetching;
        info!(seq, city, units = self.state.units.as_query(), "search started");

        let services = self.services.clone();
        let events = self.events.clone();
        let city = city.to_string();
        let units = self.state.units;
        let language = self.state.language;
        tokio::spawn(async move {
            let outcome = fetch_weather(&services, &city, units, language).await;
            // The receiver is gone only when the app is shutting down.
            let _ = events.send(AppEvent::FetchCompleted { seq, outcome });
        });

        Ok(seq)
    }

    pub fn select_history(&mut self, index: usize) -> Result<u64, WeatherError> {
        let city = self.state.history.get(index).ok_or(WeatherError::InvalidInput)?.to_string();
        self.submit(&city)
    }

    /// Flips units and re-fetches the current city, if any.
    pub fn toggle_units(&mut self) -> Option<u64> {
        if !self.state.controls_enabled() {
            return None;
        }
        self.state.units = self.state.units.toggled();
        self.refetch_current()
    }

    /// Switches UI language; the current city is re-fetched so its
    /// description is translated again.
    pub fn cycle_language(&mut self) -> Option<u64> {
        self.state.language = self.state.language.next();
        info!(language = self.state.language.code(), "language changed");
        if !self.state.controls_enabled() {
            return None;
        }
        self.refetch_current()
    }

    /// Returns false when the current city doesn't offer the alternate zone.
    pub fn toggle_alternate_time(&mut self) -> bool {
        let offered = self.state.display.as_ref().is_some_and(|d| d.offers_alternate);
        if offered {
            self.state.time_view.toggle();
        }
        offered
    }

    /// Time fields for the last reading, in whichever projection is active.
    pub fn time_info(&self, now: DateTime<Utc>) -> Option<TimeInfo> {
        self.state
            .reading
            .as_ref()
            .map(|r| self.state.time_view.project(r.utc_offset_secs, &r.country_code, now))
    }

    /// Starts listening in the background. Returns false if already listening.
    pub fn start_voice(&mut self) -> bool {
        if self.state.voice != VoiceStatus::Idle {
            return false;
        }
        self.state.voice = VoiceStatus::Listening;

        let services = self.services.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = listen(&services, &events).await;
            let _ = events.send(AppEvent::VoiceCompleted(result));
        });
        true
    }

    /// Phrase recognized by the last voice search, for the search box.
    pub fn take_recognized_query(&mut self) -> Option<String> {
        self.state.recognized_query.take()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.notices.drain(..).collect()
    }

    pub fn tick_color(&mut self) {
        self.state.animation.tick_color();
    }

    pub fn tick_phase(&mut self) {
        self.state.animation.tick_phase();
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::FetchCompleted { seq, outcome } => self.on_fetch_completed(seq, outcome),
            AppEvent::VoiceRecognizing => {
                if self.state.voice == VoiceStatus::Listening {
                    self.state.voice = VoiceStatus::Recognizing;
                }
            }
            AppEvent::VoiceCompleted(result) => {
                self.state.voice = VoiceStatus::Idle;
                match result {
                    Ok(phrase) => {
                        self.state.recognized_query = Some(phrase.clone());
                        let _ = self.submit(&phrase);
                    }
                    Err(e) => {
                        warn!("voice search failed: {}", e);
                        self.state.notify(Notice::from(&e));
                    }
                }
            }
        }
    }

    fn refetch_current(&mut self) -> Option<u64> {
        let city = self.state.reading.as_ref()?.city_query.clone();
        self.submit(&city).ok()
    }

    fn on_fetch_completed(&mut self, seq: u64, outcome: Result<FetchedWeather, WeatherError>) {
        if seq != self.latest_seq {
            warn!(seq, latest = self.latest_seq, "dropping stale weather result");
            return;
        }

        match outcome {
            Ok(fetched) => self.apply_weather(fetched),
            Err(e) => {
                info!(seq, "search failed: {}", e);
                self.state.phase = Phase::Failed;
                self.state.notify(Notice::from(&e));
            }
        }
    }

    fn apply_weather(&mut self, fetched: FetchedWeather) {
        let FetchedWeather { reading, icon, description, translation_error, language } = fetched;
        let style = style_for(&reading.condition);
        let offers = offers_alternate(&reading.country_code);
        if !offers {
            self.state.time_view.reset();
        }

        self.state.display = Some(DisplayState {
            city: title_case(&reading.city_query),
            temperature: reading.temperature_label(),
            description,
            glyph: style.glyph,
            icon,
            humidity_pct: reading.humidity_pct,
            wind: reading.wind_label(),
            offers_alternate: offers,
        });
        self.state.animation.set_target(style.color);
        self.state.history.record(&reading.city_query);
        debug!(target_color = %style.color.to_hex(), "display updated");
        self.state.reading = Some(reading);
        self.state.phase = Phase::Displaying;

        // The language changed while this fetch was in flight.
        if language != self.state.language {
            debug!(fetched = language.code(), current = self.state.language.code(), "re-translating");
            self.refetch_current();
            return;
        }
        if let Some(err) = translation_error {
            self.state.notify(Notice::from(&err));
        }
    }
}

async fn fetch_weather(
    services: &Services,
    city: &str,
    units: Units,
    language: Language,
) -> Result<FetchedWeather, WeatherError> {
    let reading = services.weather.fetch(city, units).await?;
    let icon = services.icons.get_icon(&reading.icon_code).await;
    let (description, translation_error) =
        translate_best_effort(services.translator.as_ref(), &reading.description_label(), language).await;

    Ok(FetchedWeather { reading, icon, description, translation_error, language })
}

async fn listen(services: &Services, events: &UnboundedSender<AppEvent>) -> Result<String, WeatherError> {
    let clip = services.audio.capture(LISTEN_WINDOW).await?;
    ensure_speech(&clip)?;
    let _ = events.send(AppEvent::VoiceRecognizing);
    services.speech.recognize(&clip).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{Clip, SAMPLE_RATE_HZ};
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    type FetchFn = dyn Fn(&str, Units) -> Result<WeatherReading, WeatherError> + Send + Sync;

    struct FakeWeather {
        calls: AtomicUsize,
        respond: Box<FetchFn>,
    }

    impl fmt::Debug for FakeWeather {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FakeWeather").field("calls", &self.calls).finish()
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn fetch(&self, city: &str, units: Units) -> Result<WeatherReading, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(city, units)
        }
    }

    #[derive(Debug)]
    struct NoIcons;

    #[async_trait]
    impl IconSource for NoIcons {
        async fn get_icon(&self, _code: &str) -> Option<Arc<Bitmap>> {
            None
        }
    }

    #[derive(Debug)]
    struct FakeTranslator {
        fail: bool,
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate_remote(&self, text: &str, target: Language) -> Result<String, WeatherError> {
            if self.fail {
                return Err(WeatherError::TranslationFailed("offline".into()));
            }
            Ok(format!("[{}] {}", target.code(), text))
        }
    }

    #[derive(Debug)]
    struct FakeMic {
        loud: bool,
    }

    #[async_trait]
    impl AudioSource for FakeMic {
        async fn capture(&self, _window: Duration) -> Result<Clip, WeatherError> {
            let level = if self.loud { 9000 } else { 0 };
            Ok(Clip { samples: vec![level, -level, level, -level], sample_rate: SAMPLE_RATE_HZ })
        }
    }

    #[derive(Debug)]
    struct FakeSpeech(&'static str);

    #[async_trait]
    impl SpeechRecognizer for FakeSpeech {
        async fn recognize(&self, _clip: &Clip) -> Result<String, WeatherError> {
            Ok(self.0.to_string())
        }
    }

    fn reading_for(city: &str, units: Units) -> WeatherReading {
        let (condition, country, offset) = match city.to_lowercase().as_str() {
            "mumbai" => ("Rain", "IN", 19800),
            _ => ("Clear", "GB", 0),
        };
        WeatherReading {
            city_query: city.to_string(),
            temperature: 15.2,
            units,
            description: "clear sky".into(),
            condition: condition.into(),
            icon_code: "01d".into(),
            humidity_pct: 60,
            wind_speed: 3.1,
            utc_offset_secs: offset,
            country_code: country.into(),
        }
    }

    struct Harness {
        controller: AppController,
        rx: UnboundedReceiver<AppEvent>,
        weather: Arc<FakeWeather>,
    }

    impl Harness {
        fn new(respond: Box<FetchFn>, translate_fails: bool, language: Language) -> Self {
            let weather = Arc::new(FakeWeather { calls: AtomicUsize::new(0), respond });
            let services = Services {
                weather: weather.clone(),
                icons: Arc::new(NoIcons),
                translator: Arc::new(FakeTranslator { fail: translate_fails }),
                audio: Arc::new(FakeMic { loud: true }),
                speech: Arc::new(FakeSpeech("paris")),
            };
            let (tx, rx) = mpsc::unbounded_channel();
            let controller = AppController::new(services, tx, Units::Metric, language);
            Self { controller, rx, weather }
        }

        fn ok() -> Self {
            Self::new(Box::new(|city: &str, units: Units| Ok(reading_for(city, units))), false, Language::English)
        }

        async fn settle(&mut self) {
            let event = self.rx.recv().await.expect("event");
            self.controller.handle(event);
        }
    }

    #[tokio::test]
    async fn blank_query_never_fetches() {
        let mut h = Harness::ok();
        for query in ["", "   ", "\t\n"] {
            assert!(matches!(h.controller.submit(query), Err(WeatherError::InvalidInput)));
        }
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.controller.state().phase, Phase::Idle);

        let notices = h.controller.take_notices();
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.severity == Severity::Info));
    }

    #[tokio::test]
    async fn london_end_to_end() {
        let mut h = Harness::ok();
        h.controller.submit("  london ").unwrap();
        assert!(h.controller.state().is_loading());
        assert!(!h.controller.state().controls_enabled());

        h.settle().await;

        let state = h.controller.state();
        assert_eq!(state.phase, Phase::Displaying);
        assert!(state.controls_enabled());
        let display = state.display.as_ref().expect("display");
        assert_eq!(display.temperature, "15.2°C");
        assert_eq!(display.description, "Clear sky");
        assert_eq!(display.glyph, "☀️");
        assert_eq!(display.city, "London");
        assert!(display.offers_alternate);
        assert_eq!(state.animation.target().to_hex(), "#ffe066");
        assert_eq!(state.history.get(0), Some("London"));
        assert!(h.controller.take_notices().is_empty());
    }

    #[tokio::test]
    async fn failure_keeps_previous_display_and_capitalizes() {
        let mut h = Harness::new(
            Box::new(|city: &str, units: Units| {
                if city == "Atlantis" {
                    Err(WeatherError::provider("city not found"))
                } else {
                    Ok(reading_for(city, units))
                }
            }),
            false,
            Language::English,
        );

        h.controller.submit("London").unwrap();
        h.settle().await;
        h.controller.submit("Atlantis").unwrap();
        h.settle().await;

        let state = h.controller.state();
        assert_eq!(state.phase, Phase::Failed);
        assert!(state.controls_enabled());
        assert_eq!(state.display.as_ref().map(|d| d.city.as_str()), Some("London"));
        assert_eq!(state.history.len(), 1);

        let notices = h.controller.take_notices();
        assert_eq!(notices, vec![Notice { severity: Severity::Error, message: "City not found".into() }]);
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let mut h = Harness::ok();
        let first = h.controller.submit("London").unwrap();
        let second = h.controller.submit("Mumbai").unwrap();
        assert!(second > first);

        let mut events = vec![h.rx.recv().await.unwrap(), h.rx.recv().await.unwrap()];
        // Deliver the newer result first, then the older one.
        events.sort_by_key(|e| match e {
            AppEvent::FetchCompleted { seq, .. } => std::cmp::Reverse(*seq),
            _ => std::cmp::Reverse(0),
        });
        for event in events {
            h.controller.handle(event);
        }

        let state = h.controller.state();
        assert_eq!(state.display.as_ref().unwrap().city, "Mumbai");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.animation.target().to_hex(), "#5dade2");
    }

    #[tokio::test]
    async fn stale_result_does_not_settle_pending_search() {
        let mut h = Harness::ok();
        let first = h.controller.submit("London").unwrap();
        h.controller.submit("Mumbai").unwrap();

        h.controller.handle(AppEvent::FetchCompleted {
            seq: first,
            outcome: Ok(FetchedWeather {
                reading: reading_for("London", Units::Metric),
                icon: None,
                description: "Clear sky".into(),
                translation_error: None,
                language: Language::English,
            }),
        });
        assert!(h.controller.state().is_loading());
        assert!(h.controller.state().display.is_none());
    }

    #[tokio::test]
    async fn translation_failure_shows_untranslated_text_and_one_notice() {
        let mut h = Harness::new(
            Box::new(|city: &str, units: Units| Ok(reading_for(city, units))),
            true,
            Language::Hindi,
        );
        h.controller.submit("London").unwrap();
        h.settle().await;

        assert_eq!(h.controller.state().display.as_ref().unwrap().description, "Clear sky");
        let notices = h.controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn translated_description_is_displayed() {
        let mut h = Harness::new(
            Box::new(|city: &str, units: Units| Ok(reading_for(city, units))),
            false,
            Language::Marathi,
        );
        h.controller.submit("London").unwrap();
        h.settle().await;
        assert_eq!(h.controller.state().display.as_ref().unwrap().description, "[mr] Clear sky");
    }

    #[tokio::test]
    async fn language_change_during_fetch_retranslates() {
        let mut h = Harness::ok();
        h.controller.submit("London").unwrap();
        assert_eq!(h.controller.cycle_language(), None);
        assert_eq!(h.controller.state().language, Language::Hindi);

        h.settle().await;
        assert!(h.controller.state().is_loading());
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 1);

        h.settle().await;
        let state = h.controller.state();
        assert_eq!(state.phase, Phase::Displaying);
        assert_eq!(state.display.as_ref().unwrap().description, "[hi] Clear sky");
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn alternate_time_toggle_only_outside_reference_country() {
        let mut h = Harness::ok();
        h.controller.submit("London").unwrap();
        h.settle().await;
        assert!(h.controller.toggle_alternate_time());
        assert!(h.controller.state().time_view.showing_alternate());

        let fetches = h.weather.calls.load(Ordering::SeqCst);
        let now = Utc::now();
        let ist = crate::timezone::alternate_time(now);
        assert_eq!(h.controller.time_info(now), Some(ist));
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), fetches);

        h.controller.submit("Mumbai").unwrap();
        h.settle().await;
        assert!(!h.controller.state().time_view.showing_alternate());
        assert!(!h.controller.toggle_alternate_time());
    }

    #[tokio::test]
    async fn unit_toggle_refetches_current_city() {
        let mut h = Harness::ok();
        assert_eq!(h.controller.toggle_units(), None);
        assert_eq!(h.controller.state().units, Units::Imperial);

        h.controller.submit("London").unwrap();
        h.settle().await;
        assert_eq!(h.controller.state().display.as_ref().unwrap().temperature, "15.2°F");

        assert!(h.controller.toggle_units().is_some());
        h.settle().await;
        assert_eq!(h.controller.state().display.as_ref().unwrap().temperature, "15.2°C");
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn history_selection_searches_again() {
        let mut h = Harness::ok();
        h.controller.submit("london").unwrap();
        h.settle().await;
        h.controller.submit("mumbai").unwrap();
        h.settle().await;

        h.controller.select_history(1).unwrap();
        h.settle().await;
        let history: Vec<&str> = h.controller.state().history.entries().collect();
        assert_eq!(history, vec!["London", "Mumbai"]);
        assert!(h.controller.select_history(5).is_err());
    }

    #[tokio::test]
    async fn voice_search_feeds_query() {
        let mut h = Harness::ok();
        assert!(h.controller.start_voice());
        assert!(!h.controller.start_voice());
        assert_eq!(h.controller.state().voice, VoiceStatus::Listening);

        h.settle().await;
        assert_eq!(h.controller.state().voice, VoiceStatus::Recognizing);
        h.settle().await;
        assert_eq!(h.controller.state().voice, VoiceStatus::Idle);
        assert_eq!(h.controller.take_recognized_query().as_deref(), Some("paris"));
        assert!(h.controller.state().is_loading());

        h.settle().await;
        assert_eq!(h.controller.state().display.as_ref().unwrap().city, "Paris");
    }

    #[tokio::test]
    async fn silent_voice_capture_times_out() {
        let weather = Arc::new(FakeWeather {
            calls: AtomicUsize::new(0),
            respond: Box::new(|city: &str, units: Units| Ok(reading_for(city, units))),
        });
        let services = Services {
            weather: weather.clone(),
            icons: Arc::new(NoIcons),
            translator: Arc::new(FakeTranslator { fail: false }),
            audio: Arc::new(FakeMic { loud: false }),
            speech: Arc::new(FakeSpeech("unused")),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = AppController::new(services, tx, Units::Metric, Language::English);

        controller.start_voice();
        controller.handle(rx.recv().await.unwrap());

        assert_eq!(controller.state().voice, VoiceStatus::Idle);
        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, WeatherError::VoiceTimeout.user_message());
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn animation_ticks_move_toward_target() {
        let mut h = Harness::ok();
        h.controller.submit("Mumbai").unwrap();
        h.settle().await;

        let before = h.controller.state().background();
        h.controller.tick_color();
        h.controller.tick_phase();
        assert_ne!(h.controller.state().background(), before);
        assert!(h.controller.state().animation.phase() > 0.0);
    }
}
