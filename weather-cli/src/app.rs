//! Terminal event loop.
//!
//! Architecture:
//! - `App` owns the terminal-side widgets and the core `AppController`.
//! - Fetch and voice tasks report back over the controller's `AppEvent` channel.
//! - A blocking reader task forwards terminal events over a second channel.
//! - Two intervals drive the colour easing and the icon bounce.
//! - Every loop turn redraws the whole frame.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};
use weather_core::{
    AppController, AppEvent, Language, Services, Units,
    animation::{COLOR_TICK, PHASE_TICK},
};

use crate::search::{SearchAction, SearchBox};
use crate::toast::ToastManager;
use crate::ui;

/// How often the input reader wakes to check whether the loop is gone.
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    History,
}

enum Step {
    Core(AppEvent),
    Terminal(Event),
    ColorTick,
    PhaseTick,
}

pub struct App {
    pub(crate) controller: AppController,
    pub(crate) search: SearchBox,
    pub(crate) toasts: ToastManager,
    pub(crate) focus: Focus,
    pub(crate) history_cursor: usize,
    events: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(services: Services, units: Units, language: Language) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            controller: AppController::new(services, tx, units, language),
            search: SearchBox::default(),
            toasts: ToastManager::new(),
            focus: Focus::Search,
            history_cursor: 0,
            events,
            should_quit: false,
        }
    }

    pub async fn run(mut self, initial_city: Option<String>) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = self.event_loop(&mut terminal, initial_city).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("weather exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        initial_city: Option<String>,
    ) -> anyhow::Result<()> {
        // ── Background task: keyboard events ──────────────────────────────────
        let (term_tx, mut term_rx) = mpsc::unbounded_channel::<Event>();
        // Exits within INPUT_POLL of `term_rx` being dropped.
        tokio::task::spawn_blocking(move || forward_terminal_events(&term_tx, event::poll, event::read));

        let mut color_tick = interval(COLOR_TICK);
        color_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut phase_tick = interval(PHASE_TICK);
        phase_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if let Some(city) = initial_city {
            self.search.set_value(&city);
            let _ = self.controller.submit(&city);
        }

        loop {
            self.drain_notices();
            terminal.draw(|f| ui::draw(f, self))?;

            if self.should_quit {
                break;
            }

            let step = tokio::select! {
                Some(event) = self.events.recv() => Step::Core(event),
                Some(ev) = term_rx.recv() => Step::Terminal(ev),
                _ = color_tick.tick() => Step::ColorTick,
                _ = phase_tick.tick() => Step::PhaseTick,
            };

            match step {
                Step::Core(event) => self.controller.handle(event),
                Step::Terminal(ev) => self.handle_terminal(ev),
                Step::ColorTick => {
                    self.controller.tick_color();
                    self.toasts.tick();
                }
                Step::PhaseTick => self.controller.tick_phase(),
            }
        }

        Ok(())
    }

    fn drain_notices(&mut self) {
        for notice in self.controller.take_notices() {
            self.toasts.push(notice);
        }
        if let Some(query) = self.controller.take_recognized_query() {
            self.search.set_value(&query);
        }
    }

    fn handle_terminal(&mut self, ev: Event) {
        if let Event::Key(key) = ev {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('u') if ctrl => {
                self.controller.toggle_units();
            }
            KeyCode::Char('l') if ctrl => {
                self.controller.cycle_language();
            }
            KeyCode::Char('t') if ctrl => {
                if !self.controller.toggle_alternate_time() {
                    debug!("alternate time not offered for this city");
                }
            }
            KeyCode::Char('r') if ctrl => {
                self.controller.start_voice();
            }
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            _ => match self.focus {
                Focus::Search => self.handle_search_key(key),
                Focus::History => self.handle_history_key(key),
            },
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search if !self.controller.state().history.is_empty() => {
                self.history_cursor = 0;
                Focus::History
            }
            _ => Focus::Search,
        };
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if !self.controller.state().controls_enabled() {
            return;
        }
        if let SearchAction::Submit(query) = self.search.handle_key(key) {
            let _ = self.controller.submit(&query);
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let len = self.controller.state().history.len();
        if len == 0 {
            self.focus = Focus::Search;
            return;
        }
        match key.code {
            KeyCode::Left => self.history_cursor = self.history_cursor.saturating_sub(1),
            KeyCode::Right => self.history_cursor = (self.history_cursor + 1).min(len - 1),
            KeyCode::Enter if self.controller.state().controls_enabled() => {
                let city = self.controller.state().history.get(self.history_cursor).map(str::to_string);
                if let Some(city) = city {
                    self.search.set_value(&city);
                    let _ = self.controller.select_history(self.history_cursor);
                    self.history_cursor = 0;
                }
            }
            _ => {}
        }
    }
}

/// Forwards terminal events until the receiver closes or the terminal errors.
fn forward_terminal_events<P, R>(tx: &mpsc::UnboundedSender<Event>, mut poll: P, mut read: R)
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<Event>,
{
    while !tx.is_closed() {
        match poll(INPUT_POLL) {
            Ok(false) => {}
            Ok(true) => match read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("terminal read failed: {}", e);
                    break;
                }
            },
            Err(e) => {
                debug!("terminal poll failed: {}", e);
                break;
            }
        }
    }
}
