// /app.rs
use crate::{
    ai::{GameSession, OpenAiTransport, new_session},
    controller::{CallOutcome, GameController, PendingCall},
    error::GameError,
    game_state::{GamePhase, GameState},
    settings::Settings,
    tui::{Tui, TuiEvent},
    ui::{self, spinner::Spinner},
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::Cell;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

pub type Controller = GameController<GameSession<OpenAiTransport>>;

const SCROLL_STEP: usize = 5;

pub enum Action {
    TurnResolved(CallOutcome),
}

pub struct App<'a> {
    running: bool,
    pub(crate) settings: Settings,
    pub(crate) controller: Controller,

    // --- UI elements
    pub(crate) input: TextArea<'a>,
    pub(crate) spinner: Spinner,
    pub(crate) scroll_from_bottom: usize,
    pub(crate) max_scroll: Cell<usize>,
    suggestion_cursor: usize,

    action_sender: mpsc::UnboundedSender<Action>,
    action_receiver: mpsc::UnboundedReceiver<Action>,
}

impl App<'_> {
    pub fn new(settings: Settings) -> Self {
        let (action_sender, action_receiver) = mpsc::unbounded_channel();
        let controller = GameController::new(new_session(&settings));

        Self {
            running: true,
            settings,
            controller,

            input: new_input(),
            spinner: Spinner::new(),
            scroll_from_bottom: 0,
            max_scroll: Cell::new(0),
            suggestion_cursor: 0,

            action_sender,
            action_receiver,
        }
    }

    pub fn state(&self) -> &GameState {
        self.controller.state()
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(8.0) // 8 ticks per second, drives the spinner
            .frame_rate(30.0); // 30 frames per second

        tui.enter()?; // Starts event handler, enters raw mode, enters alternate screen

        while self.running {
            tui.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                Some(event) = tui.next() => self.handle_tui_event(event),
                Some(action) = self.action_receiver.recv() => self.handle_action(action),
                else => break,
            }
        }

        tui.exit()?; // stops event handler, exits raw mode, exits alternate screen
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            // The first case opens as soon as the screen is up.
            TuiEvent::Init => self.request(|controller| controller.start_game()),
            TuiEvent::Key(key_event) => self.on_key(key_event),
            TuiEvent::Paste(text) if self.accepts_input() => {
                self.input.insert_str(text.replace(['\r', '\n'], " "));
            }
            TuiEvent::Tick if self.state().in_flight => self.spinner.next_frame(),
            TuiEvent::Error => log::warn!("Failed to read a terminal event"),
            TuiEvent::Paste(_) | TuiEvent::Tick | TuiEvent::Render | TuiEvent::Resize(_, _) => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::TurnResolved(outcome) => {
                self.controller.resolve(outcome);
                self.suggestion_cursor = 0;
                self.scroll_to_bottom();
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return self.quit(),
            KeyCode::Esc => return self.quit(),
            KeyCode::Char('r') if ctrl => return self.request(|controller| controller.restart()),
            KeyCode::PageUp => return self.scroll_up(),
            KeyCode::PageDown => return self.scroll_down(),
            _ => {}
        }

        if self.state().is_over() {
            match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    self.request(|controller| controller.restart())
                }
                KeyCode::Char('q') => self.quit(),
                _ => {}
            }
            return;
        }

        if !self.accepts_input() {
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Tab => self.cycle_suggestion(),
            _ => {
                self.input.input(key);
            }
        }
    }

    fn accepts_input(&self) -> bool {
        let state = self.state();
        state.phase == GamePhase::Playing && !state.in_flight
    }

    fn submit_input(&mut self) {
        let action = self.input.lines().join(" ");
        match self.controller.submit_action(action) {
            Ok(call) => {
                self.input = new_input();
                self.scroll_to_bottom();
                self.dispatch(call);
            }
            Err(GameError::EmptyAction) => {}
            Err(e) => log::debug!("Action rejected: {e}"),
        }
    }

    fn cycle_suggestion(&mut self) {
        let suggestions = &self.controller.state().suggestions;
        if suggestions.is_empty() {
            return;
        }
        let suggestion = suggestions[self.suggestion_cursor % suggestions.len()].clone();
        self.suggestion_cursor = self.suggestion_cursor.wrapping_add(1);
        self.input = new_input();
        self.input.insert_str(suggestion);
    }

    fn request(
        &mut self,
        operation: impl FnOnce(&mut Controller) -> std::result::Result<PendingCall, GameError>,
    ) {
        match operation(&mut self.controller) {
            Ok(call) => {
                self.input = new_input();
                self.scroll_to_bottom();
                self.dispatch(call);
            }
            Err(e) => log::debug!("Request rejected: {e}"),
        }
    }

    // Runs the remote call off the UI loop; its outcome comes back as an Action.
    fn dispatch(&self, call: PendingCall) {
        let sender = self.action_sender.clone();
        tokio::spawn(async move {
            let outcome = call.await;
            if sender.send(Action::TurnResolved(outcome)).is_err() {
                log::warn!("Turn resolved after the app stopped listening");
            }
        });
    }

    fn scroll_up(&mut self) {
        self.scroll_from_bottom =
            (self.scroll_from_bottom + SCROLL_STEP).min(self.max_scroll.get());
    }

    fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(SCROLL_STEP);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    fn quit(&mut self) {
        self.running = false;
    }
}

fn new_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_placeholder_text("What does 許淑媚 do? (Enter to act, Tab for a suggestion)");
    input.set_cursor_line_style(ratatui::style::Style::default());
    input
}
