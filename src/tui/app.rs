use std::mem;
use std::sync::Arc;

use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::auth::IdentityProvider;
use crate::flow::{
    Effect, Event, FlowState, RegistrationOutcome, SessionObserver, reduce, register,
};
use crate::model::Step;

use super::action::{Action, ScreenHandler};
use super::error::AppError;
use super::screens::{
    FeedState, ProfileState, RegistrationState, draw_feed, draw_profile, draw_registration,
};
use super::widgets::{StatusBarContext, draw_notice, draw_status_bar};

/// Message shown when a registration task dies without reporting back.
const TASK_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Top-level application state.
///
/// Key presses and provider notifications both become flow [`Event`]s.
/// Effects requested by the reducer run as background tasks that post
/// their results back onto the same queue.
pub struct App {
    state: FlowState,
    registration: RegistrationState,
    profile: ProfileState,
    feed: FeedState,
    provider: Arc<dyn IdentityProvider>,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    tasks: Vec<JoinHandle<()>>,
    _observer: SessionObserver,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the registration step and starts observing
    /// `provider` for session changes.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let observer = SessionObserver::attach(provider.as_ref(), events_tx.clone());
        Self {
            state: FlowState::new(),
            registration: RegistrationState::new(),
            profile: ProfileState::new(),
            feed: FeedState::new(),
            provider,
            events_tx,
            events_rx,
            tasks: Vec::new(),
            _observer: observer,
            should_quit: false,
        }
    }

    /// Main event loop: draw, wait for a key or a queued event, dispatch.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut input = EventStream::new();
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                next = input.next() => match next {
                    Some(Ok(TermEvent::Key(key))) => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.dispatch(event),
            }
            self.tasks.retain(|task| !task.is_finished());
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        Ok(())
    }

    /// Renders the current step, the status bar and any pending notice.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.state.step() {
            Step::Registration => {
                draw_registration(&self.registration, self.state.loading(), frame, main_area);
            }
            Step::ProfileSetup => {
                draw_profile(&self.profile, self.state.form().section, frame, main_area);
            }
            Step::Feed => draw_feed(&self.feed, self.state.form(), frame, main_area),
        }

        let ctx = StatusBarContext {
            step: self.state.step(),
            signed_in_as: self.state.signed_in_as().map(str::to_string),
            loading: self.state.loading(),
        };
        draw_status_bar(&ctx, frame, status_area);

        if let Some(notice) = self.state.notice() {
            draw_notice(notice, frame, frame.area());
        }
    }

    /// Handles a key event: global keys first, then the pending notice,
    /// then the current step's screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dispatch(Event::DismissNotice);
            }
            return;
        }

        let action = match self.state.step() {
            Step::Registration => self.registration.handle_key(key),
            Step::ProfileSetup => self.profile.handle_key(key),
            Step::Feed => self.feed.handle_key(key),
        };
        self.apply(action);
    }

    /// Turns a screen [`Action`] into a flow event.
    fn apply(&mut self, action: Action) {
        let event = match action {
            Action::None => return,
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::UpdateField(field, value) => Event::FieldChanged(field, value),
            Action::SubmitRegistration => Event::SubmitRegistration,
            Action::SelectDepartment(dept) => Event::SelectDepartment(dept),
            Action::ConfirmProfile => Event::ConfirmProfile,
            Action::Logout => Event::LogoutRequested,
        };
        self.dispatch(event);
    }

    /// Runs `event` through the reducer and starts any effects it requests.
    pub fn dispatch(&mut self, event: Event) {
        let (state, effects) = reduce(mem::take(&mut self.state), event);
        self.state = state;
        for effect in effects {
            self.spawn_effect(effect);
        }
    }

    fn spawn_effect(&mut self, effect: Effect) {
        tracing::debug!(?effect, "starting effect");
        let provider = Arc::clone(&self.provider);
        let events = self.events_tx.clone();
        let task = match effect {
            Effect::Register { email, password } => tokio::spawn(async move {
                let attempt = tokio::spawn(async move {
                    register(provider.as_ref(), &email, &password).await
                });
                let outcome = attempt.await.unwrap_or_else(|e| {
                    tracing::error!(error = %e, "registration task failed");
                    RegistrationOutcome::Failed(TASK_FAILED_MESSAGE.to_string())
                });
                if events.send(Event::RegistrationSettled(outcome)).is_err() {
                    tracing::debug!("event queue closed, dropping registration result");
                }
            }),
            Effect::SignOut => tokio::spawn(async move {
                if let Err(e) = provider.sign_out().await {
                    tracing::warn!(error = %e, "sign-out failed");
                }
                if events.send(Event::SignedOut).is_err() {
                    tracing::debug!("event queue closed, dropping sign-out result");
                }
            }),
        };
        self.tasks.push(task);
    }

    /// Returns the flow state.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
