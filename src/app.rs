//! Application state management for the SkillPort TUI
//!
//! Holds the screen state, turns key presses into state changes, and runs
//! the network-backed actions those key presses request. Key handling never
//! awaits: it records a pending [`Action`]. The main loop hands that action
//! to a background task, which reports an [`ActionOutcome`] over a channel
//! while the loop keeps reading keys.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::categories::{CategoryError, CategoryForm, CategoryManager, FieldError};
use crate::clock::SystemClock;
use crate::data::Category;
use crate::notify::ToastLog;
use crate::reviews::{ReviewFeed, ReviewsView};
use crate::storage::SharedStore;

/// Time between automatic carousel advances
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(2500);

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Initial loading state while reviews are fetched
    Loading,
    /// Review carousel
    Reviews,
    /// Category management
    Categories,
}

/// Field of the category form that receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
}

/// Work requested by a key press, run by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadReviews,
    LoadCategories,
    CreateCategory,
}

/// Result of an [`Action`], applied back onto the [`App`]
#[derive(Debug)]
pub enum ActionOutcome {
    Reviews(ReviewsView),
    Categories(Vec<Category>),
    /// The category was created; carries the refreshed list
    CategoryCreated(Vec<Category>),
    CategoryRejected(CategoryError),
}

/// Everything an action needs, cloned into the task that runs it
#[derive(Clone)]
struct Worker {
    api: ApiClient,
    feed: ReviewFeed<SharedStore, SystemClock>,
    toasts: ToastLog,
}

impl Worker {
    async fn perform(self, action: Action, mut form: CategoryForm) -> ActionOutcome {
        match action {
            Action::LoadReviews => ActionOutcome::Reviews(self.feed.load(&self.api).await),
            Action::LoadCategories => {
                let manager = CategoryManager::new(&self.api, &self.toasts);
                ActionOutcome::Categories(manager.load().await)
            }
            Action::CreateCategory => {
                let manager = CategoryManager::new(&self.api, &self.toasts);
                match manager.create(&mut form).await {
                    Ok(categories) => ActionOutcome::CategoryCreated(categories),
                    Err(err) => ActionOutcome::CategoryRejected(err),
                }
            }
        }
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current screen
    pub screen: Screen,
    /// Reviews shown in the carousel
    pub reviews: ReviewsView,
    /// Index of the first visible review card
    pub carousel_index: usize,
    /// Whether the carousel advances on its own
    pub autoplay: bool,
    /// When the carousel last moved
    last_advance: Instant,
    /// Categories shown in the table
    pub categories: Vec<Category>,
    /// Whether categories were fetched at least once
    pub categories_loaded: bool,
    /// The category creation form
    pub form: CategoryForm,
    /// Form field with keyboard focus
    pub focus: FormField,
    /// Validation errors from the last submit
    pub form_errors: Vec<FieldError>,
    /// True while an action is running
    pub busy: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Toasts shown in the footer
    pub toasts: ToastLog,
    /// Action requested by the last key press
    pending: Option<Action>,
    api: ApiClient,
    feed: ReviewFeed<SharedStore, SystemClock>,
    outcome_tx: mpsc::Sender<ActionOutcome>,
    outcome_rx: mpsc::Receiver<ActionOutcome>,
}

impl App {
    /// Creates an App that will load reviews first
    pub fn new(api: ApiClient, feed: ReviewFeed<SharedStore, SystemClock>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(8);
        Self {
            screen: Screen::Loading,
            reviews: ReviewsView::Empty,
            carousel_index: 0,
            autoplay: true,
            last_advance: Instant::now(),
            categories: Vec::new(),
            categories_loaded: false,
            form: CategoryForm::default(),
            focus: FormField::Name,
            form_errors: Vec::new(),
            busy: false,
            show_help: false,
            should_quit: false,
            toasts: ToastLog::new(),
            pending: Some(Action::LoadReviews),
            api,
            feed,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn review_count(&self) -> usize {
        self.reviews.reviews().len()
    }

    /// Moves the carousel one card forward, wrapping at the end
    pub fn next_review(&mut self) {
        let count = self.review_count();
        if count > 0 {
            self.carousel_index = (self.carousel_index + 1) % count;
        }
        self.last_advance = Instant::now();
    }

    /// Moves the carousel one card back, wrapping at the start
    pub fn previous_review(&mut self) {
        let count = self.review_count();
        if count > 0 {
            self.carousel_index = (self.carousel_index + count - 1) % count;
        }
        self.last_advance = Instant::now();
    }

    /// Advances the carousel when autoplay is due
    pub fn tick(&mut self, now: Instant) {
        if self.screen != Screen::Reviews || !self.autoplay || self.review_count() < 2 {
            return;
        }
        if now.duration_since(self.last_advance) >= AUTOPLAY_INTERVAL {
            let count = self.review_count();
            self.carousel_index = (self.carousel_index + 1) % count;
            self.last_advance = now;
        }
    }

    /// Returns the pending action and marks the app busy
    pub fn take_action(&mut self) -> Option<Action> {
        let action = self.pending.take();
        self.busy = action.is_some();
        action
    }

    fn worker(&self) -> Worker {
        Worker {
            api: self.api.clone(),
            feed: self.feed.clone(),
            toasts: self.toasts.clone(),
        }
    }

    /// Runs an action on a background task
    ///
    /// The outcome is applied by a later [`App::drain_outcomes`]; the app
    /// stays busy until then.
    pub fn spawn_action(&self, action: Action) {
        let worker = self.worker();
        let form = self.form.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = worker.perform(action, form).await;
            let _ = tx.send(outcome).await;
        });
    }

    /// Applies every outcome that background tasks have reported so far
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Runs an action to completion on the current task
    pub async fn run_action(&mut self, action: Action) {
        let outcome = self.worker().perform(action, self.form.clone()).await;
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Reviews(view) => {
                self.reviews = view;
                self.carousel_index = 0;
                self.last_advance = Instant::now();
                if self.screen == Screen::Loading {
                    self.screen = Screen::Reviews;
                }
            }
            ActionOutcome::Categories(categories) => {
                self.categories = categories;
                self.categories_loaded = true;
            }
            ActionOutcome::CategoryCreated(categories) => {
                self.categories = categories;
                self.categories_loaded = true;
                self.form.reset();
                self.form_errors.clear();
                self.focus = FormField::Name;
            }
            ActionOutcome::CategoryRejected(CategoryError::Invalid(errors)) => {
                self.form_errors = errors
            }
            ActionOutcome::CategoryRejected(CategoryError::Api(_)) => self.form_errors.clear(),
        }
        self.busy = false;
    }

    fn request(&mut self, action: Action) {
        if !self.busy {
            self.pending = Some(action);
        }
    }

    fn focused_field(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.form.name,
            FormField::Description => &mut self.form.description,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::Name,
        };
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Ctrl+C`: Quit from anywhere
    /// - Reviews: `←/h`, `→/l` move the carousel, `Space` toggles autoplay,
    ///   `r` reloads, `c` opens categories, `?` help, `q`/`Esc` quit
    /// - Categories: type into the focused field, `Tab` switches field,
    ///   `Enter` moves to the description or submits, `Esc` goes back
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.screen {
            Screen::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            Screen::Reviews => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Left | KeyCode::Char('h') => self.previous_review(),
                KeyCode::Right | KeyCode::Char('l') => self.next_review(),
                KeyCode::Char(' ') => self.autoplay = !self.autoplay,
                KeyCode::Char('r') => self.request(Action::LoadReviews),
                KeyCode::Char('c') => {
                    self.screen = Screen::Categories;
                    if !self.categories_loaded {
                        self.request(Action::LoadCategories);
                    }
                }
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
            Screen::Categories => match key_event.code {
                KeyCode::Esc => self.screen = Screen::Reviews,
                KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
                KeyCode::Enter => match self.focus {
                    FormField::Name => self.focus = FormField::Description,
                    FormField::Description => self.request(Action::CreateCategory),
                },
                KeyCode::Backspace => {
                    if !self.busy {
                        self.focused_field().pop();
                    }
                }
                KeyCode::Char(c) => {
                    if !self.busy {
                        self.focused_field().push(c);
                    }
                }
                _ => {}
            },
        }
    }
}
