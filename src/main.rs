//! SkillPort - terminal client for the SkillPort course marketplace
//!
//! Without a subcommand this opens a full-screen UI with the review carousel
//! and the category management screen. Subcommands run one flow and exit.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};

use skillport::app::{App, Screen};
use skillport::cache::ReviewCache;
use skillport::categories::CategoryManager;
use skillport::checkout::{Cart, Checkout, CheckoutOutcome, TerminalWidget};
use skillport::cli::{Cli, Command};
use skillport::config::Config;
use skillport::data::Category;
use skillport::logging::{self, LogTarget};
use skillport::notify::ConsoleNotifier;
use skillport::reviews::{ReviewFeed, ReviewsView, REVIEW_EXCERPT_WORDS};
use skillport::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.screen {
        Screen::Loading => render_loading(frame),
        Screen::Reviews => ui::render_reviews(frame, app),
        Screen::Categories => ui::render_categories(frame, app),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while reviews are being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading reviews...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Drives the event loop until the user quits
async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_outcomes();
        terminal.draw(|f| render_ui(f, &*app))?;

        // Requests run in the background so keys are still read meanwhile
        if let Some(action) = app.take_action() {
            app.spawn_action(action);
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn run_tui(config: &Config, verbose: u8) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let log_target = config
        .log_dir()
        .map(LogTarget::File)
        .unwrap_or(LogTarget::Off);
    logging::init_or_disable(verbose.max(1), log_target);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    let feed = ReviewFeed::new(ReviewCache::new(config.store()));
    let mut app = App::new(config.api_client(), feed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result.map(|()| ExitCode::SUCCESS)
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found");
        return;
    }
    for category in categories {
        println!("{:<24} {}", category.name, category.description_or_default());
    }
}

async fn run_command(command: Command, config: &Config) -> ExitCode {
    let api = config.api_client();

    match command {
        Command::Reviews => {
            let feed = ReviewFeed::new(ReviewCache::new(config.store()));
            match feed.load(&api).await {
                ReviewsView::Empty => println!("No reviews available yet"),
                ReviewsView::Loaded { reviews, .. } => {
                    for review in &reviews {
                        println!(
                            "{} {}  {} | {}",
                            ui::reviews::star_bar(review.stars()),
                            review.rating_label(),
                            review.author_name(),
                            review.course_name()
                        );
                        println!("    {}", review.excerpt(REVIEW_EXCERPT_WORDS));
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Command::Categories { action } => {
            let manager = CategoryManager::new(&api, ConsoleNotifier);
            match action.form() {
                None => {
                    print_categories(&manager.load().await);
                    ExitCode::SUCCESS
                }
                Some(mut form) => match manager.create(&mut form).await {
                    Ok(categories) => {
                        print_categories(&categories);
                        ExitCode::SUCCESS
                    }
                    Err(_) => ExitCode::FAILURE,
                },
            }
        }
        Command::Checkout { ref courses, .. } => {
            let customer = command.customer().unwrap_or_default();
            let mut cart = Cart::with_courses(courses.iter().cloned());
            let mut checkout = Checkout::new(&api, TerminalWidget::stdin(), ConsoleNotifier)
                .with_config(config.checkout_config());
            match checkout.buy(&mut cart, &customer).await {
                Ok(CheckoutOutcome::Paid(receipt)) => {
                    println!("Payment id: {}", receipt.razorpay_payment_id);
                    ExitCode::SUCCESS
                }
                Ok(CheckoutOutcome::Enrolled) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Command::Enroll { course } => {
            let mut cart = Cart::with_courses([course.as_str()]);
            let mut checkout = Checkout::new(&api, TerminalWidget::stdin(), ConsoleNotifier);
            match checkout.enroll_free(&course, &mut cart).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(&cli);

    match cli.command {
        None => run_tui(&config, cli.verbose).await,
        Some(command) => {
            logging::init(cli.verbose, LogTarget::Stderr)?;
            Ok(run_command(command, &config).await)
        }
    }
}
