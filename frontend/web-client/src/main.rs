use std::sync::Arc;

use anyhow::{Context, Result};
use instamoc_web::api::Endpoints;
use instamoc_web::media::MediaResolver;
use instamoc_web::{
    Config, DashboardView, FeedView, HistoryNavigator, LoginFlow, LoginForm, LoginOutcome,
    Renderer, Route,
};
use session_transport::SessionTransport;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Input = Lines<BufReader<Stdin>>;

/// Where the terminal goes after a view hands back control
enum Next {
    Go(Route),
    Quit,
}

struct App {
    config: Config,
    transport: SessionTransport,
    endpoints: Endpoints,
    navigator: Arc<HistoryNavigator>,
    renderer: Renderer,
    input: Input,
    /// Credentials from the environment are only tried once
    env_login_used: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Configuration loading failed")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.log_level.clone().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    tracing::info!(base_url = %config.transport.base_url, "Starting instamoc client");

    let transport =
        SessionTransport::new(config.transport.clone()).context("Failed to build HTTP client")?;
    let endpoints = Endpoints::from_config(&config.transport);
    let renderer = Renderer::new(MediaResolver::new(endpoints.base().clone()));

    let mut app = App {
        config,
        transport,
        endpoints,
        navigator: Arc::new(HistoryNavigator::new()),
        renderer,
        input: BufReader::new(tokio::io::stdin()).lines(),
        env_login_used: false,
    };

    // First argument opens a profile instead of the timeline
    let landing = std::env::args()
        .nth(1)
        .map(Route::Profile)
        .unwrap_or(Route::Timeline);

    let mut route = Route::Login;
    loop {
        let next = match route {
            Route::Login => app.sign_in(landing.clone()).await?,
            Route::Timeline => {
                let view = FeedView::timeline(
                    app.transport.clone(),
                    app.endpoints.clone(),
                    app.navigator.clone(),
                    &app.config.feed,
                );
                app.run_feed(view).await?
            }
            Route::Profile(username) => {
                let view = FeedView::profile(
                    username,
                    app.transport.clone(),
                    app.endpoints.clone(),
                    app.navigator.clone(),
                    &app.config.feed,
                );
                app.run_feed(view).await?
            }
        };

        match next {
            Next::Go(to) => route = to,
            Next::Quit => break,
        }
    }

    tracing::info!("Client stopped");
    Ok(())
}

impl App {
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.input.next_line().await?)
    }

    /// Keep asking for credentials until the server accepts them
    async fn sign_in(&mut self, landing: Route) -> Result<Next> {
        loop {
            let env_credentials = match (&self.config.app.username, &self.config.app.password) {
                (Some(username), Some(password)) if !self.env_login_used => {
                    Some(LoginForm::new(username.clone(), password.clone()))
                }
                _ => None,
            };

            let form = match env_credentials {
                Some(form) => {
                    self.env_login_used = true;
                    form
                }
                None => {
                    let Some(username) = self.prompt("username: ").await? else {
                        return Ok(Next::Quit);
                    };
                    let Some(password) = self.prompt("password: ").await? else {
                        return Ok(Next::Quit);
                    };
                    LoginForm::new(username.trim(), password.trim_end())
                }
            };

            let flow = LoginFlow::new(
                self.transport.clone(),
                self.endpoints.clone(),
                self.navigator.clone(),
            );
            match flow.submit(&form).await {
                Ok(LoginOutcome::LoggedIn) => {
                    // The flow navigated to the timeline; honour the requested landing instead
                    self.navigator.drain();
                    return Ok(Next::Go(landing));
                }
                Ok(LoginOutcome::Rejected(rejection)) => {
                    println!("login failed: {}", rejection.message());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Login request failed");
                    println!("login failed: {}", e);
                }
            }
        }
    }

    async fn show_dashboard(&self) {
        let view = DashboardView::new(
            self.transport.clone(),
            self.endpoints.clone(),
            self.navigator.clone(),
        );
        match view.load().await {
            Ok(me) => println!("{}", self.renderer.dashboard(&me)),
            Err(e) => tracing::warn!(error = %e, "Dashboard unavailable"),
        }
    }

    async fn logout(&self) {
        let flow = LoginFlow::new(
            self.transport.clone(),
            self.endpoints.clone(),
            self.navigator.clone(),
        );
        flow.logout().await;
    }

    /// Drive one feed view from stdin until it navigates away or the user quits
    async fn run_feed(&mut self, view: FeedView) -> Result<Next> {
        println!("== {} ==", view.kind().label());
        println!("[enter] more  [r] refresh  [d] dashboard  [l] logout  [q] quit");

        let mut shown = 0;
        let mut header_shown = false;

        // The sentinel starts on screen
        view.on_visibility(1.0).await;

        loop {
            if let Some(route) = self.navigator.drain().pop() {
                view.teardown();
                return Ok(Next::Go(route));
            }

            let snapshot = view.snapshot();
            if let (false, Some(profile)) = (header_shown, &snapshot.profile) {
                println!("{}", self.renderer.profile_header(profile));
                header_shown = true;
            }
            let fresh = view.posts_from(shown);
            if !fresh.is_empty() {
                println!("{}", self.renderer.posts(&fresh));
                shown += fresh.len();
            }
            let footer = Renderer::affordance(view.affordance());
            if !footer.is_empty() {
                println!("{}", footer);
            }

            let Some(line) = self.prompt("> ").await? else {
                view.teardown();
                return Ok(Next::Quit);
            };

            match line.trim() {
                "" => {
                    // Scroll the sentinel out and back into view
                    view.on_visibility(0.0).await;
                    view.on_visibility(1.0).await;
                }
                "r" => {
                    view.refresh().await;
                }
                "d" => self.show_dashboard().await,
                "l" => self.logout().await,
                "q" => {
                    view.teardown();
                    return Ok(Next::Quit);
                }
                other => println!("unknown command: {}", other),
            }
        }
    }
}
