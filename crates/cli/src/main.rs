mod command;
mod render;

use std::sync::Arc;

use anyhow::Context;
use cinesearch_client::{ClientConfig, HttpMovieApi};
use cinesearch_view::{ControllerConfig, DetailView, Screen, SearchView, Shell};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered views.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let api = HttpMovieApi::new(&config).context("failed to build HTTP client")?;
    info!(
        api_root = %api.api_root(),
        timeout_ms = config.timeout.as_millis() as u64,
        "movie backend configured"
    );

    let mut shell = Shell::new(Arc::new(api), ControllerConfig::default());
    let (screen_tx, screen_rx) = watch::channel(Screen::List);
    let renderer = tokio::spawn(render_loop(
        screen_rx,
        shell.search().subscribe(),
        shell.detail().subscribe(),
    ));

    println!("{}", command::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match command::parse(&line) {
            Command::Input(text) => {
                shell.go_back();
                shell.search().on_input(text);
            }
            Command::Open(id) => {
                shell.select_movie(id);
            }
            Command::Pick(n) => match pick(&shell, n) {
                Some(id) => {
                    shell.select_movie(id);
                }
                None => println!("nothing at position {n}"),
            },
            Command::Back => shell.go_back(),
            Command::Help => println!("{}", command::HELP),
            Command::Quit => break,
            Command::Unknown(line) => {
                warn!(input = %line, "unknown command");
                println!("unknown command, :help lists them");
            }
        }
        screen_tx.send_replace(shell.screen().clone());
    }

    info!("shutting down");
    shell.shutdown();
    renderer.abort();
    Ok(())
}

/// Id of the n-th (1-based) movie on the current screen.
fn pick(shell: &Shell, n: usize) -> Option<cinesearch_core::MovieId> {
    let movies = match shell.screen() {
        Screen::List => shell.search().view().results,
        Screen::Detail(_) => shell.detail().view().recommendations,
    };
    movies.into_iter().nth(n - 1).and_then(|movie| movie.id)
}

/// Reprints the active screen whenever it or its view state changes.
async fn render_loop(
    mut screen: watch::Receiver<Screen>,
    mut list: watch::Receiver<SearchView>,
    mut detail: watch::Receiver<DetailView>,
) {
    let mut last = String::new();
    loop {
        let text = match &*screen.borrow_and_update() {
            Screen::List => render::list(&list.borrow_and_update()),
            Screen::Detail(_) => render::detail(&detail.borrow_and_update()),
        };
        if text != last && !text.is_empty() {
            println!("----\n{text}");
            last = text;
        }

        let changed = tokio::select! {
            r = screen.changed() => r,
            r = list.changed() => r,
            r = detail.changed() => r,
        };
        if changed.is_err() {
            break;
        }
    }
}
