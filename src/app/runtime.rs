use std::io::{self, Stdout};
use std::thread;

use chrono::Local;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use url::Url;

use super::fetch::{build_client, fetch_front_page};
use super::layout::{bar_line, title_line, url_line};
use super::tui;
use super::types::{BOARD_TITLE, BoardState, Cli, LoopAction};

pub async fn run() -> io::Result<()> {
    let cli = Cli::parse();
    Url::parse(&cli.url).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid URL {}: {err}", cli.url),
        )
    })?;
    let client = build_client().map_err(io::Error::other)?;

    if cli.no_tui {
        return run_headless(&client, &cli).await;
    }

    // Sole input producer: a dedicated thread parked in event::read,
    // forwarding everything it sees. It ends with the process.
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let (_guard, mut terminal) = tui::setup_terminal()?;
    let result = draw_loop(&mut terminal, &client, &cli, rx).await;
    terminal.clear()?;
    result
}

/// The wait loop. Each iteration suspends on whichever comes first: the next
/// forwarded terminal event or a freshly armed refresh timer. The timer is
/// re-created after every wake, so a slow fetch pushes the next tick out by
/// its own duration rather than bunching ticks up.
async fn draw_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    client: &Client,
    cli: &Cli,
    mut rx: UnboundedReceiver<Event>,
) -> io::Result<()> {
    let mut state = BoardState::default();
    refresh(&mut state, client, cli).await;
    terminal.draw(|f| tui::draw(f, &state))?;

    loop {
        let action = tokio::select! {
            maybe_event = rx.recv() => match maybe_event {
                Some(ev) => classify_event(&ev),
                // The poller never drops its sender while we run.
                None => LoopAction::Exit,
            },
            _ = tokio::time::sleep(cli.refresh_interval()) => LoopAction::Refresh,
        };

        match action {
            LoopAction::Exit => break,
            LoopAction::Refresh => {
                refresh(&mut state, client, cli).await;
                terminal.draw(|f| tui::draw(f, &state))?;
            }
            LoopAction::Ignore => {}
        }
    }

    Ok(())
}

fn classify_event(event: &Event) -> LoopAction {
    match event {
        Event::Key(key) if key.code == KeyCode::Esc => LoopAction::Exit,
        Event::Resize(_, _) => LoopAction::Refresh,
        _ => LoopAction::Ignore,
    }
}

async fn refresh(state: &mut BoardState, client: &Client, cli: &Cli) {
    match fetch_front_page(client, &cli.url, cli.items).await {
        Ok(headlines) => {
            state.headlines = headlines;
            state.refreshed_at = Some(Local::now());
            state.last_error = None;
        }
        // Keep the previous board on screen; the status line reports the
        // failure and the next tick retries.
        Err(err) => state.last_error = Some(err),
    }
}

/// `--no-tui`: one fetch, the same composed rows on stdout, then exit.
async fn run_headless(client: &Client, cli: &Cli) -> io::Result<()> {
    let headlines = fetch_front_page(client, &cli.url, cli.items)
        .await
        .map_err(io::Error::other)?;

    let width = headlines.column_width;
    println!("{}", bar_line(BOARD_TITLE, width));
    for story in &headlines.stories {
        println!("{}", title_line(story, width));
        println!("{}", url_line(story, width));
    }
    eprintln!(
        "fetched {} stories from {}",
        headlines.stories.len(),
        cli.url
    );
    Ok(())
}
