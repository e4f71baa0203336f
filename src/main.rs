mod app;
mod model;
mod msg;
mod selector;

use std::io;
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use app::App;
use model::config::AppConfig;
use msg::Msg;

fn main() -> Result<()> {
    // Initialize logging to file (never stdout)
    let log_dir = directories::ProjectDirs::from("", "", "searchdesk")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "searchdesk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("searchdesk=info")
        .init();

    tracing::info!("searchdesk starting");

    let config = AppConfig::load()?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("searchdesk error: {e:?}");
    }

    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let mut app = App::new(config, tx.clone());

    // Input thread — reads terminal events and forwards as Msg
    let tx_input = tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event) = event::read() {
                let msg = match event {
                    // Windows also emits release and repeat key events.
                    Event::Key(k) if k.kind == KeyEventKind::Press => Msg::Key(k),
                    Event::Resize(w, h) => Msg::Resize(w, h),
                    _ => continue,
                };
                if tx_input.send(msg).is_err() {
                    break;
                }
            }
        }
    });

    // ── Main event loop ──
    terminal.draw(|f| app.view(f))?;

    loop {
        // Batch-drain all pending messages
        let first = rx.recv()?;
        app.update(first)?;

        while let Ok(msg) = rx.try_recv() {
            app.update(msg)?;
        }

        if app.should_quit {
            break;
        }

        terminal.draw(|f| app.view(f))?;
    }

    Ok(())
}
