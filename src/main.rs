//! facecheck kiosk
//!
//! Interactive terminal front-end. Reads one command per line from stdin,
//! redraws the status line whenever it changes and keeps the clock in the
//! terminal title.

use anyhow::Context;
use clap::Parser;
use facecheck::kiosk::{employee_id_hint, FieldHint};
use facecheck::records::{RecordView, RenderedList};
use facecheck::settings::{FileStore, MemoryStore, PreferenceStore};
use facecheck::{
    init_logging, AttendanceClient, Clock, Config, DateFilter, FileSource, Focus, KeyEvent,
    Kiosk, StatusKind, TerminalBell,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "facecheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Face-recognition attendance kiosk")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognition API URL, overrides the config file
    #[arg(long)]
    api_url: Option<String>,
}

const HELP: &str = "\
Commands:
  capture | Alt+A                  mark attendance for the face in view
  register <passkey> <id> <name>   register the face in view
  mine <employee id>               load my attendance
  mine filter <range>              today|yesterday|week|month|quarter|all
  mine export                      export my attendance as CSV
  records <passkey>                load all attendance
  filter <range>                   filter all attendance
  search <term>                    search all attendance by name or id
  export                           export all attendance as CSV
  settings                         show settings
  set <key> <value>                change and save one setting
  activity                         recent activity
  Escape                           close all dialogs
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(url) = args.api_url {
        config.api.url = url;
    }

    init_logging(&config.logging);
    tracing::info!("facecheck kiosk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Recognition API: {}", config.api.url);

    let client = Arc::new(AttendanceClient::new(&config.api)?);
    let store: Box<dyn PreferenceStore> = match FileStore::open(&config.settings.path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("Preferences unavailable ({}), using defaults", e);
            Box::new(MemoryStore::new())
        }
    };

    let device = config.camera.device.clone();
    let zone = config.display.zone();

    let mut kiosk = Kiosk::new(config, client, store, Some(Box::new(TerminalBell)));
    kiosk.attach_camera(Box::new(FileSource::new(device)));
    let kiosk = Arc::new(kiosk);

    let clock = Clock::new(zone);
    let clock_handle = clock.start();
    let render_handle = spawn_renderer(Arc::clone(&kiosk), &clock);

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        dispatch(&kiosk, line).await;
    }

    tracing::info!("Shutting down...");
    render_handle.abort();
    clock_handle.abort();
    Ok(())
}

/// Redraw the status line, loading overlay and title clock as they change
fn spawn_renderer(kiosk: Arc<Kiosk>, clock: &Clock) -> tokio::task::JoinHandle<()> {
    let mut status = kiosk.presenter().subscribe();
    let mut loading = kiosk.loading().subscribe();
    let mut time = clock.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = status.borrow_and_update().clone();
                    let dark = kiosk.appearance().is_dark();
                    for line in current.message.lines() {
                        println!("{}{} {}\x1b[0m", palette(current.kind, dark), current.kind.icon(), line);
                    }
                }
                changed = loading.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if let Some(message) = loading.borrow_and_update().clone() {
                        println!("  ... {}", message);
                    }
                }
                changed = time.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now = time.borrow_and_update().clone();
                    print!("\x1b]0;facecheck {}\x07", now);
                }
            }
        }
    })
}

fn palette(kind: StatusKind, dark: bool) -> &'static str {
    match (kind, dark) {
        (StatusKind::Success, false) => "\x1b[32m",
        (StatusKind::Success, true) => "\x1b[92m",
        (StatusKind::Warning, false) => "\x1b[33m",
        (StatusKind::Warning, true) => "\x1b[93m",
        (StatusKind::Error, false) => "\x1b[31m",
        (StatusKind::Error, true) => "\x1b[91m",
        (StatusKind::Info, false) => "\x1b[34m",
        (StatusKind::Info, true) => "\x1b[96m",
    }
}

async fn dispatch(kiosk: &Arc<Kiosk>, line: &str) {
    if let Ok(key) = line.parse::<KeyEvent>() {
        if let Some(outcome) = kiosk.handle_key(key, Focus::None, "").await {
            tracing::debug!(action = ?outcome.action, "Handled shortcut");
        }
        return;
    }

    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "help" => println!("{}", HELP),

        "capture" => {
            let kiosk = Arc::clone(kiosk);
            tokio::spawn(async move { kiosk.capture_attendance().await });
        }

        "register" => {
            let mut parts = rest.splitn(3, ' ');
            let passkey = parts.next().unwrap_or_default().to_string();
            let employee_id = parts.next().unwrap_or_default().to_string();
            let name = parts.next().unwrap_or_default().to_string();

            kiosk.open_registration();
            let kiosk = Arc::clone(kiosk);
            tokio::spawn(async move {
                kiosk.register_face(&passkey, &name, &employee_id).await;
            });
        }

        "mine" => match rest.split_once(' ').unwrap_or((rest, "")) {
            ("filter", range) => match range.trim().parse::<DateFilter>() {
                Ok(filter) => print_view(&kiosk.filter_personal(filter).await),
                Err(e) => println!("{}", e),
            },
            ("export", _) => {
                if let Some(path) = kiosk.export_personal().await {
                    println!("Saved {}", path.display());
                }
            }
            _ => {
                if employee_id_hint(rest) == FieldHint::Invalid {
                    println!("(employee id looks too short)");
                }
                kiosk.open_my_attendance().await;
                kiosk.handle_key(KeyEvent::Enter, Focus::EmployeeId, rest).await;
                if let Some(dashboard) = kiosk.personal_dashboard(DateFilter::All).await {
                    println!("{} (updated {})", dashboard.title, dashboard.last_updated);
                    println!(
                        "Days: {}  This month: {}  Avg check-in: {}  Rate: {}",
                        dashboard.stats.total_days,
                        dashboard.stats.this_month_days,
                        dashboard.stats.avg_check_in(),
                        dashboard.stats.attendance_rate_label()
                    );
                    print_view(&dashboard.view);
                }
            }
        },

        "records" => {
            kiosk.open_attendance();
            kiosk.load_attendance(rest).await;
            let dashboard = kiosk.admin_dashboard(DateFilter::All).await;
            println!("{}", dashboard.stats);
            print_view(&dashboard.view);
        }

        "filter" => match rest.parse::<DateFilter>() {
            Ok(filter) => print_view(&kiosk.filter_records(filter).await),
            Err(e) => println!("{}", e),
        },

        "search" => {
            let outcome = kiosk.handle_key(KeyEvent::Enter, Focus::Search, rest).await;
            if let Some(view) = outcome.and_then(|o| o.view) {
                print_view(&view);
            }
        }

        "export" => {
            if let Some(path) = kiosk.export_all().await {
                println!("Saved {}", path.display());
            }
        }

        "settings" => {
            let settings = kiosk.open_settings();
            println!("camera_quality = {}", settings.camera_quality);
            println!("sensitivity    = {}", settings.sensitivity_label());
            println!("sound_enabled  = {}", settings.sound_enabled);
            println!("auto_hide      = {}", settings.auto_hide);
            println!("dark_mode      = {}", settings.dark_mode);
        }

        "set" => {
            let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let mut settings = kiosk.open_settings();
            match settings.apply(key, value.trim()) {
                Ok(()) => kiosk.save_settings(settings),
                Err(e) => println!("{}", e),
            }
        }

        "activity" => {
            let entries = kiosk.activity().entries();
            if entries.is_empty() {
                println!("No recent activity");
            }
            for entry in entries {
                println!("{}  {}", entry.time, entry.headline());
            }
        }

        other => println!("Unknown command: {} (try 'help')", other),
    }
}

fn print_view(view: &RecordView) {
    println!("{}", view.title);
    print_list(&view.list);
}

fn print_list(list: &RenderedList) {
    if let Some((heading, detail)) = list.empty {
        println!("  {}: {}", heading, detail);
        return;
    }

    for row in &list.rows {
        println!(
            "  {:<28} {:<24} {:>5}  {}",
            row.title, row.time, row.confidence, row.status
        );
    }
    println!("  {}", list.count_label);
}
