//! facecheck CLI
//!
//! One-shot commands for scripted use:
//! - Capture attendance or register a face from a frame file
//! - Load, filter, search and export attendance records
//! - Read and change kiosk settings
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use facecheck::records::{RecordView, RenderedList};
use facecheck::settings::{FileStore, PreferenceStore, Settings, KEYS};
use facecheck::{
    init_logging, AttendanceClient, Config, DateFilter, FileSource, Kiosk, Silent, StatusKind,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "facecheck-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Face-recognition attendance from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Recognition API URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mark attendance for the face in a frame
    Capture {
        /// Frame image (default: the configured camera device)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Register a new face
    Register {
        /// Registration passkey
        #[arg(short, long)]
        passkey: String,
        /// Full name (letters and spaces)
        #[arg(short, long)]
        name: String,
        /// Employee ID
        #[arg(short, long)]
        employee_id: String,
        /// Frame image (default: the configured camera device)
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Load everyone's attendance
    Records {
        /// Viewing passkey
        #[arg(short, long)]
        passkey: String,
        /// Date range (today, yesterday, week, month, quarter, all)
        #[arg(long, default_value = "all")]
        range: DateFilter,
        /// Search by name or employee ID
        #[arg(short, long)]
        search: Option<String>,
        /// Also export the full list as CSV
        #[arg(long)]
        export: bool,
    },

    /// Load one employee's attendance
    Mine {
        /// Employee ID
        employee_id: String,
        /// Date range (today, yesterday, week, month, quarter, all)
        #[arg(long, default_value = "all")]
        range: DateFilter,
        /// Also export the full list as CSV
        #[arg(long)]
        export: bool,
    },

    /// Read or change kiosk settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show one setting, or all of them
    Get { key: Option<String> },
    /// Change one setting
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url.clone() {
        config.api.url = url;
    }
    init_logging(&config.logging);

    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Capture { image } => {
            let kiosk = build_kiosk(config, image)?;
            kiosk.capture_attendance().await;
            finish(&kiosk)
        }

        Commands::Register {
            passkey,
            name,
            employee_id,
            image,
        } => {
            let kiosk = build_kiosk(config, image)?;
            kiosk.open_registration();
            kiosk.register_face(&passkey, &name, &employee_id).await;
            finish(&kiosk)
        }

        Commands::Records {
            passkey,
            range,
            search,
            export,
        } => {
            let kiosk = build_kiosk(config, None)?;
            kiosk.open_attendance();
            kiosk.load_attendance(&passkey).await;
            if kiosk.presenter().current().kind == StatusKind::Error {
                return finish(&kiosk);
            }

            let dashboard = kiosk.admin_dashboard(range).await;
            let view = match search {
                Some(term) => kiosk.search_records(&term).await,
                None => dashboard.view.clone(),
            };

            if json {
                print_json(&serde_json::json!({
                    "provenance": dashboard.provenance,
                    "stats": dashboard.stats,
                    "view": view,
                }))?;
            } else {
                println!("{}", dashboard.stats);
                print_view(&view);
            }

            if export {
                kiosk.export_all().await;
            }
            finish(&kiosk)
        }

        Commands::Mine {
            employee_id,
            range,
            export,
        } => {
            let kiosk = build_kiosk(config, None)?;
            kiosk.open_my_attendance().await;
            kiosk.load_my_attendance(&employee_id).await;

            if let Some(dashboard) = kiosk.personal_dashboard(range).await {
                if json {
                    print_json(&dashboard)?;
                } else {
                    println!("{}", dashboard.title);
                    println!("Last updated: {}", dashboard.last_updated);
                    println!(
                        "Total days: {}  This month: {}  Avg check-in: {}  Attendance rate: {}",
                        dashboard.stats.total_days,
                        dashboard.stats.this_month_days,
                        dashboard.stats.avg_check_in(),
                        dashboard.stats.attendance_rate_label()
                    );
                    print_view(&dashboard.view);
                }

                if export {
                    kiosk.export_personal().await;
                }
            }
            finish(&kiosk)
        }

        Commands::Settings { action } => {
            let mut store = FileStore::open(&config.settings.path)?;
            let mut settings = Settings::load(&store);

            match action {
                SettingsCommand::Get { key: Some(key) } => {
                    println!("{}", settings.get(&key)?);
                }
                SettingsCommand::Get { key: None } => {
                    if json {
                        print_json(&settings)?;
                    } else {
                        for key in KEYS {
                            println!("{:<16} {}", key, settings.get(key)?);
                        }
                    }
                }
                SettingsCommand::Set { key, value } => {
                    settings.apply(&key, &value)?;
                    settings.save(&mut store)?;
                    println!("{} = {}", key, settings.get(&key)?);
                    tracing::info!("Preferences written to {}", store.path().display());
                }
            }
            Ok(())
        }

        Commands::Config { output } => {
            let config = facecheck::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
            Ok(())
        }
    }
}

/// A kiosk without sound, reading frames from `image` or the configured device
fn build_kiosk(config: Config, image: Option<PathBuf>) -> anyhow::Result<Kiosk> {
    let client = Arc::new(AttendanceClient::new(&config.api)?);
    let store: Box<dyn PreferenceStore> = Box::new(FileStore::open(&config.settings.path)?);
    let device = image.unwrap_or_else(|| PathBuf::from(&config.camera.device));

    let mut kiosk = Kiosk::new(config, client, store, Some(Box::new(Silent)));
    kiosk.attach_camera(Box::new(FileSource::new(device)));
    Ok(kiosk)
}

/// Print the final status and fail on errors
fn finish(kiosk: &Kiosk) -> anyhow::Result<()> {
    let status = kiosk.presenter().current();
    match status.kind {
        StatusKind::Error => {
            eprintln!("{}", status.message);
            std::process::exit(1);
        }
        _ => println!("{}", status.message),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
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

    println!("  {:<28} {:<24} {:>10}  {}", "Record", "Time", "Confidence", "Status");
    println!("  {}", "-".repeat(72));
    for row in &list.rows {
        println!(
            "  {:<28} {:<24} {:>10}  {}",
            row.title, row.time, row.confidence, row.status
        );
    }
    println!("  {}", list.count_label);
}
