//! BI Tool CLI
//!
//! Command-line client for the BI Tool:
//! - Log in, register and log out against the credential service
//! - Keep a session open with idle auto-logout
//! - Render the "New Users" table, or any CSV, with filters and paging
//! - Generate a default config file

use anyhow::{bail, Context};
use bi_tool::config::{self, Config};
use bi_tool::credentials::HttpCredentialService;
use bi_tool::dashboard;
use bi_tool::session::{Destination, FileStore, SessionManager, TokioScheduler};
use bi_tool::table::{Align, CellValue, Column, Record, TableBody, TableEngine, TableRow};
use bi_tool::validation::{LoginForm, RegisterForm, ValidationErrors};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

/// Rows-per-page choices for CSV tables, first one is the default
const CSV_PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];

type CliSession = SessionManager<FileStore, HttpCredentialService, TokioScheduler>;

#[derive(Parser)]
#[command(name = "bi-tool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "BI Tool command-line client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Credential service URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: searched in the config dir, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session without an idle timeout
        #[arg(long)]
        keep_logged_in: bool,
    },

    /// Create an account and log into it
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Hold the session open; every stdin line counts as activity
    Watch,

    /// Render a table through the filter/pagination engine
    Table {
        /// CSV file to load (default: the bundled "New Users" table)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Filter in COLUMN=VALUE form, repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }

    bi_tool::telemetry::init_tracing(&config.logging)
        .context("Failed to install tracing subscriber")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(cli.command, config))
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            email,
            password,
            keep_logged_in,
        } => {
            let form = LoginForm {
                email,
                password,
                keep_logged_in,
            };
            form.validate().map_err(invalid_form)?;

            let session = open_session(&config)?;
            if !session
                .login(&form.email, &form.password, form.keep_logged_in)
                .await
            {
                bail!("Login failed: Invalid email or password.");
            }
            print_user(&session);
        }

        Commands::Register {
            full_name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                full_name,
                email,
                password,
                confirm_password,
            };
            form.validate().map_err(invalid_form)?;

            let session = open_session(&config)?;
            if !session
                .register(&form.email, &form.password, &form.full_name)
                .await
            {
                bail!("Registration failed. This email might already be in use.");
            }
            println!("Registration successful!");
            print_user(&session);
        }

        Commands::Logout => {
            let session = open_session(&config)?;
            let was_logged_in = session.user().is_some();
            session.logout();
            if was_logged_in {
                println!("Logged out.");
            } else {
                println!("Not logged in.");
            }
        }

        Commands::Whoami => {
            let session = open_session(&config)?;
            print_user(&session);
        }

        Commands::Watch => {
            let session = open_session(&config)?;
            watch(&session, &config).await?;
        }

        Commands::Table {
            csv,
            filters,
            page,
            page_size,
        } => {
            let filters = parse_filters(&filters)?;
            match csv {
                Some(path) => {
                    let (rows, columns) = load_csv(&path)?;
                    let size = page_size.unwrap_or(CSV_PAGE_SIZE_OPTIONS[0]);
                    let engine = TableEngine::new(rows, columns, size)
                        .with_page_size_options(CSV_PAGE_SIZE_OPTIONS.to_vec());
                    render_table(engine, &filters, page)?;
                }
                None => {
                    let mut engine = dashboard::new_users_table();
                    if let Some(size) = page_size {
                        engine.set_page_size(size);
                    }
                    println!("{}", dashboard::NEW_USERS_TITLE);
                    render_table(engine, &filters, page)?;
                }
            }
        }

        Commands::Config { output } => {
            let content = config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

fn open_session(config: &Config) -> anyhow::Result<CliSession> {
    let credentials = HttpCredentialService::new(config.client.credential_config())
        .context("Failed to create credential client")?;
    let store = FileStore::new(config.session.storage_file());

    let session = SessionManager::new(
        store,
        credentials,
        TokioScheduler::new(),
        |to: Destination| tracing::debug!(path = to.path(), "Navigate"),
        config.session.session_config(),
    );
    session.initialize();
    Ok(session)
}

fn invalid_form(errors: ValidationErrors) -> anyhow::Error {
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field.as_str(), message);
    }
    anyhow::anyhow!("Invalid input")
}

fn print_user(session: &CliSession) {
    match session.user() {
        Some(user) => {
            println!("Logged in as {} <{}>", user.full_name, user.email);
            if let Some(id) = &user.id {
                println!("  id: {}", id);
            }
            if session.keep_logged_in() {
                println!("  kept logged in");
            } else {
                println!(
                    "  idle timeout: {}s",
                    session.config().idle_timeout.as_secs()
                );
            }
        }
        None => println!("Not logged in."),
    }
}

async fn watch(session: &CliSession, config: &Config) -> anyhow::Result<()> {
    let Some(user) = session.user() else {
        bail!("Not logged in. Run `bi-tool login` first.");
    };

    let expired = Rc::new(Notify::new());
    let signal = Rc::clone(&expired);
    let listener = session.subscribe(move |snapshot| {
        if snapshot.user.is_none() {
            signal.notify_one();
        }
    });

    if session.keep_logged_in() {
        println!("Watching session for {} (kept logged in). Ctrl+D to stop.", user.email);
    } else {
        println!(
            "Watching session for {}. Logs out after {}s without input.",
            user.email, config.session.idle_timeout_secs
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = expired.notified() => {
                println!("Session expired after inactivity.");
                break;
            }
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(_) => session.record_activity(),
                None => break,
            },
        }
    }

    session.unsubscribe(listener);
    session.teardown();
    Ok(())
}

fn parse_filters(raw: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    raw.iter()
        .map(|f| match f.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => {
                Ok((column.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("Invalid filter {:?}, expected COLUMN=VALUE", f),
        })
        .collect()
}

fn load_csv(path: &Path) -> anyhow::Result<(Vec<Record>, Vec<Column>)> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV row {}", line + 2))?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(h, raw)| (h.clone(), CellValue::parse(raw)))
            .collect();
        rows.push(row);
    }

    let columns = headers
        .iter()
        .map(|h| {
            let numeric = !rows.is_empty() && rows.iter().all(|r| r.cell(h).is_number());
            let column = Column::new(h.clone(), h.clone());
            if numeric {
                column.align(Align::Right)
            } else {
                column
            }
        })
        .collect();

    Ok((rows, columns))
}

fn render_table<R: TableRow>(
    mut engine: TableEngine<R>,
    filters: &[(String, String)],
    page: usize,
) -> anyhow::Result<()> {
    if !filters.is_empty() {
        engine.open_filter_editor();
        for (column, value) in filters {
            if !engine.columns().iter().any(|c| &c.id == column) {
                bail!("Unknown column {:?}", column);
            }
            engine.toggle_filter_value(column, value, true);
        }
        engine.apply_filters();
    }
    engine.set_page(page.saturating_sub(1));

    let chips = engine.active_chips();
    if !chips.is_empty() {
        let labels: Vec<&str> = chips.iter().map(|c| c.label.as_str()).collect();
        println!("Filters: {}", labels.join(", "));
    }

    let body = engine.body();
    let columns = engine.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.label.chars().count()).collect();
    if let TableBody::Rows(rows) = &body {
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.label, *w, c.align))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    match &body {
        TableBody::Rows(rows) => {
            for row in rows {
                let cells: Vec<String> = row
                    .iter()
                    .zip(columns.iter().zip(&widths))
                    .map(|(cell, (c, w))| pad(cell, *w, c.align))
                    .collect();
                println!("{}", cells.join("  "));
            }
        }
        TableBody::Empty { message, .. } => println!("{}", message),
    }

    println!();
    let options: Vec<String> = engine
        .page_size_options()
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!(
        "Rows per page: {} (of {})    {}",
        engine.page_size(),
        options.join("/"),
        engine.range_label()
    );
    Ok(())
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text, width = width),
        Align::Center => format!("{:^width$}", text, width = width),
        Align::Right => format!("{:>width$}", text, width = width),
    }
}
