//! Elidune Administration Console - CLI
//!
//! Command-line front end over the console core: sign in, inspect the
//! permission-filtered menu, and run the CRUD workflows of any resource
//! page against the remote API.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_admin::crud::{CrudPage, Dialog, FormValues, NoticeKind};
use elidune_admin::models::auth::{LoginInput, RegisterInput};
use elidune_admin::nav::NavItem;
use elidune_admin::pages;
use elidune_admin::{AdminApp, AppConfig};

/// Elidune administration console
#[derive(Parser, Debug)]
#[command(name = "elidune-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session tokens
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new reader account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Notify the server and clear the persisted session
    Logout,
    /// Show the signed-in principal
    Whoami,
    /// Show the menu entries visible to the signed-in principal
    Nav,
    /// List a resource page (e.g. `list books --filter title=Dune`)
    List {
        resource: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
        /// Filter values, `field=value`, repeatable
        #[arg(long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,
    },
    /// Create a record (e.g. `create authors --set name=Ada`)
    Create {
        resource: String,
        /// Form values, `field=value`, repeatable
        #[arg(long = "set", value_parser = parse_pair)]
        sets: Vec<(String, String)>,
    },
    /// Update a record by id
    Update {
        resource: String,
        id: i64,
        #[arg(long = "set", value_parser = parse_pair)]
        sets: Vec<(String, String)>,
    },
    /// Delete records by id (requires --yes to dispatch)
    Delete {
        resource: String,
        ids: Vec<i64>,
        #[arg(long)]
        yes: bool,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))
}

/// `--set price=12.5` becomes a number, `--set authorIds=[1,2]` an array,
/// anything that is not valid JSON stays a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn to_values(pairs: &[(String, String)]) -> FormValues {
    pairs
        .iter()
        .map(|(key, value)| (key.clone(), parse_value(value)))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let level = if cli.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_admin={}", level).into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut app = AdminApp::new(config)?;

    match cli.command {
        Command::Login { name, password } => {
            let principal = app.sign_in(LoginInput { name, password }).await?;
            println!(
                "Signed in as {} ({} permissions)",
                principal.name,
                principal.permissions.len()
            );
        }
        Command::Register {
            name,
            password,
            email,
        } => {
            let created = app
                .session()
                .register(RegisterInput {
                    name,
                    email,
                    password,
                    full_name: None,
                })
                .await?;
            println!("Account '{}' created, you can sign in now", created.name);
        }
        Command::Logout => {
            app.sign_out().await;
            println!("Signed out");
        }
        Command::Whoami => {
            let principal = app.restore().await?;
            println!("{} (id {})", principal.name, principal.id);
            let mut codes: Vec<_> = principal
                .permissions
                .iter()
                .map(|code| code.as_str().to_string())
                .collect();
            codes.sort();
            for code in codes {
                println!("  {}", code);
            }
        }
        Command::Nav => {
            app.restore().await?;
            for item in app.nav().visible() {
                match item {
                    NavItem::Leaf { title, route, .. } => println!("{}  ->  {}", title, route),
                    NavItem::Group {
                        title, children, ..
                    } => {
                        println!("{}", title);
                        for child in children {
                            if let NavItem::Leaf { title, route, .. } = child {
                                println!("  {}  ->  {}", title, route);
                            }
                        }
                    }
                }
            }
        }
        Command::List {
            resource,
            page,
            filters,
        } => {
            let crud = open(&mut app, &resource).await?;
            crud.apply_filter(to_values(&filters)).await?;
            if page > 1 {
                crud.set_page(page).await?;
            }
            report(&crud);
            print_table(&crud);
        }
        Command::Create { resource, sets } => {
            let crud = open(&mut app, &resource).await?;
            crud.open_create();
            for (key, value) in &sets {
                crud.set_field(key, parse_value(value));
            }
            crud.submit().await?;
            finish_dialog(&crud)?;
        }
        Command::Update { resource, id, sets } => {
            let crud = open(&mut app, &resource).await?;
            crud.load().await?;
            crud.open_update(id);
            if matches!(crud.dialog(), Dialog::None) {
                report(&crud);
                bail!("record {} not found on the current page", id);
            }
            for (key, value) in &sets {
                crud.set_field(key, parse_value(value));
            }
            crud.submit().await?;
            finish_dialog(&crud)?;
        }
        Command::Delete { resource, ids, yes } => {
            if ids.is_empty() {
                bail!("no ids given");
            }
            let crud = open(&mut app, &resource).await?;
            crud.load().await?;
            if ids.len() == 1 {
                crud.request_delete(ids[0]);
            } else {
                for id in &ids {
                    crud.toggle_select(*id);
                }
                crud.request_delete_selected();
            }
            if !yes {
                crud.cancel_delete();
                bail!("refusing to delete without --yes");
            }
            crud.confirm_delete().await?;
            report(&crud);
        }
    }

    // Session-fatal outcomes redirect to the login entry point.
    if let Some(target) = app.poll_session() {
        tracing::info!("session ended, continue at {}", target);
    }

    Ok(())
}

/// Resolve a resource name, hydrate the session and build its page.
async fn open(app: &mut AdminApp, resource: &str) -> anyhow::Result<CrudPage> {
    let route = pages::route_for(resource)
        .with_context(|| format!("unknown resource '{}'", resource))?;
    app.restore().await.context("sign in first (login)")?;
    app.navigate(route);
    app.open_page(route)
        .await?
        .with_context(|| format!("no page configured for '{}'", resource))
}

/// Print the engine's pending notice, failing on error notices.
fn finish_dialog(crud: &CrudPage) -> anyhow::Result<()> {
    match crud.dialog() {
        Dialog::Create { errors, .. } | Dialog::Update { errors, .. } => {
            for error in &errors {
                eprintln!("  {}", error);
            }
            if let Some(notice) = crud.take_notice() {
                bail!("{}", notice.message);
            }
            bail!("validation failed");
        }
        _ => {
            report(crud);
            Ok(())
        }
    }
}

fn report(crud: &CrudPage) {
    if let Some(notice) = crud.take_notice() {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Error => eprintln!("error: {}", notice.message),
        }
    }
}

fn print_table(crud: &CrudPage) {
    let headers: Vec<&str> = crud.config.columns.iter().map(|c| c.header).collect();
    println!("{}", headers.join(" | "));
    for row in crud.rows() {
        let cells: Vec<String> = crud
            .config
            .columns
            .iter()
            .map(|column| column.render(&row))
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!(
        "page {}: {} of {} records",
        crud.page(),
        crud.rows().len(),
        crud.total()
    );
}
