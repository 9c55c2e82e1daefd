use std::{env, sync::Arc};

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tpc_portal::api::{auth, faculty, students};
use tpc_portal::listing::{self, PagerItem, SessionSource};
use tpc_portal::{ClientConfig, FileSessionStore, PortalClient, TracingNotifier};

const STUDENT_SEARCH_FIELDS: [&str; 3] = ["name", "branch", "scholarNumber"];
const ITEMS_PER_PAGE: usize = 10;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        error!(?err, "command failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");
    let client = build_client()?;

    match command {
        "login" => {
            let email = args.get(1).context("usage: login <email> <password>")?;
            let password = args.get(2).context("usage: login <email> <password>")?;
            let credentials = auth::login(&client, email, password).await?;
            println!(
                "Logged in as {} ({})",
                credentials
                    .user
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(email),
                credentials.role().unwrap_or("unknown role"),
            );
        }
        "logout" => {
            auth::logout(&client).await;
            println!("Logged out.");
        }
        "sessions" => {
            let (students_resp, faculty_resp) =
                tokio::try_join!(students::list(&client), faculty::list(&client))?;
            let student_data = data_of(&students_resp);
            let faculty_data = data_of(&faculty_resp);
            let sessions = listing::extract_sessions_from_sources(&[
                SessionSource {
                    records: listing::records(&student_data),
                    session_field: "session",
                },
                SessionSource {
                    records: listing::records(&faculty_data),
                    session_field: "session",
                },
            ]);
            for session in sessions {
                println!("{session}");
            }
        }
        "students" => {
            let session = flag_value(&args, "--session").unwrap_or_default();
            let search = flag_value(&args, "--search").unwrap_or_default();
            let page: usize = flag_value(&args, "--page")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(1);

            let response = students::list(&client).await?;
            let data = data_of(&response);
            let filtered = listing::filter_and_search(
                listing::records(&data),
                session,
                search,
                &STUDENT_SEARCH_FIELDS,
                "session",
            );

            let slice = listing::paginate(&filtered, page, ITEMS_PER_PAGE);
            for record in &slice.items {
                println!(
                    "{:<12} {:<28} {}",
                    record
                        .get("scholarNumber")
                        .map(Value::to_string)
                        .unwrap_or_default(),
                    record.get("name").and_then(Value::as_str).unwrap_or("-"),
                    record.get("branch").and_then(Value::as_str).unwrap_or("-"),
                );
            }
            println!(
                "\n{} of {} record(s), page {}/{}",
                slice.items.len(),
                filtered.len(),
                page,
                slice.total_pages.max(1),
            );
            if slice.total_pages > 1 {
                println!("{}", render_pager(&listing::pagination_buttons(page, slice.total_pages)));
            }
        }
        "help" => print_help(),
        other => {
            print_help();
            bail!("unknown command: {other}");
        }
    }

    Ok(())
}

fn build_client() -> Result<PortalClient> {
    let session_file = env::var("PORTAL_SESSION_FILE")
        .unwrap_or_else(|_| ".tpc-portal-session.json".to_string());
    let store = Arc::new(FileSessionStore::new(session_file));
    let client = PortalClient::new(ClientConfig::from_env(), store, Arc::new(TracingNotifier))?;
    Ok(client)
}

/// Unwrap the `{ "data": ... }` envelope, tolerating bare payloads.
fn data_of(response: &Value) -> Value {
    response.get("data").cloned().unwrap_or_else(|| response.clone())
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn render_pager(items: &[PagerItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            PagerItem::Button { label, current: true, .. } => format!("[{label}]"),
            PagerItem::Button { label, disabled: true, .. } => format!("({label})"),
            PagerItem::Button { label, .. } => label.clone(),
            PagerItem::Ellipsis { .. } => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_help() {
    println!("tpc-portal commands:");
    println!("  login <email> <password>    authenticate and store the session");
    println!("  logout                      end the session");
    println!("  sessions                    list known academic sessions");
    println!("  students [--session S] [--search Q] [--page N]");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
