use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use matterbook_api::database::manager::DatabaseManager;
use matterbook_api::handlers::{app, AppState};

#[derive(Parser)]
#[command(name = "matterbook-api")]
#[command(about = "Legal practice management API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP API server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides MATTERBOOK_PORT/PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Insert demo firm, customers and matters for local development")]
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = matterbook_api::config::config();
    tracing::info!("Starting Matterbook API in {:?} mode", config.environment);

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(port).await,
        Commands::Seed => seed().await,
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;
    DatabaseManager::migrate().await?;

    let app = app(pool);

    // Allow tests or deployments to override port via env
    let port = port
        .or_else(|| env_port("MATTERBOOK_PORT"))
        .or_else(|| env_port("PORT"))
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Matterbook API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn env_port(var: &str) -> Option<u16> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

async fn seed() -> anyhow::Result<()> {
    use matterbook_api::services::auth_service::{AuthError, SignupRequest};
    use matterbook_api::services::customer_service::CreateCustomerRequest;
    use matterbook_api::services::matter_service::CreateMatterRequest;

    let pool = DatabaseManager::pool().await?;
    DatabaseManager::migrate().await?;
    let state = AppState::new(pool);

    let signed_up = match state
        .auth
        .signup(SignupRequest {
            email: "admin@lawfirm.com".to_string(),
            password: "password123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            firm_name: "Doe & Associates Law Firm".to_string(),
        })
        .await
    {
        Ok(response) => response,
        Err(AuthError::EmailTaken) => {
            tracing::info!("Seed user already present, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let owner_id = signed_up.user.id;

    let jane = state
        .customers
        .create(
            owner_id,
            CreateCustomerRequest {
                name: "Jane Smith".to_string(),
                phone_number: "555-0123".to_string(),
                email: Some("jane.smith@email.com".to_string()),
                address: Some("123 Main St, City, State 12345".to_string()),
                notes: None,
                password: None,
                enable_portal_access: false,
            },
        )
        .await?;

    let robert = state
        .customers
        .create(
            owner_id,
            CreateCustomerRequest {
                name: "Robert Johnson".to_string(),
                phone_number: "555-0456".to_string(),
                email: Some("robert.j@email.com".to_string()),
                address: Some("456 Oak Ave, City, State 12345".to_string()),
                notes: None,
                password: None,
                enable_portal_access: false,
            },
        )
        .await?;

    state
        .matters
        .create(
            jane.id,
            owner_id,
            CreateMatterRequest {
                name: "Divorce Proceedings".to_string(),
                description: "Contested divorce case with child custody issues".to_string(),
                case_type: Some("Family Law".to_string()),
                status: "Active".to_string(),
                start_date: Some(chrono::Utc::now()),
            },
        )
        .await?;

    state
        .matters
        .create(
            robert.id,
            owner_id,
            CreateMatterRequest {
                name: "Contract Dispute".to_string(),
                description: "Business contract breach case".to_string(),
                case_type: Some("Business Law".to_string()),
                status: "Active".to_string(),
                start_date: Some(chrono::Utc::now()),
            },
        )
        .await?;

    tracing::info!("Seeded demo firm user admin@lawfirm.com with 2 customers and 2 matters");
    Ok(())
}
