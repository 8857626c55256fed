//! firewatch CLI — run the consumer service and poke at queues and records.

use clap::{Parser, Subcommand};
use firewatch::config::Config;
use firewatch::consumer::{DispatchConfig, Dispatcher, EXTINGUISH_QUEUE, REGISTER_QUEUE};
use firewatch::db::Db;
use firewatch::model::Status;
use firewatch::telemetry::{TelemetryConfig, init_telemetry};
use secrecy::ExposeSecret;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "firewatch", about = "Queue-fed emergency incident registry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the consumer service
    Serve {
        /// Poll interval in seconds (fallback when no NOTIFY arrives)
        #[arg(long, default_value_t = 5)]
        poll_interval: u64,
        /// pgmq visibility timeout in seconds
        #[arg(long, default_value_t = 30)]
        visibility_timeout: i32,
    },
    /// Emergency operations
    Emergency {
        #[command(subcommand)]
        action: EmergencyAction,
    },
}

#[derive(Subcommand)]
enum EmergencyAction {
    /// Publish a registration event
    Report {
        /// Emergency identifier
        id: String,
        /// Additional domain fields as a JSON object
        #[arg(long)]
        json: Option<String>,
    },
    /// Publish an extinguish event
    Extinguish {
        /// Emergency identifier
        id: String,
    },
    /// Show a stored record
    Show {
        /// Emergency identifier
        id: String,
    },
    /// List stored records
    List {
        /// Filter by status ("active" | "extinguished")
        #[arg(long)]
        status: Option<String>,
        /// Maximum records to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            poll_interval,
            visibility_timeout,
        } => cmd_serve(poll_interval, visibility_timeout).await,
        Command::Emergency { action } => {
            let config = Config::from_env()?;
            let db = Db::connect(config.database_url.expose_secret()).await?;
            db.migrate().await?;
            db.declare_queue(REGISTER_QUEUE).await?;
            db.declare_queue(EXTINGUISH_QUEUE).await?;

            match action {
                EmergencyAction::Report { id, json } => cmd_report(&db, id, json).await,
                EmergencyAction::Extinguish { id } => cmd_extinguish(&db, id).await,
                EmergencyAction::Show { id } => cmd_show(&db, id).await,
                EmergencyAction::List { status, limit } => cmd_list(&db, status, limit).await,
            }
        }
    }
}

async fn cmd_serve(poll_interval: u64, visibility_timeout: i32) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "firewatch".to_string(),
    })?;

    let db = Db::connect(config.database_url.expose_secret()).await?;
    db.migrate().await?;
    db.declare_queue(REGISTER_QUEUE).await?;
    db.declare_queue(EXTINGUISH_QUEUE).await?;

    let dispatcher = Dispatcher::new(
        Arc::new(db),
        DispatchConfig {
            visibility_timeout,
            poll_interval: std::time::Duration::from_secs(poll_interval),
        },
    );

    let d = dispatcher.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        d.shutdown();
    });

    dispatcher.run().await?;
    Ok(())
}

async fn cmd_report(db: &Db, id: String, json: Option<String>) -> anyhow::Result<()> {
    let mut payload = match json {
        Some(text) => match serde_json::from_str(&text)? {
            serde_json::Value::Object(map) => map,
            _ => anyhow::bail!("--json must be a JSON object"),
        },
        None => serde_json::Map::new(),
    };
    payload.insert("emergency_id".to_string(), serde_json::json!(id));

    let msg_id = db
        .publish(REGISTER_QUEUE, &serde_json::Value::Object(payload))
        .await?;
    println!("Reported {id} (msg {msg_id})");
    Ok(())
}

async fn cmd_extinguish(db: &Db, id: String) -> anyhow::Result<()> {
    let msg_id = db
        .publish(EXTINGUISH_QUEUE, &serde_json::json!({"emergency_id": id}))
        .await?;
    println!("Extinguish sent for {id} (msg {msg_id})");
    Ok(())
}

async fn cmd_show(db: &Db, id: String) -> anyhow::Result<()> {
    let record = db.get_emergency(&id).await?;

    println!("ID:       {}", record.emergency_id);
    println!("Status:   {}", record.status);
    println!(
        "Details:  {}",
        serde_json::to_string_pretty(&serde_json::Value::Object(record.details))?
    );
    println!("Created:  {}", record.created_at);
    println!("Updated:  {}", record.updated_at);
    Ok(())
}

async fn cmd_list(db: &Db, status: Option<String>, limit: i64) -> anyhow::Result<()> {
    let status_filter: Option<Status> = match status {
        Some(s) => Some(
            s.parse()
                .map_err(|_| anyhow::anyhow!("invalid status: {s}"))?,
        ),
        None => None,
    };

    let records = db.list_emergencies(status_filter, limit).await?;

    if records.is_empty() {
        println!("No emergencies found.");
        return Ok(());
    }

    println!("{:<24}  {:<12}  CREATED", "ID", "STATUS");
    println!("{}", "-".repeat(60));

    for record in &records {
        println!(
            "{:<24}  {:<12}  {}",
            record.emergency_id,
            record.status.to_string(),
            record.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!("\n{} record(s)", records.len());
    Ok(())
}
