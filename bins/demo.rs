use std::collections::HashMap;
use std::io;

use dotenvy::dotenv;
use migration::MigratorTrait;
use store::{blob::BlobStore, inverted::InvertedStore};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(|| io::stdout())
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!(event = "start", version = env!("CARGO_PKG_VERSION"), "custom-values demo starting");

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Strategy one: the whole map in a single serialized column.
    let blob_store = BlobStore::new();
    let mut blob = blob_store.create(&HashMap::from([
        ("Name".to_string(), "Khalid".to_string()),
        ("Status".to_string(), "Awesome".to_string()),
    ]));
    blob_store.save(&db, &mut blob).await?;
    let latest = blob_store.load_latest(&db).await?;
    info!(id = latest.id, "latest blob record");
    println!("blob values: {}", serde_json::to_string_pretty(&latest.values)?);

    // Strategy two: one child row per key, upserted by name.
    let inverted_store = InvertedStore::new();
    let mut set = inverted_store.create();
    set.add_value("Name", "Khalid")
        .add_value("Status", "Awesome... Again!");
    inverted_store.save(&db, &mut set).await?;
    let latest = inverted_store.load_latest_with_values(&db, None).await?;
    info!(id = latest.id, rows = latest.values.len(), "latest value set");
    for row in &latest.values {
        println!("row #{}: {} = {}", row.id, row.name, row.value);
    }

    Ok(())
}
