use dotenvy::dotenv;
use replica_catalog::{
    config::{
        database::{create_connection, create_tables},
        settings::{CatalogMode, Settings},
    },
    core::{admin::seed_admins, catalog::Catalog},
    errors::Result,
    store::{CatalogStore, DatabaseProductStore, StaticProductStore},
    web::{self, AppState},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Settings
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!("Starting catalog in {} mode", settings.mode);

    // 4. Product store
    let (store, database) = match settings.mode {
        CatalogMode::Static => {
            let locations = settings.catalog.snapshot_locations();
            info!("Serving static snapshot from {} location(s)", locations.len());
            (
                CatalogStore::Static(StaticProductStore::new(locations)),
                None,
            )
        }
        CatalogMode::Live => {
            let db = create_connection(&settings.database_url)
                .await
                .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
            create_tables(&db).await?;

            let seeded = seed_admins(&db, &settings.admins).await?;
            if seeded > 0 {
                info!("Seeded {} admin(s) from config", seeded);
            }
            if settings.admins.is_empty() {
                warn!("No [[admins]] in config; only existing admin rows can log in");
            }

            let db = Arc::new(db);
            (
                CatalogStore::Database(DatabaseProductStore::new(Arc::clone(&db))),
                Some(db),
            )
        }
    };

    // 5. Serve
    let catalog = Catalog::new(store, settings.catalog.promotions());
    let state = AppState::new(catalog, database, settings.catalog.default_page_size);
    #[cfg(unix)]
    web::reload_on_hangup(Arc::clone(&state.catalog));
    let app = web::router(state, Some(settings.assets_dir.as_path()));

    web::serve(app, &settings.bind_address).await
}
