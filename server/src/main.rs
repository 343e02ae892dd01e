mod error;
mod handlers;
mod reports;
mod routes;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use common::config::AppConfig;
use db::DbRegistry;

#[derive(Parser, Clone)]
#[command(name = "category-labels")]
pub struct Args {
    #[arg(long, default_value = "8081")]
    pub port: u16,

    /// TOML config file; a missing file means defaults.
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Directory holding the log databases.
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Log database file inside the data directory.
    #[arg(long)]
    pub db: Option<String>,

    #[arg(long)]
    pub bind: Option<String>,

    /// Base URL of a label service.
    #[arg(long)]
    pub resolver_url: Option<String>,

    /// JSON file mapping titles to labels.
    #[arg(long)]
    pub resolver_table: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(db) = &self.db {
            config.default_db = db.clone();
        }
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(url) = &self.resolver_url {
            config.resolver.url = Some(url.clone());
        }
        if let Some(table) = &self.resolver_table {
            config.resolver.table = Some(table.clone());
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load(&args.config)?;
    args.apply(&mut config);

    let registry = DbRegistry::new(&config.data_dir, &config.default_db);
    // Create the default database up front so startup fails on a bad path.
    registry.default_pool().await?;
    let resolver = resolver::build_resolver(&config.resolver)?.map(web::Data::from);

    log::info!(
        "Category labels listening on http://{}:{} (data dir {}, database {})",
        config.bind,
        args.port,
        config.data_dir,
        config.default_db
    );

    let registry_data = web::Data::new(registry);

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(registry_data.clone());
        if let Some(resolver) = &resolver {
            app = app.app_data(resolver.clone());
        }
        app.configure(routes::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.bind.as_str(), args.port))?
    .run()
    .await?;

    Ok(())
}
