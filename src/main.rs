use std::sync::Arc;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use inventory_console::config::ConsoleConfig;
use inventory_console::gateway::{HttpInventoryGateway, InventoryGateway};
use inventory_console::routes;
use inventory_console::services::console::Console;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret_key {
        Some(key) => match Key::try_from(key.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("Unusable SECRET_KEY: {e}");
                std::process::exit(1);
            }
        },
        None => Key::generate(),
    };

    let gateway: Arc<dyn InventoryGateway> =
        match HttpInventoryGateway::new(&config.inventory_service_url) {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                log::error!("Failed to create inventory gateway: {e}");
                std::process::exit(1);
            }
        };
    let gateway = web::Data::from(gateway);
    let console = web::Data::new(Console::new());
    let options = web::Data::new(config.dispatch_options());

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new(&config.templates_glob) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Inventory console for {} listening on {}:{} (product ids: {})",
        config.inventory_service_url,
        config.address,
        config.port,
        config.product_ids
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(gateway.clone())
            .app_data(console.clone())
            .app_data(options.clone())
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}
