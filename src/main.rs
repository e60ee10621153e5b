use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use tracing::info;

use catalog_manager::{handlers, logging, AppState, Settings};

fn io_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(io_error)?;
    logging::init(&settings.log.level);

    let app_state = web::Data::new(AppState::new(settings).map_err(io_error)?);
    app_state.load_initial().await;

    let (host, port) = app_state.settings.bind_address();
    info!(remote = %app_state.remote.base_url(), "Starting HTTP server on http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
