use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use log::info;

use stress_score_service::{routes, ModelState, ServiceConfig};

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::locate().context("cannot resolve the service location")?;
    let state = web::Data::new(ModelState::load(config.model_path()));

    let addr = config.bind_addr();
    info!("starting stress score service at {addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(&addr)
    .with_context(|| format!("cannot bind {addr}"))?
    .run()
    .await?;

    info!("server stopped");
    Ok(())
}
