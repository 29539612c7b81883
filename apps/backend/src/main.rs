use actix_web::{web, App, HttpServer};
use cobuy_backend::config::AppConfig;
use cobuy_backend::infra::state::StateBuilder;
use cobuy_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use cobuy_backend::{routes, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match StateBuilder::from_config(&config)
        .await
        .and_then(StateBuilder::build)
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        provisioning = ?config.magic_link.provisioning,
        "starting co-buy auth backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
