use actix_web::{dev::Service, web, App, HttpServer};
use std::io;
use std::time::Instant;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_recommender::artifacts::LoadedArtifacts;
use book_recommender::{configure, metrics, AppState, Config};

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},actix_web=info", config.log_level).into());

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("ERROR: Invalid configuration: {}", e);
        std::process::exit(1);
    }

    init_tracing(&config);

    info!(
        env = %config.app_env,
        "Starting book-recommender-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let artifacts = LoadedArtifacts::load(&config.artifact_paths());
    let state = AppState::build(
        artifacts,
        config.recommender_settings(),
        config.view_settings(),
    );

    let failures = state.failures();
    if failures.is_empty() {
        info!("All artifacts loaded");
    } else {
        for failure in &failures {
            warn!(artifact = failure.artifact, error = %failure.message, "Serving without artifact");
        }
    }

    let state = web::Data::new(state);
    let bind_address = config.bind_address();
    info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let route = metrics::route_label(&req);
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &route,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &route, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
