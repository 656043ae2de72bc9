use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use campus_match::config::{LoggingSettings, Settings};
use campus_match::core::MentorRanker;
use campus_match::routes::{self, AppState};
use campus_match::services::{GeminiClient, SupabaseClient};
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is not up yet, so configuration errors go to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging);

    info!("Starting CampusBuddy matching service...");

    let supabase = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.anon_key.clone(),
        settings.supabase.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create Supabase client: {}", e);
        Error::new(ErrorKind::Other, e)
    })?;

    info!("Supabase client initialized for {}", settings.supabase.url);

    let generator = GeminiClient::new(
        settings.gemini.endpoint.clone(),
        settings.gemini.api_key.clone(),
        settings.gemini.models.clone(),
        settings.gemini.options(),
        settings.gemini.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create Gemini client: {}", e);
        Error::new(ErrorKind::Other, e)
    })?;

    if generator.is_configured() {
        info!("Gemini client initialized with models: {:?}", generator.models());
    } else {
        warn!("GEMINI_API_KEY not set, chat requests will fail");
    }

    let weights = settings.scoring_weights();
    let ranker = MentorRanker::new(weights).with_input_clamping(settings.scoring.clamp_inputs);

    info!(
        "Ranker initialized with weights: {:?} (clamp inputs: {})",
        weights, settings.scoring.clamp_inputs
    );

    let app_state = AppState {
        supabase: Arc::new(supabase),
        generator: Arc::new(generator),
        ranker,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
