use crate::config::Config;
use crate::error::Error;
use crate::ocr::{OcrClient, VisionClient};
use crate::pipeline::EventPipeline;
use crate::refiner::Generator;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Create the OCR client; a missing or broken client is logged, not fatal
fn init_ocr(config: &Config) -> Option<Arc<dyn OcrClient>> {
    match VisionClient::from_config(config) {
        Ok(Some(client)) => {
            info!("Vision client initialized");
            Some(Arc::new(client))
        }
        Ok(None) => {
            warn!("GOOGLE_VISION_API_KEY not set, image processing is unavailable");
            None
        }
        Err(e) => {
            error!("Error initializing Vision client: {}", e);
            None
        }
    }
}

/// Create the generative model client if one is configured
fn init_generator(config: &Config) -> Option<Arc<dyn Generator>> {
    #[cfg(feature = "gemini")]
    {
        if let Some(gemini) = crate::refiner::GeminiGenerator::from_config(config) {
            return Some(Arc::new(gemini));
        }
    }

    info!(
        "No generative model configured, events use pattern extraction only (model {} skipped)",
        config.gemini_model
    );
    None
}

/// Build the pipeline from config, once per process
pub fn build_pipeline(config: &Config) -> EventPipeline {
    EventPipeline::new(
        init_ocr(config),
        init_generator(config),
        &config.default_timezone,
        config.upstream_timeout(),
    )
}

/// Bind and run the web server
#[cfg(feature = "web-interface")]
pub async fn serve(config: Config) -> miette::Result<()> {
    use crate::server::{router, AppState};

    let state = AppState {
        pipeline: Arc::new(build_pipeline(&config)),
    };
    let app = router(state, &config.static_dir, config.max_upload_bytes);

    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::from)?;
    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
