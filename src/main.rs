use picsync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting PicSync");

    // Load configuration
    let config = startup::load_config()?;

    // Start the server
    startup::serve(config).await
}
