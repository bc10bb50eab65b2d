use lookout::errors::LookoutError;
use tracing::error;

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,teloxide=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = lookout::cli::run().await {
        match e.downcast_ref::<LookoutError>() {
            Some(fatal) if fatal.is_fatal() => error!("stopping: {}", fatal),
            _ => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}
