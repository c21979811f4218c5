use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    if let Err(err) = tabulador::interfaces::cli::run().await {
        error!(error = %err, "Run aborted");
        std::process::exit(1);
    }
}
