use clap::Parser;
use quizroom::{LogFormat, QuizServer, QuizroomError, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), QuizroomError> {
    let config = ServerConfig::parse();
    init_tracing(config.log_format);

    let server = QuizServer::builder().config(&config).build().await?;
    server.run().await
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
