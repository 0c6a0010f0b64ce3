use aws_sdk_s3 as s3;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use trimbox::BbxQueue;

mod app;
mod app_error;
mod bbx_result;
mod image_access;
mod image_router;
mod settings;
mod state;

use crate::image_access::AwsImageAccess;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match settings::Settings::new() {
        Ok(settings) => {
            tracing::info!("starting with config | {:?}", settings);
            settings
        }
        Err(err) => {
            tracing::error!("couldn't load config: {:?}", err);
            return Err(err.into());
        }
    };

    let _sentry_guard = config.sentry.as_ref().map(|sentry_config| {
        sentry::init((
            sentry_config.dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(format!("{}", config.env).into()),
                ..Default::default()
            },
        ))
    });

    let aws_configuration: aws_config::SdkConfig = aws_config::load_from_env().await;
    let s3_client: s3::Client = s3::Client::new(&aws_configuration);

    let queue = BbxQueue::new(config.worker.concurrency);
    tracing::info!(concurrency = queue.concurrency(), "bbx queue ready");

    let routes = app::create_app(config.img_sources, AwsImageAccess { s3_client }, queue);

    let addr: SocketAddr = format!("[::]:{}", config.server.port).parse()?;
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes).await?;
    Ok(())
}
