use yellowcab::config::Config;
use yellowcab::engine::Engine;
use yellowcab::error::Error;
use yellowcab::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let engine = Engine::new(&config)?;

    serve(engine, config.listen_addr).await
}
