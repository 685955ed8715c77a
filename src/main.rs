use log::error;

use rill_ftp_server::config::ServerConfig;
use rill_ftp_server::server::Server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let server = Server::bind(config).await?;
    server.run().await;
    Ok(())
}
