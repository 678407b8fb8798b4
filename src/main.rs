use std::net::SocketAddr;

use category_rush::config::Config;
use category_rush::startup;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    std_logger::Config::logfmt().init();

    let config = Config::get().expect("Unable to read the configuration.");
    let address: SocketAddr = format!("{}:{}", config.application.host, config.application.port)
        .parse()
        .expect("Invalid host or port in the configuration.");
    let listener = TcpListener::bind(address)
        .await
        .expect("Failed to bind the configured address.");

    let server =
        startup::create_web_server(config, listener).expect("Failed to create the web server.");
    if let Err(error) = server.await {
        log::error!("The web server stopped. Error: '{error}'.");
    }
}
