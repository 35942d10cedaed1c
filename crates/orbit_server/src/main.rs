use clap::Parser;
use orbit_server::config::ServerConfig;

#[actix_web::main]
async fn main() {
    let config = ServerConfig::parse();
    if let Err(err) = orbit_server::run(config).await {
        log::error!("event=server_exit module=startup status=error error={err}");
        eprintln!("orbit: {err}");
        std::process::exit(1);
    }
}
