use clap::ArgMatches;
use server::ServerConfig;

pub async fn run(matches: &ArgMatches) {
    let mut config = ServerConfig::from_env();
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(dir) = matches.get_one::<String>("dir") {
        config.data_dir = dir.into();
    }
    if let Some(assets) = matches.get_one::<String>("assets") {
        config.public_dir = assets.into();
    }
    server::run(config).await;
}
