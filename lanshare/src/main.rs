use clap::{arg, command, crate_name, Command};
use client::{DownloadParams, UploadParams};

mod cli;

#[tokio::main]
async fn main() {
    let cli = command!(crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .subcommand(Command::new(cli::VERSION_SUBCOMMAND).about(cli::VERSION_DESCRIPTION))
        .subcommand(Command::new(cli::BUGREPORT_SUBCOMMAND).about(cli::BUGREPORT_DESCRIPTION))
        .subcommand(
            Command::new(cli::SERVER_SUBCOMMAND)
                .about(cli::SERVER_DESCRIPTION)
                .arg(
                    arg!(-p --port <PORT>)
                        .required(false)
                        .value_parser(clap::value_parser!(u16))
                        .help("Port to listen on (default 3000)"),
                )
                .arg(
                    arg!(-d --dir <DIR>)
                        .required(false)
                        .help("Directory holding the shared files (default ./uploads)"),
                )
                .arg(
                    arg!(-s --assets <ASSETS>)
                        .required(false)
                        .help("Static assets directory (default ./public)"),
                ),
        )
        .subcommand(
            Command::new(cli::UPLOAD_SUBCOMMAND)
                .about(cli::UPLOAD_DESCRIPTION)
                .arg(arg!(-u --uri <URI>).required(true).help("Share server URI"))
                .arg(
                    arg!(-f --file <FILE>)
                        .required(true)
                        .help("Path to file to upload"),
                ),
        )
        .subcommand(
            Command::new(cli::DOWNLOAD_SUBCOMMAND)
                .about(cli::DOWNLOAD_DESCRIPTION)
                .arg(arg!(-u --uri <URI>).required(true).help("Share server URI"))
                .arg(
                    arg!(-f --file <FILE>)
                        .required(true)
                        .help("Name of the shared file"),
                )
                .arg(
                    arg!(-o --output <OUTPUT>)
                        .required(false)
                        .help("Output path (defaults to the shared name)"),
                ),
        )
        .arg_required_else_help(true)
        .disable_version_flag(true)
        .get_matches();

    if cli.subcommand_matches(cli::VERSION_SUBCOMMAND).is_some() {
        cli::version::run();
    } else if cli.subcommand_matches(cli::BUGREPORT_SUBCOMMAND).is_some() {
        cli::bugreport::run();
    } else if let Some(server_matches) = cli.subcommand_matches(cli::SERVER_SUBCOMMAND) {
        cli::server::run(server_matches).await;
    } else if let Some(upload_matches) = cli.subcommand_matches(cli::UPLOAD_SUBCOMMAND) {
        let uri = upload_matches.get_one::<String>("uri").unwrap();
        let file = upload_matches.get_one::<String>("file").unwrap();
        let params = UploadParams {
            uri: uri.clone(),
            file: file.clone(),
        };
        cli::client::upload(params).await;
    } else if let Some(download_matches) = cli.subcommand_matches(cli::DOWNLOAD_SUBCOMMAND) {
        let uri = download_matches.get_one::<String>("uri").unwrap();
        let file = download_matches.get_one::<String>("file").unwrap();
        let output = download_matches.get_one::<String>("output");
        let params = DownloadParams {
            uri: uri.clone(),
            file: file.clone(),
            output: output.cloned(),
        };
        cli::client::download(params).await;
    }
}
