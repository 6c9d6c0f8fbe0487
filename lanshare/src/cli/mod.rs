
pub mod bugreport;
pub mod client;
pub mod server;
pub mod version;

pub const SERVER_SUBCOMMAND: &str = "server";
pub const SERVER_DESCRIPTION: &str = "Run the file sharing server";

pub const VERSION_SUBCOMMAND: &str = "version";
pub const VERSION_DESCRIPTION: &str = "Display the version and build information";

pub const BUGREPORT_SUBCOMMAND: &str = "bugreport";
pub const BUGREPORT_DESCRIPTION: &str = "Collect information useful for bug reports";

pub const UPLOAD_SUBCOMMAND: &str = "upload";
pub const UPLOAD_DESCRIPTION: &str = "Upload a local file to a share server";

pub const DOWNLOAD_SUBCOMMAND: &str = "download";
pub const DOWNLOAD_DESCRIPTION: &str = "Download a shared file from a share server";
