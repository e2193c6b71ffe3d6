use clap::Parser;

use crate::constants;
use crate::server::AssetServerOptions;

#[derive(Parser, Debug, Clone)]
#[command(name = "webembed")]
#[command(version)]
#[command(about = "Serve static files embedded in the binary under /performance")]
#[command(long_about = "\
WebEmbed - embedded static files behind a path prefix

Every request under /performance is answered from files compiled into the
binary (assets/<FOLDER_NAME>/...). All other paths fall through to the rest
of the application.

EXAMPLES:
    # Serve the default WebRoot group on port 5000
    webembed

    # Serve a different group and refuse to start if it is missing
    webembed --folder-name Dashboard --strict-assets

    # Using environment variables
    export WEBEMBED_PORT=8080
    export WEBEMBED_FOLDER_NAME=WebRoot
    webembed
")]
pub struct Config {
    /// Host/IP address to bind to
    ///
    /// Use 127.0.0.1 to listen only on localhost.
    #[arg(long, default_value = "0.0.0.0", env = "WEBEMBED_HOST", value_name = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value = "5000", env = "WEBEMBED_PORT", value_name = "PORT")]
    pub port: u16,

    /// Embedded resource group to expose under /performance
    ///
    /// Must match a sub-directory of assets/ at build time. An unknown name
    /// makes every asset request answer 404 unless --strict-assets is set.
    #[arg(
        long,
        default_value = constants::DEFAULT_FOLDER_NAME,
        env = "WEBEMBED_FOLDER_NAME",
        value_name = "NAME"
    )]
    pub folder_name: String,

    /// Refuse to start when the resource group contains no files
    #[arg(long, env = "WEBEMBED_STRICT_ASSETS")]
    pub strict_assets: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("Host cannot be empty");
        }

        if self.folder_name.trim_matches('/').is_empty() {
            anyhow::bail!("Folder name cannot be empty");
        }

        if self.folder_name.split('/').any(|segment| segment == "..") {
            anyhow::bail!("Folder name cannot contain '..': {:?}", self.folder_name);
        }

        Ok(())
    }

    pub fn asset_options(&self) -> AssetServerOptions {
        AssetServerOptions {
            folder_name: self.folder_name.clone(),
        }
    }
}
