/// Application name
pub const APP_NAME: &str = "WebEmbed";

/// URL segment under which embedded assets are served
pub const BASE_PATH: &str = "/performance";

/// Resource group exposed when no folder name is configured
pub const DEFAULT_FOLDER_NAME: &str = "WebRoot";

/// Methods answered by the asset server
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "webembed=info,tower_http=info";
