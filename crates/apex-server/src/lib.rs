//! Development and preview servers for apex sites.
//!
//! The dev server builds the site, serves the output directory, and rebuilds
//! whenever the client data, templates or assets change, telling open tabs to
//! reload. The preview server only serves an existing build.

pub mod preview;
pub mod reload;
pub mod server;
pub mod watcher;

pub use preview::{preview, site_router};
pub use reload::{ReloadHub, ReloadMessage};
pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent, WatchTarget};
