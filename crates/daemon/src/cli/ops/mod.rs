pub mod collection;
pub mod daemon;
pub mod health;
pub mod init;
pub mod login;
pub mod version;

pub use collection::Collection;
pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use login::Login;
pub use version::Version;
