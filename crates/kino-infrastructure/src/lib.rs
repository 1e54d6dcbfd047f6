//! Filesystem-backed implementations of the Kino core traits.

pub mod async_dir_hook_source;
pub mod async_dir_spec_source;
pub mod async_dir_steering_source;
pub mod dto;
pub mod json_mcp_config_source;
pub mod json_session_repository;
pub mod paths;
pub mod project_files;
pub mod secret_service;
pub mod settings_service;
pub mod storage;
pub mod watcher;

pub use crate::async_dir_hook_source::AsyncDirHookSource;
pub use crate::async_dir_spec_source::AsyncDirSpecSource;
pub use crate::async_dir_steering_source::AsyncDirSteeringSource;
pub use crate::json_mcp_config_source::JsonMcpConfigSource;
pub use crate::json_session_repository::JsonSessionRepository;
pub use crate::paths::KinoPaths;
pub use crate::project_files::ProjectFiles;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::settings_service::SettingsService;
pub use crate::watcher::DirectoryWatcher;
