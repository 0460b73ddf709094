pub mod config;
pub mod http;
pub mod rbac;

pub const DATA_PATH_METADATA: &str = "md";
