pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod export;
pub mod generate;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod passwd;
pub mod purge;
pub mod show;
pub mod status;
pub mod version;
