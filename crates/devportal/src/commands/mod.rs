pub mod init;
pub mod library;
pub mod module;
pub mod serve;
