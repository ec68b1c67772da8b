pub mod clean;
pub mod init;
pub mod list;
pub mod partials;
pub mod publish;
pub mod template;
