pub mod init;
pub mod root;
pub mod summarize;
pub mod week;
