pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod migrate;
pub mod planilha;
pub mod quadro;
pub mod serve;
