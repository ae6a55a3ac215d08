//! PawMatch CLI
//!
//! 迷子犬・保護犬の通報をバックエンドへ送り、返ってきたマッチ候補を表示する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod photo;
pub mod render;
