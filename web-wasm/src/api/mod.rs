//! API連携

pub mod whatsapp;
