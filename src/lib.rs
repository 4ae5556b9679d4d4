//! Bilingual (Amharic/English) civil-registration certificates with dual
//! Ethiopian/Gregorian dating.

pub mod bilingual;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod normalize;
pub mod pdf;
pub mod producer;
pub mod qr;
pub mod routes;
pub mod state;
pub mod storage;
pub mod templates;
