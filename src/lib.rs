// src/lib.rs

//! rootboard: Root-Me leaderboard publisher

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
