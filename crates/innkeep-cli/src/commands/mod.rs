//! Command handlers

pub mod config;
pub mod customer;
pub mod hotel;
pub mod reservation;
