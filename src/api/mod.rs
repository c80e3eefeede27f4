//! Clients for external HTTP APIs

pub mod coingecko;
