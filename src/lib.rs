//! Backend for the movie taste-match demo: a static catalog of movies and
//! user likes, a co-occurrence recommendation engine, and TMDB poster lookups.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
