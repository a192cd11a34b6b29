/*
 * Responsibility
 * - module 構成の公開 (binary とテストの両方から使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
