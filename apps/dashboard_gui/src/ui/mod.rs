//! UI layer: app shell, routes, pages, the confirmation dialog, and layout chrome.

pub mod app;
pub mod dialog;
pub mod layout;
pub mod pages;
pub mod routes;

pub use app::DashboardApp;
