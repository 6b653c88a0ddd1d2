// Adapters layer: concrete implementations for external systems (http, model artifacts, html views).

pub mod http;
pub mod model;
pub mod views;
