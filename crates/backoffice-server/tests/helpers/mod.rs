//! Test helpers para backoffice-server.

#![allow(dead_code, unused_imports)]

pub mod app;
pub mod client;
pub mod logs;

pub use app::{
    CountingRepository, FailingStore, OTHER_SERVICE_KEY, SERVICE_KEY, TestApp, auth,
};
pub use client::{TestClient, TestResponse};
pub use logs::CapturedLogs;
