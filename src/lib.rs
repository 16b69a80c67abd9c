pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod db {
    pub mod models;
    pub mod store;
}
pub mod storage {
    pub mod uploads;
}
pub mod api {
    pub mod admins;
    pub mod attachments;
    pub mod errors;
    pub mod forms;
    pub mod gallery;
    pub mod pages;
    pub mod posts;
    pub mod social;
    pub mod staff;
}
