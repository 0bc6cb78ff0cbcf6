pub mod bug_report;
pub mod download;
pub mod landing;
pub mod news;
pub mod portfolio;
pub mod service;
pub mod settings;
pub mod theme;
