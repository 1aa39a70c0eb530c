pub mod account;
pub mod analytics;
pub mod insights;
pub mod review;
