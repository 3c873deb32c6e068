pub mod assets;
pub mod attendance;
pub mod dashboard;
pub mod expenses;
pub mod insights;
pub mod losses;
pub mod profile;
pub mod reports;
pub mod sales;
