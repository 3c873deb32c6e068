pub mod attendance_service;
pub mod auth;
pub mod csv_export;
pub mod csv_import;
pub mod dashboard_service;
pub mod insight_service;
pub mod metrics;
pub mod report_service;
pub mod sales_service;
pub mod storage_service;
