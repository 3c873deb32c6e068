pub mod asset_repo;
pub mod attendance_repo;
pub mod dashboard_repo;
pub mod expense_repo;
pub mod loss_repo;
pub mod sales_repo;

pub use asset_repo::AssetRepository;
pub use attendance_repo::AttendanceRepository;
pub use dashboard_repo::DashboardRepository;
pub use expense_repo::ExpenseRepository;
pub use loss_repo::LossRepository;
pub use sales_repo::SalesRepository;
