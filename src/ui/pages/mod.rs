pub mod history;
pub mod login;
pub mod merchandise;
pub mod register;

pub use history::HistoryPage;
pub use login::LoginPage;
pub use merchandise::MerchandisePage;
pub use register::RegisterPage;
