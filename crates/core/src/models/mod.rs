pub mod analytics;
pub mod cash_flow;
pub mod chart;
pub mod portfolio;
pub mod price;
pub mod purchase;
pub mod settings;
