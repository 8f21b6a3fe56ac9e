pub mod analytics_service;
pub mod chart_service;
pub mod gold_xirr;
pub mod portfolio_service;
pub mod price_service;
pub mod xirr;
