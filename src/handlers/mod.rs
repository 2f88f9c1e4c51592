pub mod account_handlers;
pub mod api_v1;
pub mod auth_handlers;
pub mod dashboard;
pub mod register_handlers;
pub mod vote_handlers;
