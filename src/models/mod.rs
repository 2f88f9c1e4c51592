pub mod card;
pub mod dashboard;
pub mod department;
pub mod health_session;
pub mod membership;
pub mod team;
pub mod user;
pub mod vote;
