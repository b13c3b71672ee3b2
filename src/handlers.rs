pub mod auth;
pub mod monde;
pub mod planos;
