pub mod auth;
pub mod empresa;
pub mod monde;
pub mod planos;
