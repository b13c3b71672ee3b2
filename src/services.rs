pub mod auth_service;
pub mod monde_achatar;
pub mod monde_client;
pub mod monde_filtros;
pub mod plano_service;
