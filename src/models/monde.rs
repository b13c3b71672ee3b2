// src/models/monde.rs

use serde::Serialize;
use utoipa::ToSchema;

// Agregado calculado localmente sobre as tarefas devolvidas pelo Monde.
// `pendentes` é derivado: total - concluidas - atrasadas.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct StatsTarefas {
    pub total: u64,
    pub pendentes: u64,
    pub concluidas: u64,
    pub atrasadas: u64,
    pub vencem_hoje: u64,
}
