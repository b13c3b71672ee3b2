pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod plano_repo;
pub use plano_repo::PlanoRepository;
pub mod sessao_repo;
pub use sessao_repo::SessaoRepository;
