use thiserror::Error;

// Errores del orquestador.
//
// Agrupa los rechazos del dominio (`DomainError`), los fallos de la capa de
// persistencia (`PersistenceError`) y los fallos de entrega de
// notificaciones. Estos últimos nunca deshacen una mutación ya confirmada.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Operación rechazada por una regla del dominio.
    #[error("Error de dominio: {0}")]
    Domain(#[from] crm_domain::DomainError),

    /// Fallo al escribir o leer snapshots.
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] crm_persistence::PersistenceError),

    /// La pasarela no pudo entregar una notificación.
    #[error("Error de notificación: {0}")]
    Notificacion(String),
}
