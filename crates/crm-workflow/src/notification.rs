// Archivo: notification.rs
// Propósito: contrato de la pasarela de notificaciones y dos
// implementaciones (registro en log y captura en memoria). El núcleo sólo
// arma la solicitud; la entrega real queda fuera del crate.
use crate::errors::WorkflowError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Canal {
    Email,
    /// Mensaje a un teléfono (WhatsApp/SMS); no lleva asunto.
    Mensaje,
}

/// Solicitud de notificación `(destino, asunto, cuerpo)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notificacion {
    pub canal: Canal,
    pub destino: String,
    pub asunto: Option<String>,
    pub cuerpo: String,
}

impl Notificacion {
    pub fn email(destino: impl Into<String>, asunto: impl Into<String>, cuerpo: impl Into<String>) -> Self {
        Self { canal: Canal::Email,
               destino: destino.into(),
               asunto: Some(asunto.into()),
               cuerpo: cuerpo.into() }
    }

    /// Mensaje a un teléfono. Los espacios del número se eliminan.
    pub fn mensaje(telefono: &str, cuerpo: impl Into<String>) -> Self {
        let destino: String = telefono.chars().filter(|c| !c.is_whitespace()).collect();
        Self { canal: Canal::Mensaje,
               destino,
               asunto: None,
               cuerpo: cuerpo.into() }
    }
}

/// Capacidad inyectada para entregar notificaciones. Las solicitudes son
/// "fire-and-forget": un error aquí se registra y no afecta al estado.
pub trait NotificationGateway: Send + Sync {
    fn notify(&self, notificacion: &Notificacion) -> Result<(), WorkflowError>;
}

/// Pasarela que sólo escribe la solicitud en el log.
#[derive(Debug, Default)]
pub struct LogNotificationGateway;

impl NotificationGateway for LogNotificationGateway {
    fn notify(&self, n: &Notificacion) -> Result<(), WorkflowError> {
        match n.canal {
            Canal::Email => log::info!("[EMAIL] To: {} Subject: {} Body: {}",
                                       n.destino,
                                       n.asunto.as_deref().unwrap_or(""),
                                       n.cuerpo),
            Canal::Mensaje => log::info!("[MENSAJE] To: {} Message: {}", n.destino, n.cuerpo),
        }
        Ok(())
    }
}

/// Pasarela en memoria para pruebas: guarda cada solicitud y puede simular
/// fallos de entrega.
#[derive(Debug, Default)]
pub struct RecordingNotificationGateway {
    enviadas: Mutex<Vec<Notificacion>>,
    fallar: AtomicBool,
}

impl RecordingNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Si `true`, cada `notify` registra la solicitud y luego devuelve error.
    pub fn set_fallar(&self, fallar: bool) {
        self.fallar.store(fallar, Ordering::SeqCst);
    }

    pub fn enviadas(&self) -> Vec<Notificacion> {
        self.enviadas.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn limpiar(&self) {
        self.enviadas.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl NotificationGateway for RecordingNotificationGateway {
    fn notify(&self, n: &Notificacion) -> Result<(), WorkflowError> {
        self.enviadas.lock().unwrap_or_else(|e| e.into_inner()).push(n.clone());
        if self.fallar.load(Ordering::SeqCst) {
            return Err(WorkflowError::Notificacion(format!("entrega simulada fallida a {}", n.destino)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_strips_whitespace_and_has_no_subject() {
        let n = Notificacion::mensaje("300 123 4567", "hola");
        assert_eq!(n.destino, "3001234567");
        assert_eq!(n.asunto, None);
        assert_eq!(n.canal, Canal::Mensaje);
    }

    #[test]
    fn recording_gateway_keeps_requests_even_when_failing() {
        let gw = RecordingNotificationGateway::new();
        gw.set_fallar(true);
        assert!(gw.notify(&Notificacion::email("a@x.co", "s", "b")).is_err());
        assert_eq!(gw.enviadas().len(), 1);
        gw.limpiar();
        assert!(gw.enviadas().is_empty());
    }
}
