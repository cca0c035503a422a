// Orquestación del CRM: control de acceso, reglas de automatización,
// métricas del tablero, notificaciones y el contenedor de estado que las une
// a la capa de persistencia.
pub mod access;
pub mod automation;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod notification;
pub mod state;

pub use access::AccessControl;
pub use automation::{AutomationEngine, DespachoGenerado, NO_DISPONIBLE, PRODUCTO_DESCONOCIDO};
pub use config::CrmConfig;
pub use errors::WorkflowError;
pub use metrics::{crecimiento, Actividad, CumplimientoPresupuesto, DashboardMetrics, MetricsEngine};
pub use notification::{Canal, LogNotificationGateway, Notificacion, NotificationGateway,
                       RecordingNotificationGateway};
pub use state::{generar_id, CrmState, Reloj};
