#![allow(dead_code)]

use chrono::NaiveDate;
use crm_domain::{AppUser, Cotizacion, CotizacionItem, EstadoCotizacion, Modulo, Rol};
use crm_persistence::{InMemorySnapshotRepository, PersistenceLayer, SnapshotRepository};
use crm_workflow::{CrmConfig, CrmState, RecordingNotificationGateway};
use std::sync::Arc;

pub fn hoy() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
}

pub struct Entorno {
  pub repo: Arc<InMemorySnapshotRepository>,
  pub gateway: Arc<RecordingNotificationGateway>,
  pub state: CrmState,
}

/// Estado sobre un repositorio en memoria, con reloj fijo y pasarela que
/// registra las notificaciones.
pub fn entorno() -> Entorno {
  let repo = Arc::new(InMemorySnapshotRepository::new());
  let gateway = Arc::new(RecordingNotificationGateway::new());
  let state = cargar(repo.clone(), gateway.clone());
  Entorno { repo, gateway, state }
}

pub fn cargar(repo: Arc<dyn SnapshotRepository>, gateway: Arc<RecordingNotificationGateway>) -> CrmState {
  CrmState::cargar(PersistenceLayer::new(repo), gateway, &CrmConfig::default()).expect("cargar")
                                                                              .with_reloj(hoy)
}

pub fn cotizacion(id: &str, usuario_id: &str, estado: EstadoCotizacion, fecha: &str) -> Cotizacion {
  Cotizacion { id: id.into(),
               fecha: fecha.into(),
               cliente_id: "1".into(),
               cliente_nombre: "Help Soluciones Inc".into(),
               consecutivo: format!("COT-{}", id),
               items: vec![CotizacionItem { id: format!("{}-1", id),
                                            producto_id: "1".into(),
                                            proveedor_id: "1".into(),
                                            unidad: "Und".into(),
                                            cantidad: 2.0,
                                            costo_unitario: 100.0,
                                            utilidad: 20.0,
                                            iva: 19.0 }],
               subtotal: 0.0,
               iva: 0.0,
               total: 0.0,
               ejecutivo: "Ana".into(),
               ejecutivo_email: "ana@helpsoluciones.com".into(),
               ejecutivo_telefono: None,
               usuario_id: usuario_id.into(),
               estado }
}

pub fn comercial(id: &str, usuario: &str) -> AppUser {
  AppUser { id: id.into(),
            nombre: format!("Vendedor {}", id),
            usuario: usuario.into(),
            cargo: "Ejecutivo comercial".into(),
            email: format!("{}@helpsoluciones.com", usuario),
            telefono: "3000000000".into(),
            rol: Rol::Comercial,
            permisos: [Modulo::Dashboard, Modulo::Cotizaciones].into_iter().collect(),
            password: Some("clave".into()) }
}
