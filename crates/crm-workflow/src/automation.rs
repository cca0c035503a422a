// Archivo: automation.rs
// Propósito: reglas que reaccionan a transiciones de estado. Las reglas son
// funciones puras: reciben el estado relevante y devuelven las mutaciones
// derivadas y las notificaciones a pedir. `CrmState` las aplica después de
// confirmar la mutación que las dispara.
use crate::config::CrmConfig;
use crate::notification::Notificacion;
use chrono::NaiveDate;
use crm_domain::{Cliente, Cotizacion, Despacho, DespachoItem, EstadoDespacho, Producto};

pub const PRODUCTO_DESCONOCIDO: &str = "Producto Desconocido";
pub const NO_DISPONIBLE: &str = "N/A";

/// Resultado de la regla de cotización ganada.
#[derive(Debug, Clone, PartialEq)]
pub struct DespachoGenerado {
    pub despacho: Despacho,
    pub notificaciones: Vec<Notificacion>,
}

pub struct AutomationEngine {
    correo_logistica: String,
}

impl AutomationEngine {
    pub fn new(config: &CrmConfig) -> Self {
        Self { correo_logistica: config.correo_logistica.clone() }
    }

    /// Regla cotización ganada → despacho.
    ///
    /// Sólo genera algo si la cotización está en `Ganado` y todavía no tiene
    /// despacho. La resolución de productos y cliente nunca falla: las
    /// referencias rotas se reemplazan por valores centinela.
    pub fn cotizacion_actualizada<F>(&self,
                                     cotizacion: &Cotizacion,
                                     ya_tiene_despacho: bool,
                                     productos: &[Producto],
                                     clientes: &[Cliente],
                                     fecha: NaiveDate,
                                     nuevo_id: F)
                                     -> Option<DespachoGenerado>
        where F: FnOnce() -> String
    {
        if !cotizacion.es_ganada() || ya_tiene_despacho {
            return None;
        }

        let items = cotizacion.items
                              .iter()
                              .map(|item| {
                                  let producto = productos.iter().find(|p| p.id == item.producto_id);
                                  DespachoItem { producto_id: item.producto_id.clone(),
                                                 nombre_producto: producto.map(|p| p.nombre.clone())
                                                                          .unwrap_or_else(|| PRODUCTO_DESCONOCIDO.to_string()),
                                                 num_part: producto.map(|p| p.num_part.clone())
                                                                   .unwrap_or_else(|| NO_DISPONIBLE.to_string()),
                                                 cantidad: item.cantidad }
                              })
                              .collect();
        let direccion = clientes.iter()
                                .find(|c| c.id == cotizacion.cliente_id)
                                .map(|c| c.direccion.clone())
                                .unwrap_or_else(|| NO_DISPONIBLE.to_string());

        let despacho = Despacho { id: nuevo_id(),
                                  cotizacion_id: cotizacion.id.clone(),
                                  consecutivo_cotizacion: cotizacion.consecutivo.clone(),
                                  fecha_solicitud: fecha.format("%Y-%m-%d").to_string(),
                                  cliente_id: cotizacion.cliente_id.clone(),
                                  cliente_nombre: cotizacion.cliente_nombre.clone(),
                                  direccion,
                                  items,
                                  total: cotizacion.total,
                                  ejecutivo_email: cotizacion.ejecutivo_email.clone(),
                                  ejecutivo_telefono: cotizacion.ejecutivo_telefono.clone(),
                                  usuario_id: cotizacion.usuario_id.clone(),
                                  estado: EstadoDespacho::Pendiente,
                                  conductor_id: None,
                                  conductor_nombre: None,
                                  foto_entrega: None,
                                  foto_remision: None,
                                  georeferencia: None };

        let mut notificaciones = Vec::with_capacity(2);
        if !cotizacion.ejecutivo_email.trim().is_empty() {
            notificaciones.push(Notificacion::email(&cotizacion.ejecutivo_email,
                                                    format!("Nuevo Pedido: {}", cotizacion.consecutivo),
                                                    format!("Hola, tu cotización {} ha sido marcada como GANADA y ya se \
                                                             encuentra en trámite de logística.",
                                                            cotizacion.consecutivo)));
        }
        notificaciones.push(Notificacion::email(&self.correo_logistica,
                                                format!("NUEVO PEDIDO - Cotización {}", cotizacion.consecutivo),
                                                format!("Se ha generado un nuevo pedido desde la cotización {} para el \
                                                         cliente {}.\n\nPor favor iniciar el proceso de alistamiento y \
                                                         despacho.",
                                                        cotizacion.consecutivo, cotizacion.cliente_nombre)));

        Some(DespachoGenerado { despacho, notificaciones })
    }

    /// Regla de cambio de estado de un despacho: avisa al ejecutivo cuando el
    /// estado almacenado difiere del nuevo. Sin despacho previo o sin correo
    /// del ejecutivo no hay aviso.
    pub fn despacho_actualizado(&self, anterior: Option<&Despacho>, nuevo: &Despacho) -> Option<Notificacion> {
        let anterior = anterior?;
        if anterior.estado == nuevo.estado {
            return None;
        }
        if nuevo.ejecutivo_email.trim().is_empty() {
            log::debug!("despacho {} sin correo de ejecutivo; no se notifica el cambio", nuevo.id);
            return None;
        }
        Some(Notificacion::email(&nuevo.ejecutivo_email,
                                 format!("Cambio de Estado Pedido: {}", nuevo.consecutivo_cotizacion),
                                 format!("Hola, el pedido asociado a la cotización {} ha cambiado su estado de \"{}\" \
                                          a \"{}\".",
                                         nuevo.consecutivo_cotizacion, anterior.estado, nuevo.estado)))
    }
}
