// totales.rs
use serde::{Deserialize, Serialize};

/// Tasa de IVA aplicada a las órdenes de compra (sus ítems no traen tasa).
pub const IVA_ORDEN_COMPRA: f64 = 19.0;

/// Totales derivados de las líneas de un documento. `total` siempre es
/// `subtotal + iva`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totales {
  pub subtotal: f64,
  pub iva: f64,
  pub total: f64,
}

impl Totales {
  /// Acumula líneas `(subtotal_linea, tasa_iva_porcentaje)`.
  pub fn desde_lineas<I>(lineas: I) -> Self
    where I: IntoIterator<Item = (f64, f64)>
  {
    let (subtotal, iva) = lineas.into_iter()
                                .fold((0.0, 0.0), |(s, i), (linea, tasa)| (s + linea, i + linea * tasa / 100.0));
    Self { subtotal, iva, total: subtotal + iva }
  }
}
