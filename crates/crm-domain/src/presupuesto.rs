// presupuesto.rs
use crate::entity_store::Entidad;
use crate::DomainError;
use serde::{Deserialize, Serialize};

/// Meta de ventas mensual de un vendedor. `mes` va de 0 (enero) a 11.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBudget {
  pub id: String,
  pub usuario_id: String,
  #[serde(default)]
  pub nombre_vendedor: String,
  pub anio: i32,
  pub mes: u32,
  pub monto: f64,
}

impl SalesBudget {
  pub fn validar(&self) -> Result<(), DomainError> {
    if self.mes > 11 {
      return Err(DomainError::Validacion(format!("mes fuera de rango (0-11): {}", self.mes)));
    }
    if self.monto < 0.0 {
      return Err(DomainError::Validacion("el monto no puede ser negativo".to_string()));
    }
    Ok(())
  }

  /// Verdadero si ambos presupuestos cubren el mismo vendedor y periodo.
  pub fn mismo_periodo(&self, otro: &SalesBudget) -> bool {
    self.usuario_id == otro.usuario_id && self.anio == otro.anio && self.mes == otro.mes
  }
}

impl Entidad for SalesBudget {
  const CLAVE: &'static str = "hs_budgets";

  fn id(&self) -> &str {
    &self.id
  }
}
