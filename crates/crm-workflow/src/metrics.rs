// Archivo: metrics.rs
// Propósito: métricas del tablero. Funciones puras sobre las colecciones ya
// filtradas por visibilidad; se recalculan en cada lectura y nada se
// persiste.
use chrono::{Datelike, NaiveDate};
use crm_domain::{Cotizacion, Despacho, Entidad, EstadoDespacho, OrdenInsercion, SalesBudget};
use serde::Serialize;

const COTIZACIONES_RECIENTES: usize = 3;
const DESPACHOS_RECIENTES: usize = 2;

/// Entrada del feed de actividad reciente.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Actividad {
    Cotizacion { id: String, consecutivo: String, cliente_nombre: String, ganada: bool },
    Despacho { id: String, consecutivo_cotizacion: String, estado: EstadoDespacho },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub anio: i32,
    /// Mes calendario 1-12 de la fecha de corte.
    pub mes: u32,
    pub cotizaciones_mes: usize,
    pub cotizaciones_mes_anterior: usize,
    /// Variación porcentual contra el mes anterior.
    pub crecimiento_pct: f64,
    pub ganadas_mes: usize,
    pub ingresos_ganados_mes: f64,
    pub despachos_entregados: usize,
    pub despachos_en_transito: usize,
    pub actividad_reciente: Vec<Actividad>,
}

/// Avance de un vendedor contra su presupuesto mensual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumplimientoPresupuesto {
    pub usuario_id: String,
    pub nombre_vendedor: String,
    pub meta: f64,
    pub vendido: f64,
    pub porcentaje: f64,
}

pub struct MetricsEngine;

impl MetricsEngine {
    /// Calcula el tablero a la fecha `as_of`. `cotizaciones` y `despachos`
    /// deben venir en el orden de sus almacenes.
    pub fn dashboard(cotizaciones: &[&Cotizacion], despachos: &[&Despacho], as_of: NaiveDate) -> DashboardMetrics {
        let (anio, mes) = (as_of.year(), as_of.month());
        let (anio_prev, mes_prev) = mes_anterior(anio, mes);

        let del_mes: Vec<&Cotizacion> =
            cotizaciones.iter().copied().filter(|c| periodo(&c.fecha) == Some((anio, mes))).collect();
        let anteriores = cotizaciones.iter().filter(|c| periodo(&c.fecha) == Some((anio_prev, mes_prev))).count();
        let ganadas: Vec<&Cotizacion> = del_mes.iter().copied().filter(|c| c.es_ganada()).collect();
        let entregados = despachos.iter().filter(|d| d.esta_entregado()).count();

        let mut actividad_reciente = Vec::with_capacity(COTIZACIONES_RECIENTES + DESPACHOS_RECIENTES);
        for c in recientes(cotizaciones, COTIZACIONES_RECIENTES) {
            actividad_reciente.push(Actividad::Cotizacion { id: c.id.clone(),
                                                            consecutivo: c.consecutivo.clone(),
                                                            cliente_nombre: c.cliente_nombre.clone(),
                                                            ganada: c.es_ganada() });
        }
        for d in recientes(despachos, DESPACHOS_RECIENTES) {
            actividad_reciente.push(Actividad::Despacho { id: d.id.clone(),
                                                          consecutivo_cotizacion: d.consecutivo_cotizacion.clone(),
                                                          estado: d.estado });
        }

        DashboardMetrics { anio,
                           mes,
                           cotizaciones_mes: del_mes.len(),
                           cotizaciones_mes_anterior: anteriores,
                           crecimiento_pct: crecimiento(del_mes.len(), anteriores),
                           ganadas_mes: ganadas.len(),
                           ingresos_ganados_mes: ganadas.iter().map(|c| c.total).sum(),
                           despachos_entregados: entregados,
                           despachos_en_transito: despachos.len() - entregados,
                           actividad_reciente }
    }

    /// Ventas ganadas de cada vendedor con presupuesto en `anio`/`mes`
    /// (`mes` 0-11, como en `SalesBudget`).
    pub fn cumplimiento_presupuestos(cotizaciones: &[&Cotizacion],
                                     presupuestos: &[SalesBudget],
                                     anio: i32,
                                     mes: u32)
                                     -> Vec<CumplimientoPresupuesto> {
        presupuestos.iter()
                    .filter(|b| b.anio == anio && b.mes == mes)
                    .map(|b| {
                        let vendido: f64 = cotizaciones.iter()
                                                       .filter(|c| c.es_ganada() && c.usuario_id == b.usuario_id)
                                                       .filter(|c| periodo(&c.fecha) == Some((anio, mes + 1)))
                                                       .map(|c| c.total)
                                                       .sum();
                        let porcentaje = if b.monto > 0.0 { vendido / b.monto * 100.0 } else { 0.0 };
                        CumplimientoPresupuesto { usuario_id: b.usuario_id.clone(),
                                                  nombre_vendedor: b.nombre_vendedor.clone(),
                                                  meta: b.monto,
                                                  vendido,
                                                  porcentaje }
                    })
                    .collect()
    }
}

/// Crecimiento porcentual: +100 si antes no había y ahora sí, 0 si ambos son
/// cero.
pub fn crecimiento(actual: usize, anterior: usize) -> f64 {
    if anterior > 0 {
        (actual as f64 - anterior as f64) / anterior as f64 * 100.0
    } else if actual > 0 {
        100.0
    } else {
        0.0
    }
}

/// Año y mes (1-12) de una fecha `YYYY-MM-DD`. Fechas ilegibles → `None`.
fn periodo(fecha: &str) -> Option<(i32, u32)> {
    let mut partes = fecha.trim().split('-');
    let anio = partes.next()?.parse::<i32>().ok()?;
    let mes = partes.next()?.parse::<u32>().ok()?;
    (1..=12).contains(&mes).then_some((anio, mes))
}

fn mes_anterior(anio: i32, mes: u32) -> (i32, u32) {
    if mes == 1 {
        (anio - 1, 12)
    } else {
        (anio, mes - 1)
    }
}

/// Los `n` más recientes según la política de inserción del tipo.
fn recientes<'a, T: Entidad>(items: &[&'a T], n: usize) -> Vec<&'a T> {
    match T::ORDEN {
        OrdenInsercion::AlFinal => items.iter().rev().take(n).copied().collect(),
        OrdenInsercion::AlInicio => items.iter().take(n).copied().collect(),
    }
}
