mod common;

use chrono::NaiveDate;
use common::{comercial, cotizacion, entorno, hoy};
use crm_domain::{Cotizacion, DomainError, EstadoCotizacion, SalesBudget};
use crm_workflow::{crecimiento, Actividad, MetricsEngine, WorkflowError};

fn refs(items: &[Cotizacion]) -> Vec<&Cotizacion> {
  items.iter().collect()
}

#[test]
fn growth_edge_cases() {
  assert_eq!(crecimiento(3, 0), 100.0);
  assert_eq!(crecimiento(0, 0), 0.0);
  assert_eq!(crecimiento(2, 4), -50.0);
}

#[test]
fn monthly_counts_compare_against_previous_month() {
  let mut cotizaciones: Vec<Cotizacion> =
    (0..4).map(|i| cotizacion(&format!("abr{}", i), "1", EstadoCotizacion::Seguimiento, "2024-04-10")).collect();
  cotizaciones.push(cotizacion("may0", "1", EstadoCotizacion::Ganado, "2024-05-01").con_totales());
  cotizaciones.push(cotizacion("may1", "1", EstadoCotizacion::Perdido, "2024-05-02"));
  cotizaciones.push(cotizacion("rota", "1", EstadoCotizacion::Ganado, "sin fecha"));

  let m = MetricsEngine::dashboard(&refs(&cotizaciones), &[], hoy());
  assert_eq!((m.anio, m.mes), (2024, 5));
  assert_eq!(m.cotizaciones_mes, 2);
  assert_eq!(m.cotizaciones_mes_anterior, 4);
  assert_eq!(m.crecimiento_pct, -50.0);
  assert_eq!(m.ganadas_mes, 1);
  assert!((m.ingresos_ganados_mes - 285.6).abs() < 1e-9);
}

#[test]
fn january_looks_back_to_december() {
  let cotizaciones: Vec<Cotizacion> = ["2024-01-03", "2024-01-04", "2024-01-05"]
    .iter()
    .enumerate()
    .map(|(i, f)| cotizacion(&i.to_string(), "1", EstadoCotizacion::Seguimiento, f))
    .collect();
  let enero = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
  let m = MetricsEngine::dashboard(&refs(&cotizaciones), &[], enero);
  assert_eq!(m.cotizaciones_mes_anterior, 0);
  assert_eq!(m.crecimiento_pct, 100.0);
}

#[test]
fn dashboard_uses_visible_records_and_recent_feed() -> Result<(), WorkflowError> {
  let mut env = entorno();
  env.state.add_user(comercial("2", "ana"))?;
  for (id, dueno) in [("q1", "1"), ("q2", "2"), ("q3", "1"), ("q4", "1"), ("q5", "1")] {
    env.state.add_cotizacion(cotizacion(id, dueno, EstadoCotizacion::Seguimiento, "2024-05-01"))?;
  }
  for id in ["q1", "q3", "q4"] {
    let mut c = env.state.cotizaciones().iter().find(|c| c.id == id).cloned().expect("cotización");
    c.estado = EstadoCotizacion::Ganado;
    env.state.update_cotizacion(c)?;
  }
  let entregado = env.state.despachos()[2].clone();
  env.state.update_despacho(crm_domain::Despacho { estado: crm_domain::EstadoDespacho::Entregado, ..entregado })?;

  assert!(matches!(env.state.dashboard_metrics(hoy()), Err(WorkflowError::Domain(DomainError::SinSesion))));

  env.state.login("admin", "admin")?;
  let m = env.state.dashboard_metrics(hoy())?;
  assert_eq!(m.cotizaciones_mes, 5);
  assert_eq!(m.ganadas_mes, 3);
  assert_eq!(m.despachos_entregados, 1);
  assert_eq!(m.despachos_en_transito, 2);
  let feed: Vec<String> = m.actividad_reciente
                           .iter()
                           .map(|a| match a {
                             Actividad::Cotizacion { id, .. } => id.clone(),
                             Actividad::Despacho { consecutivo_cotizacion, .. } => consecutivo_cotizacion.clone(),
                           })
                           .collect();
  assert_eq!(feed, vec!["q5", "q4", "q3", "COT-q4", "COT-q3"]);

  env.state.login("ana", "clave")?;
  let m = env.state.dashboard_metrics(hoy())?;
  assert_eq!(m.cotizaciones_mes, 1);
  assert_eq!(m.ganadas_mes, 0);
  assert_eq!(m.despachos_entregados + m.despachos_en_transito, 0);
  Ok(())
}

#[test]
fn budget_compliance_counts_won_revenue_of_the_month() -> Result<(), WorkflowError> {
  let mut env = entorno();
  env.state.add_budget(SalesBudget { id: "b1".into(),
                                     usuario_id: "1".into(),
                                     nombre_vendedor: "Administrador Principal".into(),
                                     anio: 2024,
                                     mes: 4,
                                     monto: 1000.0 })?;
  env.state.add_cotizacion(cotizacion("q1", "1", EstadoCotizacion::Ganado, "2024-05-01"))?;
  env.state.add_cotizacion(cotizacion("q2", "1", EstadoCotizacion::Seguimiento, "2024-05-01"))?;
  env.state.add_cotizacion(cotizacion("q3", "1", EstadoCotizacion::Ganado, "2024-04-30"))?;
  env.state.login("admin", "admin")?;

  let avance = env.state.cumplimiento_presupuestos(2024, 4)?;
  assert_eq!(avance.len(), 1);
  assert!((avance[0].vendido - 285.6).abs() < 1e-9);
  assert!((avance[0].porcentaje - 28.56).abs() < 1e-9);
  assert!(env.state.cumplimiento_presupuestos(2024, 3)?.is_empty());
  Ok(())
}
