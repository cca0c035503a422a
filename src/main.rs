use chrono::Local;
use crm_domain::{AppUser, Cotizacion, CotizacionItem, EstadoCotizacion, EstadoDespacho, Modulo};
use crm_persistence::{DieselSnapshotRepository, PersistenceLayer};
use crm_workflow::{AccessControl, Actividad, CrmConfig, CrmState, LogNotificationGateway};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;

/// Menú interactivo sobre el núcleo del CRM usando la base SQLite
/// configurada en el entorno.
///
/// Opciones soportadas:
/// 1) Tablero del mes
/// 2) Ver cotizaciones
/// 3) Crear cotización
/// 4) Cambiar estado de una cotización
/// 5) Ver despachos
/// 6) Cambiar estado de un despacho (y avisar al cliente por mensaje)
/// 7) Cerrar sesión
/// 8) Salir
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CrmConfig::from_env();
    log::info!("usando base de datos {}", config.database_url);
    let repo = DieselSnapshotRepository::new(&config.database_url)?;
    let mut state = CrmState::cargar(PersistenceLayer::new(Arc::new(repo)), Arc::new(LogNotificationGateway), &config)?;

    loop {
        if !state.sesion_activa() && !iniciar_sesion(&mut state)? {
            break;
        }
        let Some(usuario) = state.usuario_actual().cloned() else {
            continue;
        };

        println!("\n== CRM ({}) ==", usuario.nombre);
        let modulos: Vec<&str> = AccessControl::menu(&usuario).iter().map(|m| m.etiqueta()).collect();
        println!("Módulos: {}", modulos.join(" | "));
        println!("1) Tablero del mes");
        println!("2) Ver cotizaciones");
        println!("3) Crear cotización");
        println!("4) Cambiar estado de una cotización");
        println!("5) Ver despachos");
        println!("6) Cambiar estado de un despacho");
        println!("7) Cerrar sesión");
        println!("8) Salir");
        let choice = prompt("Elige una opción: ")?;

        let resultado = match choice.trim() {
            "1" => tablero(&state, &usuario),
            "2" => listar_cotizaciones(&state, &usuario),
            "3" => crear_cotizacion(&mut state, &usuario),
            "4" => cambiar_estado_cotizacion(&mut state, &usuario),
            "5" => listar_despachos(&state, &usuario),
            "6" => cambiar_estado_despacho(&mut state, &usuario),
            "7" => state.logout().map_err(|e| Box::new(e) as Box<dyn Error>),
            "8" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
                Ok(())
            }
        };
        if let Err(e) = resultado {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

/// Devuelve `false` si el usuario pidió salir.
fn iniciar_sesion(state: &mut CrmState) -> Result<bool, Box<dyn Error>> {
    loop {
        let usuario = prompt("Usuario ('salir' para terminar): ")?;
        if usuario.trim() == "salir" {
            return Ok(false);
        }
        let password = prompt("Contraseña: ")?;
        match state.login(usuario.trim(), password.trim()) {
            Ok(u) => {
                println!("Bienvenido, {}", u.nombre);
                return Ok(true);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}

fn tablero(state: &CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Dashboard)?;
    let m = state.dashboard_metrics(Local::now().date_naive())?;
    println!("\nPeriodo {}-{:02}", m.anio, m.mes);
    println!("Cotizaciones del mes: {} (mes anterior {}, {:+.1}%)",
             m.cotizaciones_mes, m.cotizaciones_mes_anterior, m.crecimiento_pct);
    println!("Ganadas: {} por {:.2}", m.ganadas_mes, m.ingresos_ganados_mes);
    println!("Despachos entregados: {} | en tránsito: {}", m.despachos_entregados, m.despachos_en_transito);
    println!("Actividad reciente:");
    for a in &m.actividad_reciente {
        match a {
            Actividad::Cotizacion { consecutivo, cliente_nombre, ganada, .. } => {
                println!("  cotización {} - {}{}", consecutivo, cliente_nombre, if *ganada { " (ganada)" } else { "" })
            }
            Actividad::Despacho { consecutivo_cotizacion, estado, .. } => {
                println!("  despacho de {} - {}", consecutivo_cotizacion, estado)
            }
        }
    }
    if prompt("¿Ver en JSON? (s/n): ")?.trim().eq_ignore_ascii_case("s") {
        println!("{}", serde_json::to_string_pretty(&m)?);
    }
    Ok(())
}

fn listar_cotizaciones(state: &CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Cotizaciones)?;
    println!("\nID                                   | CONSECUTIVO | FECHA      | CLIENTE              | TOTAL        | ESTADO");
    println!("---------------------------------------------------------------------------------------------------------------");
    for c in state.visible_cotizaciones()? {
        println!("{:36} | {:11} | {:10} | {:20} | {:>12.2} | {}",
                 c.id, c.consecutivo, c.fecha, c.cliente_nombre, c.total, c.estado);
    }
    Ok(())
}

fn crear_cotizacion(state: &mut CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Cotizaciones)?;
    for c in state.clientes() {
        println!("  [{}] {}", c.id, c.nombre);
    }
    let cliente_id = prompt("Cliente id: ")?;
    let Some(cliente) = state.clientes().iter().find(|c| c.id == cliente_id.trim()).cloned() else {
        eprintln!("Cliente inexistente");
        return Ok(());
    };

    let mut items = Vec::new();
    loop {
        for p in state.productos() {
            println!("  [{}] {} ({}) costo {:.2}", p.id, p.nombre, p.num_part, p.precio_compra);
        }
        let producto_id = prompt("Producto id (enter para terminar): ")?;
        if producto_id.trim().is_empty() {
            break;
        }
        let Some(producto) = state.productos().iter().find(|p| p.id == producto_id.trim()).cloned() else {
            eprintln!("Producto inexistente");
            continue;
        };
        let cantidad = prompt_f64("Cantidad", 1.0)?;
        let costo_unitario = prompt_f64("Costo unitario", producto.precio_compra)?;
        let utilidad = prompt_f64("Utilidad %", 20.0)?;
        let iva = prompt_f64("IVA %", 19.0)?;
        items.push(CotizacionItem { id: Uuid::new_v4().to_string(),
                                    producto_id: producto.id.clone(),
                                    proveedor_id: String::new(),
                                    unidad: producto.unidad.clone(),
                                    cantidad,
                                    costo_unitario,
                                    utilidad,
                                    iva });
    }
    if items.is_empty() {
        println!("Cotización sin líneas; no se crea");
        return Ok(());
    }

    let cotizacion = Cotizacion { id: Uuid::new_v4().to_string(),
                                  fecha: Local::now().format("%Y-%m-%d").to_string(),
                                  cliente_id: cliente.id.clone(),
                                  cliente_nombre: cliente.nombre.clone(),
                                  consecutivo: format!("COT-{}", state.cotizaciones().len() + 1),
                                  items,
                                  subtotal: 0.0,
                                  iva: 0.0,
                                  total: 0.0,
                                  ejecutivo: usuario.nombre.clone(),
                                  ejecutivo_email: usuario.email.clone(),
                                  ejecutivo_telefono: Some(usuario.telefono.clone()).filter(|t| !t.is_empty()),
                                  usuario_id: usuario.id.clone(),
                                  estado: EstadoCotizacion::Seguimiento };
    let consecutivo = cotizacion.consecutivo.clone();
    state.add_cotizacion(cotizacion)?;
    println!("Cotización creada: {}", consecutivo);
    Ok(())
}

fn cambiar_estado_cotizacion(state: &mut CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Cotizaciones)?;
    let id = prompt("Cotización id: ")?;
    let Some(mut cotizacion) = state.visible_cotizaciones()?.into_iter().find(|c| c.id == id.trim()).cloned() else {
        eprintln!("Cotización no encontrada");
        return Ok(());
    };
    cotizacion.estado = match prompt("Nuevo estado (1 Seguimiento, 2 Ganado, 3 Perdido): ")?.trim() {
        "1" => EstadoCotizacion::Seguimiento,
        "2" => EstadoCotizacion::Ganado,
        "3" => EstadoCotizacion::Perdido,
        other => {
            eprintln!("Estado inválido: {}", other);
            return Ok(());
        }
    };
    match state.update_cotizacion(cotizacion)? {
        Some(d) => println!("Cotización actualizada; despacho generado: {}", d.id),
        None => println!("Cotización actualizada"),
    }
    Ok(())
}

fn listar_despachos(state: &CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Logistica)?;
    println!("\nID                                   | COTIZACIÓN  | SOLICITUD  | CLIENTE              | ESTADO");
    println!("-------------------------------------------------------------------------------------------------");
    for d in state.visible_despachos()? {
        println!("{:36} | {:11} | {:10} | {:20} | {}",
                 d.id, d.consecutivo_cotizacion, d.fecha_solicitud, d.cliente_nombre, d.estado);
    }
    Ok(())
}

fn cambiar_estado_despacho(state: &mut CrmState, usuario: &AppUser) -> Result<(), Box<dyn Error>> {
    AccessControl::exigir(usuario, Modulo::Logistica)?;
    let id = prompt("Despacho id: ")?;
    let Some(mut despacho) = state.visible_despachos()?.into_iter().find(|d| d.id == id.trim()).cloned() else {
        eprintln!("Despacho no encontrado");
        return Ok(());
    };
    for (i, e) in EstadoDespacho::TODOS.iter().enumerate() {
        println!("  {}) {}", i + 1, e);
    }
    let opcion = prompt("Nuevo estado: ")?;
    let Some(estado) = opcion.trim()
                             .parse::<usize>()
                             .ok()
                             .and_then(|n| n.checked_sub(1))
                             .and_then(|i| EstadoDespacho::TODOS.get(i).copied())
    else {
        eprintln!("Estado inválido");
        return Ok(());
    };
    despacho.estado = estado;
    let cliente_id = despacho.cliente_id.clone();
    state.update_despacho(despacho)?;
    println!("Despacho actualizado a {}", estado);

    let Some(telefono) = state.clientes().iter().find(|c| c.id == cliente_id).map(|c| c.telefono.clone()) else {
        return Ok(());
    };
    if telefono.trim().is_empty() {
        return Ok(());
    }
    if prompt(&format!("¿Avisar al cliente al {}? (s/n): ", telefono))?.trim().eq_ignore_ascii_case("s") {
        state.enviar_mensaje(&telefono, &format!("Su pedido cambió a estado: {}", estado))?;
    }
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

fn prompt_f64(msg: &str, defecto: f64) -> io::Result<f64> {
    let s = prompt(&format!("{} [{}]: ", msg, defecto))?;
    Ok(s.trim().parse().unwrap_or(defecto))
}
