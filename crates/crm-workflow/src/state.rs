// Archivo: state.rs
// Propósito: contenedor de estado del CRM. Dueño de los almacenes, la sesión
// y el índice cotización → despacho. Cada mutación trabaja sobre una copia,
// escribe el snapshot y sólo entonces reemplaza el almacén en memoria; las
// notificaciones se piden después de confirmar.
use crate::access::AccessControl;
use crate::automation::AutomationEngine;
use crate::config::CrmConfig;
use crate::errors::WorkflowError;
use crate::metrics::{CumplimientoPresupuesto, DashboardMetrics, MetricsEngine};
use crate::notification::{Notificacion, NotificationGateway};
use chrono::NaiveDate;
use crm_domain::{AppUser, Cliente, Conductor, Cotizacion, Despacho, DomainError, DomainStubs, Entidad, EntityStore,
                 OrdenCompra, Producto, Proveedor, Reparacion, SalesBudget};
use crm_persistence::{PersistenceLayer, Sesion};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Fuente de la fecha "hoy". Inyectable para pruebas.
pub type Reloj = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct CrmState {
    persistence: PersistenceLayer,
    gateway: Arc<dyn NotificationGateway>,
    automation: AutomationEngine,
    reloj: Reloj,

    clientes: EntityStore<Cliente>,
    proveedores: EntityStore<Proveedor>,
    productos: EntityStore<Producto>,
    cotizaciones: EntityStore<Cotizacion>,
    ordenes_compra: EntityStore<OrdenCompra>,
    despachos: EntityStore<Despacho>,
    conductores: EntityStore<Conductor>,
    reparaciones: EntityStore<Reparacion>,
    usuarios: EntityStore<AppUser>,
    presupuestos: EntityStore<SalesBudget>,

    /// cotizacionId → despachoId. Garantiza un único despacho por cotización.
    despacho_por_cotizacion: HashMap<String, String>,
    sesion: Sesion,
}

/// Aplica `f` sobre una copia de `store`, persiste la copia y la confirma.
/// Si `f` o la escritura fallan, `store` queda intacto.
fn mutar<T, R, F>(persistence: &PersistenceLayer, store: &mut EntityStore<T>, f: F) -> Result<R, WorkflowError>
    where T: Entidad,
          F: FnOnce(&mut EntityStore<T>) -> Result<R, WorkflowError>
{
    let mut copia = store.clone();
    let resultado = f(&mut copia)?;
    persistence.guardar(&copia)?;
    log::debug!("snapshot {} escrito ({} registros)", T::CLAVE, copia.len());
    *store = copia;
    Ok(resultado)
}

/// Genera un id v4 que no esté en uso dentro de `store`.
pub fn generar_id<T: Entidad>(store: &EntityStore<T>) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !store.contains(&id) {
            return id;
        }
    }
}

fn contar_admins(usuarios: &EntityStore<AppUser>) -> usize {
    usuarios.list().iter().filter(|u| u.es_admin()).count()
}

impl CrmState {
    /// Carga todos los almacenes (con semillas de respaldo), reconstruye el
    /// índice de despachos y restaura la sesión. Un error de lectura del
    /// backend aborta la carga.
    pub fn cargar(persistence: PersistenceLayer,
                  gateway: Arc<dyn NotificationGateway>,
                  config: &CrmConfig)
                  -> Result<Self, WorkflowError> {
        let clientes = persistence.cargar(DomainStubs::clientes)?;
        let proveedores = persistence.cargar(DomainStubs::proveedores)?;
        let productos = persistence.cargar(DomainStubs::productos)?;
        let cotizaciones = persistence.cargar(Vec::new)?;
        let ordenes_compra = persistence.cargar(Vec::new)?;
        let despachos: EntityStore<Despacho> = persistence.cargar(Vec::new)?;
        let conductores = persistence.cargar(Vec::new)?;
        let reparaciones = persistence.cargar(Vec::new)?;
        let usuarios: EntityStore<AppUser> = persistence.cargar(DomainStubs::usuarios)?;
        let presupuestos = persistence.cargar(Vec::new)?;

        // El almacén va del más reciente al más antiguo: gana el primero.
        let mut despacho_por_cotizacion = HashMap::with_capacity(despachos.len());
        for d in despachos.list() {
            despacho_por_cotizacion.entry(d.cotizacion_id.clone()).or_insert_with(|| d.id.clone());
        }

        let mut sesion = persistence.cargar_sesion()?;
        if sesion.usuario.is_none() {
            sesion.usuario = usuarios.list().first().cloned();
        }

        log::info!("estado cargado: {} cotizaciones, {} despachos, {} usuarios",
                   cotizaciones.len(),
                   despachos.len(),
                   usuarios.len());

        Ok(Self { persistence,
                  gateway,
                  automation: AutomationEngine::new(config),
                  reloj: Arc::new(|| chrono::Local::now().date_naive()),
                  clientes,
                  proveedores,
                  productos,
                  cotizaciones,
                  ordenes_compra,
                  despachos,
                  conductores,
                  reparaciones,
                  usuarios,
                  presupuestos,
                  despacho_por_cotizacion,
                  sesion })
    }

    pub fn with_reloj<F>(mut self, reloj: F) -> Self
        where F: Fn() -> NaiveDate + Send + Sync + 'static
    {
        self.reloj = Arc::new(reloj);
        self
    }

    fn hoy(&self) -> NaiveDate {
        (self.reloj)()
    }

    fn hoy_iso(&self) -> String {
        self.hoy().format("%Y-%m-%d").to_string()
    }

    /// Entrega sin afectar el estado: los fallos sólo se registran.
    fn notificar(&self, notificaciones: &[Notificacion]) {
        for n in notificaciones {
            if let Err(e) = self.gateway.notify(n) {
                log::warn!("no se pudo notificar a {}: {}", n.destino, e);
            }
        }
    }

    // ---- lecturas --------------------------------------------------------

    pub fn clientes(&self) -> &[Cliente] {
        self.clientes.list()
    }

    pub fn proveedores(&self) -> &[Proveedor] {
        self.proveedores.list()
    }

    pub fn productos(&self) -> &[Producto] {
        self.productos.list()
    }

    pub fn cotizaciones(&self) -> &[Cotizacion] {
        self.cotizaciones.list()
    }

    pub fn ordenes_compra(&self) -> &[OrdenCompra] {
        self.ordenes_compra.list()
    }

    /// Más reciente primero.
    pub fn despachos(&self) -> &[Despacho] {
        self.despachos.list()
    }

    pub fn conductores(&self) -> &[Conductor] {
        self.conductores.list()
    }

    pub fn reparaciones(&self) -> &[Reparacion] {
        self.reparaciones.list()
    }

    pub fn usuarios(&self) -> &[AppUser] {
        self.usuarios.list()
    }

    pub fn presupuestos(&self) -> &[SalesBudget] {
        self.presupuestos.list()
    }

    pub fn despacho_de_cotizacion(&self, cotizacion_id: &str) -> Option<&Despacho> {
        self.despacho_por_cotizacion.get(cotizacion_id).and_then(|id| self.despachos.get(id))
    }

    pub fn sesion_activa(&self) -> bool {
        self.sesion.activa
    }

    /// Usuario actual (persistido o, en su defecto, el primero del almacén),
    /// aunque la sesión no esté activa.
    pub fn usuario_actual(&self) -> Option<&AppUser> {
        self.sesion.usuario.as_ref()
    }

    fn usuario_sesion(&self) -> Result<&AppUser, WorkflowError> {
        match (self.sesion.activa, self.sesion.usuario.as_ref()) {
            (true, Some(u)) => Ok(u),
            _ => Err(DomainError::SinSesion.into()),
        }
    }

    pub fn visible_cotizaciones(&self) -> Result<Vec<&Cotizacion>, WorkflowError> {
        Ok(AccessControl::visible(self.cotizaciones.list(), self.usuario_sesion()?))
    }

    pub fn visible_ordenes_compra(&self) -> Result<Vec<&OrdenCompra>, WorkflowError> {
        Ok(AccessControl::visible(self.ordenes_compra.list(), self.usuario_sesion()?))
    }

    pub fn visible_despachos(&self) -> Result<Vec<&Despacho>, WorkflowError> {
        Ok(AccessControl::visible(self.despachos.list(), self.usuario_sesion()?))
    }

    /// Tablero del usuario de la sesión, calculado sobre lo que puede ver.
    pub fn dashboard_metrics(&self, as_of: NaiveDate) -> Result<DashboardMetrics, WorkflowError> {
        let cotizaciones = self.visible_cotizaciones()?;
        let despachos = self.visible_despachos()?;
        Ok(MetricsEngine::dashboard(&cotizaciones, &despachos, as_of))
    }

    /// Cumplimiento de presupuestos del mes (`mes` 0-11). Un usuario no
    /// administrador sólo ve el propio.
    pub fn cumplimiento_presupuestos(&self, anio: i32, mes: u32) -> Result<Vec<CumplimientoPresupuesto>, WorkflowError> {
        let usuario = self.usuario_sesion()?;
        let cotizaciones = self.visible_cotizaciones()?;
        let presupuestos: Vec<SalesBudget> = self.presupuestos
                                                 .list()
                                                 .iter()
                                                 .filter(|b| usuario.es_admin() || b.usuario_id == usuario.id)
                                                 .cloned()
                                                 .collect();
        Ok(MetricsEngine::cumplimiento_presupuestos(&cotizaciones, &presupuestos, anio, mes))
    }

    // ---- sesión ----------------------------------------------------------

    pub fn login(&mut self, usuario: &str, password: &str) -> Result<AppUser, WorkflowError> {
        let encontrado = self.usuarios
                             .list()
                             .iter()
                             .find(|u| u.usuario == usuario.trim() && u.verificar_password(password))
                             .cloned();
        let Some(user) = encontrado else {
            log::info!("login rechazado para '{}'", usuario);
            return Err(DomainError::CredencialesInvalidas.into());
        };
        let sesion = Sesion { activa: true, usuario: Some(user.clone()) };
        self.persistence.guardar_sesion(&sesion)?;
        self.sesion = sesion;
        log::info!("sesión iniciada: {} ({:?})", user.usuario, user.rol);
        Ok(user)
    }

    /// Cierra la sesión. La copia del usuario actual se conserva.
    pub fn logout(&mut self) -> Result<(), WorkflowError> {
        let sesion = Sesion { activa: false, usuario: self.sesion.usuario.clone() };
        self.persistence.guardar_sesion(&sesion)?;
        self.sesion = sesion;
        log::info!("sesión cerrada");
        Ok(())
    }

    // ---- maestros --------------------------------------------------------

    pub fn add_cliente(&mut self, cliente: Cliente) -> Result<(), WorkflowError> {
        mutar(&self.persistence, &mut self.clientes, |s| Ok(s.add(cliente)?))
    }

    pub fn update_cliente(&mut self, cliente: Cliente) -> Result<bool, WorkflowError> {
        mutar(&self.persistence, &mut self.clientes, |s| Ok(s.update(cliente)))
    }

    pub fn delete_cliente(&mut self, id: &str) -> Result<Option<Cliente>, WorkflowError> {
        mutar(&self.persistence, &mut self.clientes, |s| Ok(s.delete(id)))
    }

    pub fn add_proveedor(&mut self, proveedor: Proveedor) -> Result<(), WorkflowError> {
        mutar(&self.persistence, &mut self.proveedores, |s| Ok(s.add(proveedor)?))
    }

    pub fn update_proveedor(&mut self, proveedor: Proveedor) -> Result<bool, WorkflowError> {
        mutar(&self.persistence, &mut self.proveedores, |s| Ok(s.update(proveedor)))
    }

    pub fn delete_proveedor(&mut self, id: &str) -> Result<Option<Proveedor>, WorkflowError> {
        mutar(&self.persistence, &mut self.proveedores, |s| Ok(s.delete(id)))
    }

    /// Un producto nuevo sin historial recibe la entrada inicial con su
    /// precio de compra.
    pub fn add_producto(&mut self, producto: Producto) -> Result<(), WorkflowError> {
        let producto = producto.con_historial_inicial(&self.hoy_iso());
        mutar(&self.persistence, &mut self.productos, |s| Ok(s.add(producto)?))
    }

    /// Conserva el historial almacenado y agrega una entrada si cambió el
    /// precio de compra.
    pub fn update_producto(&mut self, producto: Producto) -> Result<bool, WorkflowError> {
        let fecha = self.hoy_iso();
        mutar(&self.persistence, &mut self.productos, |s| {
            let producto = match s.get(&producto.id) {
                Some(almacenado) => producto.con_historial_de(almacenado, &fecha),
                None => return Ok(false),
            };
            Ok(s.update(producto))
        })
    }

    pub fn delete_producto(&mut self, id: &str) -> Result<Option<Producto>, WorkflowError> {
        mutar(&self.persistence, &mut self.productos, |s| Ok(s.delete(id)))
    }

    pub fn add_conductor(&mut self, conductor: Conductor) -> Result<(), WorkflowError> {
        mutar(&self.persistence, &mut self.conductores, |s| Ok(s.add(conductor)?))
    }

    pub fn update_conductor(&mut self, conductor: Conductor) -> Result<bool, WorkflowError> {
        mutar(&self.persistence, &mut self.conductores, |s| Ok(s.update(conductor)))
    }

    pub fn delete_conductor(&mut self, id: &str) -> Result<Option<Conductor>, WorkflowError> {
        mutar(&self.persistence, &mut self.conductores, |s| Ok(s.delete(id)))
    }

    pub fn add_reparacion(&mut self, reparacion: Reparacion) -> Result<(), WorkflowError> {
        mutar(&self.persistence, &mut self.reparaciones, |s| Ok(s.add(reparacion)?))
    }

    pub fn update_reparacion(&mut self, reparacion: Reparacion) -> Result<bool, WorkflowError> {
        mutar(&self.persistence, &mut self.reparaciones, |s| Ok(s.update(reparacion)))
    }

    pub fn delete_reparacion(&mut self, id: &str) -> Result<Option<Reparacion>, WorkflowError> {
        mutar(&self.persistence, &mut self.reparaciones, |s| Ok(s.delete(id)))
    }

    // ---- documentos ------------------------------------------------------

    pub fn add_cotizacion(&mut self, cotizacion: Cotizacion) -> Result<(), WorkflowError> {
        let cotizacion = cotizacion.con_totales();
        mutar(&self.persistence, &mut self.cotizaciones, |s| Ok(s.add(cotizacion)?))
    }

    /// Reemplaza la cotización (con totales recalculados) y aplica la regla
    /// de cotización ganada. Devuelve el despacho creado, si hubo uno.
    pub fn update_cotizacion(&mut self, cotizacion: Cotizacion) -> Result<Option<Despacho>, WorkflowError> {
        let cotizacion = cotizacion.con_totales();
        let mut cotizaciones = self.cotizaciones.clone();
        if !cotizaciones.update(cotizacion.clone()) {
            log::debug!("cotización {} no existe; nada que actualizar", cotizacion.id);
            return Ok(None);
        }

        let ya_tiene_despacho = self.despacho_por_cotizacion.contains_key(&cotizacion.id);
        let generado = self.automation.cotizacion_actualizada(&cotizacion,
                                                              ya_tiene_despacho,
                                                              self.productos.list(),
                                                              self.clientes.list(),
                                                              self.hoy(),
                                                              || generar_id(&self.despachos));

        let mut despachos = self.despachos.clone();
        if let Some(g) = &generado {
            despachos.add(g.despacho.clone())?;
        }

        self.persistence.guardar(&cotizaciones)?;
        if generado.is_some() {
            self.persistence.guardar(&despachos)?;
        }

        self.cotizaciones = cotizaciones;
        let Some(generado) = generado else {
            return Ok(None);
        };
        self.despachos = despachos;
        self.despacho_por_cotizacion
            .insert(cotizacion.id.clone(), generado.despacho.id.clone());
        log::info!("cotización {} ganada: despacho {} creado",
                   cotizacion.consecutivo,
                   generado.despacho.id);

        self.notificar(&generado.notificaciones);
        Ok(Some(generado.despacho))
    }

    pub fn delete_cotizacion(&mut self, id: &str) -> Result<Option<Cotizacion>, WorkflowError> {
        mutar(&self.persistence, &mut self.cotizaciones, |s| Ok(s.delete(id)))
    }

    pub fn add_orden_compra(&mut self, orden: OrdenCompra) -> Result<(), WorkflowError> {
        let orden = orden.con_totales();
        mutar(&self.persistence, &mut self.ordenes_compra, |s| Ok(s.add(orden)?))
    }

    pub fn update_orden_compra(&mut self, orden: OrdenCompra) -> Result<bool, WorkflowError> {
        let orden = orden.con_totales();
        mutar(&self.persistence, &mut self.ordenes_compra, |s| Ok(s.update(orden)))
    }

    pub fn delete_orden_compra(&mut self, id: &str) -> Result<Option<OrdenCompra>, WorkflowError> {
        mutar(&self.persistence, &mut self.ordenes_compra, |s| Ok(s.delete(id)))
    }

    /// Reemplaza el despacho y, si cambió de estado, avisa al ejecutivo. La
    /// cotización de origen es inmutable: un despacho no se puede reasignar.
    pub fn update_despacho(&mut self, despacho: Despacho) -> Result<bool, WorkflowError> {
        let Some(anterior) = self.despachos.get(&despacho.id) else {
            return Ok(false);
        };
        if anterior.cotizacion_id != despacho.cotizacion_id {
            return Err(DomainError::Validacion(format!("el despacho {} pertenece a la cotización {}",
                                                       despacho.id, anterior.cotizacion_id)).into());
        }
        let aviso = self.automation.despacho_actualizado(Some(anterior), &despacho);

        mutar(&self.persistence, &mut self.despachos, |s| Ok(s.update(despacho)))?;
        if let Some(n) = aviso {
            self.notificar(std::slice::from_ref(&n));
        }
        Ok(true)
    }

    /// Mensaje directo (WhatsApp/SMS) a un cliente o conductor. A diferencia
    /// de los avisos automáticos, el fallo de entrega se devuelve al llamador.
    pub fn enviar_mensaje(&self, telefono: &str, cuerpo: &str) -> Result<(), WorkflowError> {
        let mensaje = Notificacion::mensaje(telefono, cuerpo);
        if mensaje.destino.is_empty() {
            return Err(DomainError::Validacion("el teléfono de destino está vacío".to_string()).into());
        }
        self.gateway.notify(&mensaje)?;
        log::info!("mensaje enviado a {}", mensaje.destino);
        Ok(())
    }

    pub fn delete_despacho(&mut self, id: &str) -> Result<Option<Despacho>, WorkflowError> {
        let eliminado = mutar(&self.persistence, &mut self.despachos, |s| Ok(s.delete(id)))?;
        if let Some(d) = &eliminado {
            if self.despacho_por_cotizacion.get(&d.cotizacion_id) == Some(&d.id) {
                self.despacho_por_cotizacion.remove(&d.cotizacion_id);
            }
        }
        Ok(eliminado)
    }

    // ---- usuarios y presupuestos -----------------------------------------

    pub fn add_user(&mut self, usuario: AppUser) -> Result<(), WorkflowError> {
        usuario.validar()?;
        let usuario = usuario.con_password_hasheado();
        mutar(&self.persistence, &mut self.usuarios, |s| Ok(s.add(usuario)?))
    }

    /// Una contraseña vacía o ausente conserva la almacenada. Si el usuario
    /// editado es el de la sesión, su copia se actualiza también.
    pub fn update_user(&mut self, usuario: AppUser) -> Result<bool, WorkflowError> {
        usuario.validar()?;
        let Some(almacenado) = self.usuarios.get(&usuario.id) else {
            return Ok(false);
        };
        if almacenado.es_admin() && !usuario.es_admin() && contar_admins(&self.usuarios) == 1 {
            return Err(DomainError::UltimoAdministrador.into());
        }
        let mut usuario = usuario;
        if usuario.password.as_deref().map_or(true, |p| p.is_empty()) {
            usuario.password = almacenado.password.clone();
        }
        let usuario = usuario.con_password_hasheado();

        let copia = usuario.clone();
        mutar(&self.persistence, &mut self.usuarios, |s| Ok(s.update(copia)))?;

        if self.sesion.usuario.as_ref().is_some_and(|u| u.id == usuario.id) {
            let sesion = Sesion { activa: self.sesion.activa, usuario: Some(usuario) };
            self.persistence.guardar_sesion(&sesion)?;
            self.sesion = sesion;
        }
        Ok(true)
    }

    /// Requiere sesión: el usuario actuante no puede eliminarse a sí mismo y
    /// el último administrador no se puede eliminar.
    pub fn delete_user(&mut self, id: &str) -> Result<Option<AppUser>, WorkflowError> {
        let actuante = self.usuario_sesion()?;
        if actuante.id == id {
            return Err(DomainError::AutoEliminacion.into());
        }
        let es_ultimo_admin = self.usuarios
                                  .get(id)
                                  .is_some_and(|u| u.es_admin() && contar_admins(&self.usuarios) == 1);
        if es_ultimo_admin {
            return Err(DomainError::UltimoAdministrador.into());
        }
        mutar(&self.persistence, &mut self.usuarios, |s| Ok(s.delete(id)))
    }

    pub fn add_budget(&mut self, presupuesto: SalesBudget) -> Result<(), WorkflowError> {
        presupuesto.validar()?;
        mutar(&self.persistence, &mut self.presupuestos, |s| {
            if s.list().iter().any(|b| b.mismo_periodo(&presupuesto)) {
                return Err(DomainError::PresupuestoDuplicado { usuario_id: presupuesto.usuario_id.clone(),
                                                               anio: presupuesto.anio,
                                                               mes: presupuesto.mes }.into());
            }
            Ok(s.add(presupuesto)?)
        })
    }

    pub fn update_budget(&mut self, presupuesto: SalesBudget) -> Result<bool, WorkflowError> {
        presupuesto.validar()?;
        mutar(&self.persistence, &mut self.presupuestos, |s| {
            if s.list().iter().any(|b| b.id != presupuesto.id && b.mismo_periodo(&presupuesto)) {
                return Err(DomainError::PresupuestoDuplicado { usuario_id: presupuesto.usuario_id.clone(),
                                                               anio: presupuesto.anio,
                                                               mes: presupuesto.mes }.into());
            }
            Ok(s.update(presupuesto))
        })
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<Option<SalesBudget>, WorkflowError> {
        mutar(&self.persistence, &mut self.presupuestos, |s| Ok(s.delete(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_persistence::{InMemorySnapshotRepository, SnapshotRepository};

    fn layer() -> (Arc<InMemorySnapshotRepository>, PersistenceLayer) {
        let repo = Arc::new(InMemorySnapshotRepository::new());
        let layer = PersistenceLayer::new(repo.clone());
        (repo, layer)
    }

    #[test]
    fn fresh_state_uses_seeds_and_first_user_as_current() -> Result<(), WorkflowError> {
        let (_, layer) = layer();
        let state = CrmState::cargar(layer, Arc::new(crate::LogNotificationGateway), &CrmConfig::default())?;
        assert_eq!(state.clientes().len(), 1);
        assert_eq!(state.usuarios().len(), 1);
        assert_eq!(state.usuario_actual().map(|u| u.usuario.as_str()), Some("admin"));
        assert!(!state.sesion_activa());
        assert!(matches!(state.visible_cotizaciones(), Err(WorkflowError::Domain(DomainError::SinSesion))));
        Ok(())
    }

    #[test]
    fn mutation_writes_whole_collection() -> Result<(), WorkflowError> {
        let (repo, layer) = layer();
        let mut state = CrmState::cargar(layer, Arc::new(crate::LogNotificationGateway), &CrmConfig::default())?;
        let mut cliente = state.clientes()[0].clone();
        cliente.id = "2".into();
        cliente.nombre = "Otro".into();
        state.add_cliente(cliente)?;
        let raw = repo.leer("hs_clientes")?.unwrap_or_default();
        let guardados: Vec<Cliente> = serde_json::from_str(&raw).map_err(crm_persistence::PersistenceError::from)?;
        assert_eq!(guardados.len(), 2);
        assert_eq!(guardados[1].nombre, "Otro");
        Ok(())
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let store: EntityStore<Cliente> = EntityStore::from_vec(DomainStubs::clientes());
        let id = generar_id(&store);
        assert!(!store.contains(&id));
        assert_eq!(id.len(), 36);
    }
}
