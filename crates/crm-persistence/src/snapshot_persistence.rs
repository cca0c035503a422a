use crate::errors::{PersistenceError, Result};
use crate::repository::SnapshotRepository;
use crate::schema::snapshots::dsl;
use crate::schema;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Repositorio de snapshots sobre SQLite (Diesel + pool r2d2).
pub struct DieselSnapshotRepository {
  pool: Arc<DbPool>,
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::snapshots)]
struct SnapshotRow {
  pub clave: String,
  pub payload: String,
  pub updated_at_ts: i64,
}

fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(|e| PersistenceError::Almacenamiento(format!("db: {}", e)))
}

impl DieselSnapshotRepository {
  /// Abre (o crea) la base SQLite en `database_url` y aplica las migraciones
  /// embebidas.
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| PersistenceError::Almacenamiento(format!("pool: {}", e)))?;
    let repo = DieselSnapshotRepository { pool: Arc::new(pool) };
    let mut c = repo.conn()?;
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    c.run_pending_migrations(MIGRATIONS)
     .map_err(|e| PersistenceError::Almacenamiento(format!("migraciones: {}", e)))?;
    drop(c);
    log::debug!("repositorio de snapshots abierto en {}", database_url);
    Ok(repo)
  }

  fn conn_raw(&self) -> std::result::Result<PooledConnection<ConnectionManager<SqliteConnection>>, r2d2::Error> {
    self.pool.get()
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    self.conn_raw().map_err(|e| PersistenceError::Almacenamiento(format!("pool: {}", e)))
  }

  /// Claves guardadas, en orden alfabético (útil para depuración).
  pub fn claves(&self) -> Result<Vec<String>> {
    let mut conn = self.conn()?;
    map_db_err(dsl::snapshots.select(dsl::clave).order(dsl::clave.asc()).load::<String>(&mut conn))
  }
}

impl SnapshotRepository for DieselSnapshotRepository {
  fn leer(&self, clave: &str) -> Result<Option<String>> {
    let mut conn = self.conn()?;
    map_db_err(dsl::snapshots.filter(dsl::clave.eq(clave))
                             .select(dsl::payload)
                             .first::<String>(&mut conn)
                             .optional())
  }

  fn escribir(&self, clave: &str, payload: &str) -> Result<()> {
    let mut conn = self.conn()?;
    let row = SnapshotRow { clave: clave.to_string(),
                            payload: payload.to_string(),
                            updated_at_ts: Utc::now().timestamp_millis() };
    // Reemplazo completo: borrar e insertar dentro de la misma transacción.
    map_db_err(conn.transaction::<_, DieselError, _>(|c| {
                     diesel::delete(dsl::snapshots.filter(dsl::clave.eq(clave))).execute(c)?;
                     diesel::insert_into(dsl::snapshots).values(&row).execute(c)?;
                     Ok(())
                   }))?;
    log::debug!("snapshot {} escrito ({} bytes)", clave, payload.len());
    Ok(())
  }

  fn eliminar(&self, clave: &str) -> Result<()> {
    let mut conn = self.conn()?;
    map_db_err(diesel::delete(dsl::snapshots.filter(dsl::clave.eq(clave))).execute(&mut conn))?;
    Ok(())
  }
}

/// Crea el repositorio desde las variables de entorno (`CRM_DB_URL` o
/// `DATABASE_URL`).
pub fn new_from_env() -> Result<DieselSnapshotRepository> {
  dotenvy::dotenv().ok();
  let url = std::env::var("CRM_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                       .map_err(|_| PersistenceError::Configuracion("CRM_DB_URL / DATABASE_URL not set".into()))?;
  let l = url.to_lowercase();
  if l.starts_with("postgres") || l.starts_with("mysql") {
    return Err(PersistenceError::Configuracion("crm-persistence sólo soporta SQLite".into()));
  }
  DieselSnapshotRepository::new(&url)
}
