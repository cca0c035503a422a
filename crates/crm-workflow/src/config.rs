use serde::{Deserialize, Serialize};

pub const CORREO_LOGISTICA_POR_DEFECTO: &str = "logistica@helpsoluciones.com.co";
pub const DB_URL_POR_DEFECTO: &str = "crm.db";

/// Configuración del núcleo, leída del entorno (y de `.env` si existe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Ruta/URL de la base SQLite (`CRM_DB_URL`, o `DATABASE_URL`).
    pub database_url: String,
    /// Buzón interno de logística que recibe cada despacho nuevo
    /// (`CRM_CORREO_LOGISTICA`).
    pub correo_logistica: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        CrmConfig { database_url: DB_URL_POR_DEFECTO.to_string(),
                    correo_logistica: CORREO_LOGISTICA_POR_DEFECTO.to_string() }
    }
}

impl CrmConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = CrmConfig::default();
        let database_url = std::env::var("CRM_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                                      .unwrap_or(defaults.database_url);
        let correo_logistica = std::env::var("CRM_CORREO_LOGISTICA").ok()
                                                                    .filter(|v| !v.trim().is_empty())
                                                                    .unwrap_or(defaults.correo_logistica);
        CrmConfig { database_url, correo_logistica }
    }
}
