use super::parsing::{
    env_optional, env_or_default, is_valid_cookie_name, parse_bool, parse_cors_origins,
    parse_environment, parse_u16, parse_u32, parse_u64,
};
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, RedisSettings,
    RuntimeSettings, ServerHost, ServerPort, ServerSettings, SessionSettings, Settings,
    TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("ATTENDANCE_HOST", "0.0.0.0");
        let port = env_or_default("ATTENDANCE_PORT", "8000");

        let environment = parse_environment(
            env_optional("ATTENDANCE_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("ATTENDANCE_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Attendance Tracker API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));

        let cookie_name = env_or_default("SESSION_COOKIE_NAME", "attendance_session");
        let session_ttl_minutes =
            parse_u64("SESSION_TTL_MINUTES", env_or_default("SESSION_TTL_MINUTES", "720"))?;
        let secure_cookie = env_optional("SESSION_COOKIE_SECURE")
            .map(|value| parse_bool(&value))
            .unwrap_or(environment.is_production());

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "attendance");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "attendance_db");
        let database_url = env_optional("DATABASE_URL");
        let max_connections = parse_u32(
            "DATABASE_MAX_CONNECTIONS",
            env_or_default("DATABASE_MAX_CONNECTIONS", "20"),
        )?;

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let first_superuser_email = env_or_default("FIRST_SUPERUSER_EMAIL", "admin@example.com");
        let first_superuser_name = env_or_default("FIRST_SUPERUSER_NAME", "Super Admin");
        let first_superuser_password = env_or_default("FIRST_SUPERUSER_PASSWORD", "");

        let log_level = env_or_default("ATTENDANCE_LOG_LEVEL", "info");
        let json = env_optional("ATTENDANCE_LOG_JSON")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);
        let prometheus_enabled = env_optional("PROMETHEUS_ENABLED")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version },
            session: SessionSettings {
                cookie_name,
                ttl_minutes: session_ttl_minutes,
                secure_cookie,
            },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            admin: AdminSettings {
                first_superuser_email,
                first_superuser_name,
                first_superuser_password,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn session(&self) -> &SessionSettings {
        &self.session
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_cookie_name(&self.session.cookie_name) {
            return Err(ConfigError::InvalidValue {
                field: "SESSION_COOKIE_NAME",
                value: self.session.cookie_name.clone(),
            });
        }

        if self.session.ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SESSION_TTL_MINUTES",
                value: "0".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if !self.session.secure_cookie {
            return Err(ConfigError::InvalidValue {
                field: "SESSION_COOKIE_SECURE",
                value: "false".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Environment;
    use crate::test_support;

    #[tokio::test]
    async fn defaults_load_in_development() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("SESSION_COOKIE_NAME");
        std::env::remove_var("SESSION_TTL_MINUTES");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.runtime().environment, Environment::Test);
        assert_eq!(settings.session().cookie_name, "attendance_session");
        assert_eq!(settings.session().ttl_minutes, 720);
        assert!(!settings.session().secure_cookie);
    }

    #[tokio::test]
    async fn zero_session_ttl_is_rejected() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("SESSION_TTL_MINUTES", "0");

        let err = Settings::load().unwrap_err();
        std::env::remove_var("SESSION_TTL_MINUTES");

        assert!(matches!(err, ConfigError::InvalidValue { field: "SESSION_TTL_MINUTES", .. }));
    }

    #[tokio::test]
    async fn strict_mode_requires_database_secret() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("POSTGRES_PASSWORD");
        std::env::set_var("ATTENDANCE_STRICT_CONFIG", "1");

        let err = Settings::load().unwrap_err();
        std::env::set_var("ATTENDANCE_STRICT_CONFIG", "0");

        assert!(matches!(err, ConfigError::MissingSecret("POSTGRES_PASSWORD")));
    }
}
