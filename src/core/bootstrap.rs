use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::AdminSettings;
use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::db::types::AdminLevel;
use crate::repositories;
use crate::repositories::users::NewIdentity;

pub(crate) const INITIAL_SEED_MARKER: &str = "initial_seed";

const DEFAULT_SEMESTERS: [&str; 2] = ["First Semester", "Second Semester"];
const DEFAULT_LEVELS: [&str; 4] = ["ND1", "ND2", "HND1", "HND2"];

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SeedReport {
    pub(crate) admin_created: bool,
    pub(crate) semesters_added: usize,
    pub(crate) levels_added: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BootstrapOutcome {
    AlreadySeeded,
    Seeded(SeedReport),
}

/// Seeds the super admin, default semesters and levels once. Later runs see the
/// marker row and change nothing.
pub(crate) async fn seed(pool: &PgPool, admin: &AdminSettings) -> anyhow::Result<BootstrapOutcome> {
    if repositories::bootstrap_markers::exists(pool, INITIAL_SEED_MARKER).await? {
        return Ok(BootstrapOutcome::AlreadySeeded);
    }

    if admin.first_superuser_password.is_empty() {
        anyhow::bail!("FIRST_SUPERUSER_PASSWORD must be set to create the super admin");
    }
    let email = admin.first_superuser_email.trim().to_lowercase();
    let hashed_password = security::hash_password(&admin.first_superuser_password)
        .context("hash super admin password")?;

    let now = primitive_now_utc();
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    if repositories::users::email_exists(&mut *tx, &email).await? {
        tracing::warn!(email = %email, "Super admin email already registered; not creating it");
    } else {
        let id = Uuid::new_v4().to_string();
        repositories::users::create_admin(
            &mut *tx,
            NewIdentity {
                id: &id,
                email: &email,
                hashed_password,
                name: admin.first_superuser_name.trim(),
                created_at: now,
            },
            AdminLevel::Super,
        )
        .await
        .context("create super admin")?;
        report.admin_created = true;
    }

    for name in DEFAULT_SEMESTERS {
        if repositories::semesters::ensure(&mut *tx, name, now).await? {
            report.semesters_added += 1;
        }
    }
    for name in DEFAULT_LEVELS {
        if repositories::levels::ensure(&mut *tx, name, now).await? {
            report.levels_added += 1;
        }
    }

    if !repositories::bootstrap_markers::record(&mut *tx, INITIAL_SEED_MARKER, now).await? {
        tx.rollback().await?;
        return Ok(BootstrapOutcome::AlreadySeeded);
    }
    tx.commit().await?;

    tracing::info!(
        admin_created = report.admin_created,
        semesters_added = report.semesters_added,
        levels_added = report.levels_added,
        action = "bootstrap_seed",
        "Initial data seeded"
    );
    Ok(BootstrapOutcome::Seeded(report))
}
