use time::PrimitiveDateTime;

pub(crate) async fn exists(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM bootstrap_markers WHERE name = $1)")
        .bind(name)
        .fetch_one(executor)
        .await
}

/// Returns false if another run recorded the marker first.
pub(crate) async fn record(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
    completed_at: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO bootstrap_markers (name, completed_at) VALUES ($1,$2)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(name)
    .bind(completed_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
