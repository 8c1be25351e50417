use sqlx::PgPool;

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub(crate) struct CatalogCounts {
    pub(crate) faculties: i64,
    pub(crate) departments: i64,
    pub(crate) levels: i64,
    pub(crate) semesters: i64,
    pub(crate) courses: i64,
    pub(crate) students: i64,
    pub(crate) lecturers: i64,
}

pub(crate) async fn counts(pool: &PgPool) -> Result<CatalogCounts, sqlx::Error> {
    sqlx::query_as::<_, CatalogCounts>(
        "SELECT
            (SELECT COUNT(*) FROM faculties) AS faculties,
            (SELECT COUNT(*) FROM departments) AS departments,
            (SELECT COUNT(*) FROM levels) AS levels,
            (SELECT COUNT(*) FROM semesters) AS semesters,
            (SELECT COUNT(*) FROM courses) AS courses,
            (SELECT COUNT(*) FROM students) AS students,
            (SELECT COUNT(*) FROM lecturers) AS lecturers",
    )
    .fetch_one(pool)
    .await
}
