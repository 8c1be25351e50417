use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::errors::StoreError;
use crate::db::models::{Account, AdminProfile, LecturerProfile, StudentProfile, User};
use crate::db::types::{AdminLevel, UserRole};

const COLUMNS: &str = "id, email, hashed_password, name, role, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StudentRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) student_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
    pub(crate) level_id: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct LecturerRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) staff_number: String,
    pub(crate) department_id: String,
    pub(crate) faculty_id: String,
}

pub(crate) struct NewIdentity<'a> {
    pub(crate) id: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) name: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) identity: NewIdentity<'a>,
    pub(crate) student_number: &'a str,
    pub(crate) department_id: &'a str,
    pub(crate) level_id: &'a str,
    pub(crate) initial_course_id: Option<&'a str>,
}

pub(crate) struct CreateLecturer<'a> {
    pub(crate) identity: NewIdentity<'a>,
    pub(crate) staff_number: &'a str,
    pub(crate) department_id: &'a str,
}

#[derive(Debug, Default)]
pub(crate) struct PersonFilter<'a> {
    pub(crate) department_id: Option<&'a str>,
    pub(crate) level_id: Option<&'a str>,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Loads the user row and the variant row its role points at.
pub(crate) async fn find_account(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let Some(user) = find_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let account = match user.role {
        UserRole::Student => sqlx::query_as::<_, StudentProfile>(
            "SELECT user_id, student_number, department_id, faculty_id, level_id
             FROM students WHERE user_id = $1",
        )
        .bind(&user.id)
        .fetch_optional(pool)
        .await?
        .map(|profile| Account::Student { user: user.clone(), profile }),
        UserRole::Lecturer => sqlx::query_as::<_, LecturerProfile>(
            "SELECT user_id, staff_number, department_id, faculty_id
             FROM lecturers WHERE user_id = $1",
        )
        .bind(&user.id)
        .fetch_optional(pool)
        .await?
        .map(|profile| Account::Lecturer { user: user.clone(), profile }),
        UserRole::Admin => sqlx::query_as::<_, AdminProfile>(
            "SELECT user_id, admin_level FROM admins WHERE user_id = $1",
        )
        .bind(&user.id)
        .fetch_optional(pool)
        .await?
        .map(|profile| Account::Admin { user: user.clone(), profile }),
    };

    if account.is_none() {
        tracing::warn!(user_id = %user.id, role = user.role.as_str(), "User has no variant row");
    }

    Ok(account)
}

/// Student numbers are checked first, then staff numbers, then admin emails.
pub(crate) async fn find_account_by_login(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let user_id = sqlx::query_scalar::<_, String>(
        "SELECT user_id FROM (
            SELECT user_id, 1 AS priority FROM students WHERE student_number = $1
            UNION ALL
            SELECT user_id, 2 AS priority FROM lecturers WHERE staff_number = $1
            UNION ALL
            SELECT a.user_id, 3 AS priority FROM admins a JOIN users u ON u.id = a.user_id
            WHERE lower(u.email) = lower($1)
         ) candidates
         ORDER BY priority
         LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    match user_id {
        Some(user_id) => find_account(pool, &user_id).await,
        None => Ok(None),
    }
}

async fn insert_identity(
    executor: impl sqlx::PgExecutor<'_>,
    identity: &NewIdentity<'_>,
    role: UserRole,
) -> Result<User, StoreError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, email, hashed_password, name, role, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(identity.id)
    .bind(identity.email)
    .bind(&identity.hashed_password)
    .bind(identity.name)
    .bind(role)
    .bind(identity.created_at)
    .fetch_one(executor)
    .await?;
    Ok(user)
}

async fn department_faculty(
    executor: impl sqlx::PgExecutor<'_>,
    department_id: &str,
) -> Result<String, StoreError> {
    sqlx::query_scalar::<_, String>("SELECT faculty_id FROM departments WHERE id = $1")
        .bind(department_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| StoreError::Reference { constraint: "students_department_id_fkey".into() })
}

/// Inserts the identity and the student row in one transaction. The student's
/// faculty is always the faculty of their department.
pub(crate) async fn create_student(
    pool: &PgPool,
    params: CreateStudent<'_>,
) -> Result<Account, StoreError> {
    let mut tx = pool.begin().await?;

    let faculty_id = department_faculty(&mut *tx, params.department_id).await?;
    let user = insert_identity(&mut *tx, &params.identity, UserRole::Student).await?;

    let profile = sqlx::query_as::<_, StudentProfile>(
        "INSERT INTO students (user_id, student_number, department_id, faculty_id, level_id)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING user_id, student_number, department_id, faculty_id, level_id",
    )
    .bind(&user.id)
    .bind(params.student_number)
    .bind(params.department_id)
    .bind(&faculty_id)
    .bind(params.level_id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(course_id) = params.initial_course_id {
        super::enrollments::enroll(&mut *tx, &user.id, course_id, params.identity.created_at)
            .await?;
    }

    tx.commit().await?;
    Ok(Account::Student { user, profile })
}

pub(crate) async fn create_lecturer(
    pool: &PgPool,
    params: CreateLecturer<'_>,
) -> Result<Account, StoreError> {
    let mut tx = pool.begin().await?;

    let faculty_id = department_faculty(&mut *tx, params.department_id).await?;
    let user = insert_identity(&mut *tx, &params.identity, UserRole::Lecturer).await?;

    let profile = sqlx::query_as::<_, LecturerProfile>(
        "INSERT INTO lecturers (user_id, staff_number, department_id, faculty_id)
         VALUES ($1,$2,$3,$4)
         RETURNING user_id, staff_number, department_id, faculty_id",
    )
    .bind(&user.id)
    .bind(params.staff_number)
    .bind(params.department_id)
    .bind(&faculty_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Account::Lecturer { user, profile })
}

/// Runs inside the caller's transaction so the bootstrap can seed atomically.
pub(crate) async fn create_admin(
    conn: &mut sqlx::PgConnection,
    identity: NewIdentity<'_>,
    admin_level: AdminLevel,
) -> Result<Account, StoreError> {
    let user = insert_identity(&mut *conn, &identity, UserRole::Admin).await?;

    let profile = sqlx::query_as::<_, AdminProfile>(
        "INSERT INTO admins (user_id, admin_level) VALUES ($1,$2)
         RETURNING user_id, admin_level",
    )
    .bind(&user.id)
    .bind(admin_level)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Account::Admin { user, profile })
}

pub(crate) async fn email_exists(
    executor: impl sqlx::PgExecutor<'_>,
    email: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
        .bind(email)
        .fetch_one(executor)
        .await
}

/// Variant rows go with the identity through `ON DELETE CASCADE`.
pub(crate) async fn delete(pool: &PgPool, id: &str, role: UserRole) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
        .bind(id)
        .bind(role)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn push_person_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    alias: &str,
    filter: &PersonFilter<'_>,
) {
    let mut separated = " WHERE ";
    if let Some(department_id) = filter.department_id {
        builder.push(separated).push(alias).push(".department_id = ");
        builder.push_bind(department_id.to_string());
        separated = " AND ";
    }
    if let Some(level_id) = filter.level_id {
        builder.push(separated).push(alias).push(".level_id = ");
        builder.push_bind(level_id.to_string());
    }
}

pub(crate) async fn list_students(
    pool: &PgPool,
    filter: &PersonFilter<'_>,
    skip: i64,
    limit: i64,
) -> Result<(Vec<StudentRow>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students s");
    push_person_filter(&mut count, "s", filter);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT u.id, u.name, u.email, s.student_number, s.department_id, s.faculty_id, s.level_id
         FROM students s
         JOIN users u ON u.id = s.user_id",
    );
    push_person_filter(&mut builder, "s", filter);
    builder.push(" ORDER BY u.name, s.student_number OFFSET ");
    builder.push_bind(skip);
    builder.push(" LIMIT ");
    builder.push_bind(limit);

    let rows = builder.build_query_as::<StudentRow>().fetch_all(pool).await?;
    Ok((rows, total))
}

pub(crate) async fn list_lecturers(
    pool: &PgPool,
    department_id: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<(Vec<LecturerRow>, i64), sqlx::Error> {
    let filter = PersonFilter { department_id, level_id: None };

    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM lecturers l");
    push_person_filter(&mut count, "l", &filter);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT u.id, u.name, u.email, l.staff_number, l.department_id, l.faculty_id
         FROM lecturers l
         JOIN users u ON u.id = l.user_id",
    );
    push_person_filter(&mut builder, "l", &filter);
    builder.push(" ORDER BY u.name, l.staff_number OFFSET ");
    builder.push_bind(skip);
    builder.push(" LIMIT ");
    builder.push_bind(limit);

    let rows = builder.build_query_as::<LecturerRow>().fetch_all(pool).await?;
    Ok((rows, total))
}
