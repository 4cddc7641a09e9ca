use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection, FromRow, QueryBuilder, Row, SqlitePool, sqlite::SqliteRow};

use super::{AppRepo, AppointmentFilter, CreateAppointmentOutcome, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

/// Enum columns are stored as their serde string form; decoding goes
/// through serde_json so model and storage can never disagree.
fn decode_enum<T: serde::de::DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str::<T>(&format!("\"{}\"", raw)).unwrap_or_default()
}

fn decode_price(raw: &str) -> Decimal {
    raw.parse::<Decimal>().unwrap_or_default()
}

impl FromRow<'_, SqliteRow> for models::user_app::User {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: decode_enum(row.try_get::<&str, &str>("role")?),
            is_enabled: row.try_get("is_enabled")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_name: row.try_get("pet_name")?,
            species: row.try_get("species")?,
            breed: row.try_get("breed")?,
            birthday: row.try_get("birthday")?,
            tutor_id: row.try_get("tutor_id")?,
            clinic_id: row.try_get("clinic_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::veterinarian::Veterinarian {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            crmv: row.try_get("crmv")?,
            specialty: row.try_get("specialty")?,
            clinic_id: row.try_get("clinic_id")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::service::Service {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            service_name: row.try_get("service_name")?,
            description: row.try_get("description")?,
            base_price: decode_price(row.try_get::<&str, &str>("base_price")?),
            duration_min: row.try_get("duration_min")?,
            clinic_id: row.try_get("clinic_id")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::appointment::Appointment {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            pet_id: row.try_get("pet_id")?,
            veterinarian_id: row.try_get("veterinarian_id")?,
            service_id: row.try_get("service_id")?,
            scheduled_at: row.try_get("scheduled_at")?,
            notes: row.try_get("notes")?,
            status: decode_enum(row.try_get::<&str, &str>("status")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::appointment::AppointmentDetail {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let payment = match row.try_get::<Option<i64>, &str>("payment_id")? {
            Some(payment_id) => Some(models::payment::PaymentSummary {
                id: payment_id,
                amount: decode_price(row.try_get::<&str, &str>("payment_amount")?),
                method: decode_enum(row.try_get::<&str, &str>("payment_method")?),
                status: decode_enum(row.try_get::<&str, &str>("payment_status")?),
                paid_at: row.try_get("payment_paid_at")?,
            }),
            None => None,
        };

        Ok(Self {
            appointment: models::appointment::Appointment::from_row(row)?,
            pet: models::pet::PetSummary {
                id: row.try_get("pet_id")?,
                pet_name: row.try_get("pet_name")?,
                species: row.try_get("species")?,
                tutor: models::user_app::TutorSummary {
                    id: row.try_get("tutor_id")?,
                    full_name: row.try_get("tutor_name")?,
                },
            },
            veterinarian: models::veterinarian::VeterinarianSummary {
                id: row.try_get("veterinarian_id")?,
                full_name: row.try_get("vet_name")?,
                crmv: row.try_get("crmv")?,
                specialty: row.try_get("specialty")?,
            },
            service: models::service::ServiceSummary {
                id: row.try_get("service_id")?,
                service_name: row.try_get("service_name")?,
                base_price: decode_price(row.try_get::<&str, &str>("base_price")?),
                duration_min: row.try_get("duration_min")?,
            },
            payment,
        })
    }
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::User>> {
        Ok(
            sqlx::query_as::<_, models::user_app::User>(sqlite_queries::QUERY_GET_USER_BY_EMAIL)
                .bind(email)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_pet(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_PET)
                .bind(pet_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_veterinarian(
        &self,
        veterinarian_id: i64,
    ) -> anyhow::Result<Option<models::veterinarian::Veterinarian>> {
        Ok(sqlx::query_as::<_, models::veterinarian::Veterinarian>(
            sqlite_queries::QUERY_GET_VETERINARIAN,
        )
        .bind(veterinarian_id)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn get_service(
        &self,
        service_id: i64,
    ) -> anyhow::Result<Option<models::service::Service>> {
        Ok(
            sqlx::query_as::<_, models::service::Service>(sqlite_queries::QUERY_GET_SERVICE)
                .bind(service_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn find_overlapping_appointments(
        &self,
        veterinarian_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<models::appointment::Appointment>> {
        Ok(sqlx::query_as::<_, models::appointment::Appointment>(
            sqlite_queries::QUERY_FIND_OVERLAPPING_APPOINTMENTS,
        )
        .bind(veterinarian_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn create_appointment(
        &self,
        new: &models::appointment::NewAppointment,
        window_end: DateTime<Utc>,
    ) -> anyhow::Result<CreateAppointmentOutcome> {
        let mut conn = self.db_pool.acquire().await?;

        // Writers must serialize before the overlap re-check, so the
        // transaction takes the write lock at BEGIN. A deferred BEGIN
        // lets two bookings pass the check concurrently and fails one
        // of them on the lock upgrade instead of reporting the slot as
        // taken.
        let mut transaction = conn.begin_with("BEGIN IMMEDIATE").await?;

        // The authoritative overlap check runs on the same transaction as
        // the insert; dropping the transaction on conflict rolls back.
        let conflict = sqlx::query(sqlite_queries::QUERY_FIND_OVERLAPPING_APPOINTMENTS)
            .bind(new.veterinarian_id)
            .bind(new.scheduled_at)
            .bind(window_end)
            .fetch_optional(&mut *transaction)
            .await?;

        if conflict.is_some() {
            return Ok(CreateAppointmentOutcome::SlotTaken);
        }

        let appointment_id = sqlx::query(sqlite_queries::QUERY_INSERT_APPOINTMENT)
            .bind(new.pet_id)
            .bind(new.veterinarian_id)
            .bind(new.service_id)
            .bind(new.scheduled_at)
            .bind(&new.notes)
            .bind(Utc::now())
            .bind(Utc::now())
            .execute(&mut *transaction)
            .await?
            .last_insert_rowid();

        transaction.commit().await?;

        Ok(CreateAppointmentOutcome::Created(appointment_id))
    }

    async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> anyhow::Result<Option<models::appointment::Appointment>> {
        Ok(sqlx::query_as::<_, models::appointment::Appointment>(
            sqlite_queries::QUERY_GET_APPOINTMENT,
        )
        .bind(appointment_id)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn get_appointment_detail(
        &self,
        appointment_id: i64,
    ) -> anyhow::Result<Option<models::appointment::AppointmentDetail>> {
        let query = format!(
            "{} AND a.id = $1;",
            sqlite_queries::QUERY_APPOINTMENT_DETAIL_BASE
        );

        Ok(
            sqlx::query_as::<_, models::appointment::AppointmentDetail>(&query)
                .bind(appointment_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: models::appointment::AppointmentStatus,
        notes: Option<String>,
    ) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_UPDATE_APPOINTMENT_STATUS)
            .bind(status.to_string())
            .bind(notes)
            .bind(Utc::now())
            .bind(appointment_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> anyhow::Result<Vec<models::appointment::AppointmentDetail>> {
        let mut query = QueryBuilder::new(sqlite_queries::QUERY_APPOINTMENT_DETAIL_BASE);

        if let Some(status) = filter.status {
            query.push(" AND a.status = ").push_bind(status.to_string());
        }
        if let Some(date_from) = filter.date_from {
            query
                .push(" AND datetime(a.scheduled_at) >= datetime(")
                .push_bind(date_from)
                .push(")");
        }
        if let Some(date_to) = filter.date_to {
            query
                .push(" AND datetime(a.scheduled_at) <= datetime(")
                .push_bind(date_to)
                .push(")");
        }
        if let Some(pet_id) = filter.pet_id {
            query.push(" AND a.pet_id = ").push_bind(pet_id);
        }
        if let Some(tutor_id) = filter.tutor_id {
            query.push(" AND p.tutor_id = ").push_bind(tutor_id);
        }

        query.push(" ORDER BY datetime(a.scheduled_at) ASC");

        Ok(query
            .build_query_as::<models::appointment::AppointmentDetail>()
            .fetch_all(&self.db_pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::{AppointmentStatus, NewAppointment};
    use chrono::TimeZone;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn setup_repo() -> SqlxSqliteRepo {
        // Single connection so every task sees the same in-memory database.
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::from_str("sqlite::memory:")
                    .unwrap()
                    .pragma("foreign_keys", "ON"),
            )
            .await
            .unwrap();

        sqlx::query(include_str!("../../migrations/0001_create_tables.sql"))
            .execute(&db_pool)
            .await
            .unwrap();

        seed(&db_pool).await;

        SqlxSqliteRepo { db_pool }
    }

    /// File-backed pool with one connection per racing task, so writes
    /// really contend instead of queueing behind a single connection.
    async fn setup_repo_multi_conn(connections: u32) -> (SqlxSqliteRepo, std::path::PathBuf) {
        let db_path = std::env::temp_dir().join(format!("vet-agenda-{}.db", uuid::Uuid::new_v4()));

        let db_pool = SqlitePoolOptions::new()
            .max_connections(connections)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&db_path)
                    .create_if_missing(true)
                    .pragma("foreign_keys", "ON"),
            )
            .await
            .unwrap();

        sqlx::query(include_str!("../../migrations/0001_create_tables.sql"))
            .execute(&db_pool)
            .await
            .unwrap();

        seed(&db_pool).await;

        (SqlxSqliteRepo { db_pool }, db_path)
    }

    async fn seed(db_pool: &SqlitePool) {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO user_app(id, full_name, email, password_hash, role, created_at, updated_at)
             VALUES(1, 'Ana Souza', 'ana@example.com', 'x', 'tutor', $1, $1),
                   (2, 'Bruno Lima', 'bruno@example.com', 'x', 'tutor', $1, $1);",
        )
        .bind(now)
        .execute(db_pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO clinic(id, clinic_name, created_at, updated_at) VALUES(1, 'PetCare', $1, $1);")
            .bind(now)
            .execute(db_pool)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO pet(id, pet_name, species, tutor_id, clinic_id, created_at, updated_at)
             VALUES(1, 'Rex', 'dog', 1, 1, $1, $1),
                   (2, 'Mimi', 'cat', 2, 1, $1, $1);",
        )
        .bind(now)
        .execute(db_pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO veterinarian(id, full_name, crmv, clinic_id, is_active, created_at, updated_at)
             VALUES(1, 'Dra. Carla', 'CRMV-123', 1, 1, $1, $1);",
        )
        .bind(now)
        .execute(db_pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO service(id, service_name, base_price, duration_min, clinic_id, is_active, created_at, updated_at)
             VALUES(1, 'Consulta', '150.00', 30, 1, 1, $1, $1);",
        )
        .bind(now)
        .execute(db_pool)
        .await
        .unwrap();
    }

    fn booking_at(hour: u32, minute: u32) -> NewAppointment {
        NewAppointment {
            pet_id: 1,
            veterinarian_id: 1,
            service_id: 1,
            scheduled_at: Utc.with_ymd_and_hms(2025, 9, 10, hour, minute, 0).unwrap(),
            notes: None,
        }
    }

    #[ntex::test]
    async fn test_create_then_same_slot_is_taken() {
        let repo = setup_repo().await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);

        let first = repo.create_appointment(&new, end).await.unwrap();
        assert!(matches!(first, CreateAppointmentOutcome::Created(_)));

        let second = repo.create_appointment(&new, end).await.unwrap();
        assert_eq!(second, CreateAppointmentOutcome::SlotTaken);
    }

    #[ntex::test]
    async fn test_booking_inside_window_conflicts_at_window_end_does_not() {
        let repo = setup_repo().await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);
        repo.create_appointment(&new, end).await.unwrap();

        // 10:15 falls inside [10:00, 10:30)
        let inside = booking_at(10, 15);
        let inside_end = inside.scheduled_at + chrono::Duration::minutes(30);
        assert_eq!(
            repo.create_appointment(&inside, inside_end).await.unwrap(),
            CreateAppointmentOutcome::SlotTaken
        );

        // 10:30 is exactly the half-open boundary
        let boundary = booking_at(10, 30);
        let boundary_end = boundary.scheduled_at + chrono::Duration::minutes(30);
        assert!(matches!(
            repo.create_appointment(&boundary, boundary_end).await.unwrap(),
            CreateAppointmentOutcome::Created(_)
        ));
    }

    #[ntex::test]
    async fn test_existing_window_extending_into_request_start_conflicts() {
        let repo = setup_repo().await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);
        repo.create_appointment(&new, end).await.unwrap();

        // Existing [10:00, 10:30) reaches into a request starting at 10:20,
        // even though 10:00 is before the requested start.
        let late = booking_at(10, 20);
        let late_end = late.scheduled_at + chrono::Duration::minutes(30);
        assert_eq!(
            repo.create_appointment(&late, late_end).await.unwrap(),
            CreateAppointmentOutcome::SlotTaken
        );
    }

    #[ntex::test]
    async fn test_concurrent_bookings_only_one_wins() {
        let repo = setup_repo().await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);

        let outcomes =
            futures::future::join_all((0..8).map(|_| repo.create_appointment(&new, end))).await;

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(CreateAppointmentOutcome::Created(_))))
            .count();
        let taken = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(CreateAppointmentOutcome::SlotTaken)))
            .count();

        assert_eq!(created, 1);
        assert_eq!(taken, 7);
    }

    #[ntex::test]
    async fn test_concurrent_bookings_across_connections_only_one_wins() {
        // Each task gets its own connection, so losers must be turned
        // away by the serialized re-check rather than a lock error.
        let (repo, db_path) = setup_repo_multi_conn(8).await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);

        let outcomes =
            futures::future::join_all((0..8).map(|_| repo.create_appointment(&new, end))).await;

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(CreateAppointmentOutcome::Created(_))))
            .count();
        let taken = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(CreateAppointmentOutcome::SlotTaken)))
            .count();

        assert_eq!(created, 1);
        assert_eq!(taken, 7);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointment;")
            .fetch_one(&repo.db_pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        repo.db_pool.close().await;
        let _ = std::fs::remove_file(db_path);
    }

    #[ntex::test]
    async fn test_cancelled_appointment_frees_the_slot() {
        let repo = setup_repo().await;
        let new = booking_at(10, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);

        let CreateAppointmentOutcome::Created(id) =
            repo.create_appointment(&new, end).await.unwrap()
        else {
            panic!("first booking must succeed");
        };

        repo.update_appointment_status(id, AppointmentStatus::Cancelled, None)
            .await
            .unwrap();

        assert!(matches!(
            repo.create_appointment(&new, end).await.unwrap(),
            CreateAppointmentOutcome::Created(_)
        ));
    }

    #[ntex::test]
    async fn test_detail_resolves_summaries() {
        let repo = setup_repo().await;
        let new = booking_at(9, 0);
        let end = new.scheduled_at + chrono::Duration::minutes(30);

        let CreateAppointmentOutcome::Created(id) =
            repo.create_appointment(&new, end).await.unwrap()
        else {
            panic!("booking must succeed");
        };

        let detail = repo.get_appointment_detail(id).await.unwrap().unwrap();
        assert_eq!(detail.appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(detail.pet.pet_name, "Rex");
        assert_eq!(detail.pet.tutor.full_name, "Ana Souza");
        assert_eq!(detail.veterinarian.crmv, "CRMV-123");
        assert_eq!(detail.service.duration_min, 30);
        assert!(detail.payment.is_none());
    }

    #[ntex::test]
    async fn test_list_scoped_by_tutor_and_ordered() {
        let repo = setup_repo().await;

        for (pet_id, hour) in [(1, 14), (2, 9), (1, 11)] {
            let new = NewAppointment {
                pet_id,
                ..booking_at(hour, 0)
            };
            let end = new.scheduled_at + chrono::Duration::minutes(30);
            repo.create_appointment(&new, end).await.unwrap();
        }

        let all = repo
            .list_appointments(&AppointmentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(
            all.windows(2)
                .all(|w| w[0].appointment.scheduled_at <= w[1].appointment.scheduled_at)
        );

        let ana_only = repo
            .list_appointments(&AppointmentFilter {
                tutor_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ana_only.len(), 2);
        assert!(ana_only.iter().all(|d| d.pet.tutor.id == 1));
    }
}
