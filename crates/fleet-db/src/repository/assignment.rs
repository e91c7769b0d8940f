//! # Assignment Repository
//!
//! Database operations for stock allocated to fleet/boat destinations.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fleet_core::{Assignment, AssignmentDetail, AssignmentMergeKey};

const COLUMNS: &str = "id, name, note, quantity, unit_price_cents, select_unit, unit_size, \
                       total_cents, fleet_id, boat_id, out_date, last_updated, archived";

/// Repository for assignment database operations.
#[derive(Debug)]
pub struct AssignmentRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> AssignmentRepository<'c> {
    /// Creates a new AssignmentRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        AssignmentRepository { conn }
    }

    /// Lists assignments with their fleet and boat names.
    ///
    /// ## Arguments
    /// * `archived` - `false` for the active listing, `true` for the archive
    pub async fn list_detailed(&mut self, archived: bool) -> DbResult<Vec<AssignmentDetail>> {
        let assignments = sqlx::query_as::<_, AssignmentDetail>(
            r#"
            SELECT
                a.id, a.name, a.note, a.quantity, a.unit_price_cents, a.select_unit,
                a.unit_size, a.total_cents, a.fleet_id, a.boat_id, a.out_date,
                a.last_updated, a.archived,
                f.name AS fleet_name,
                b.name AS boat_name
            FROM assignments a
            INNER JOIN fleets f ON f.id = a.fleet_id
            INNER JOIN boats b ON b.id = a.boat_id
            WHERE a.archived = ?1
            ORDER BY a.out_date DESC, a.id
            "#,
        )
        .bind(archived)
        .fetch_all(&mut *self.conn)
        .await?;

        debug!(count = assignments.len(), archived, "Listed assignments");
        Ok(assignments)
    }

    /// Gets an assignment by id.
    pub async fn get_by_id(&mut self, id: &str) -> DbResult<Option<Assignment>> {
        debug!(id = %id, "Getting assignment by ID");

        let sql = format!("SELECT {} FROM assignments WHERE id = ?1", COLUMNS);
        let assignment = sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(assignment)
    }

    /// Finds the active assignment a new allocation should merge into.
    ///
    /// Archived rows are never merge targets.
    pub async fn find_merge_target(
        &mut self,
        key: &AssignmentMergeKey,
    ) -> DbResult<Option<Assignment>> {
        let sql = format!(
            "SELECT {} FROM assignments \
             WHERE name = ?1 AND unit_price_cents = ?2 AND select_unit = ?3 \
             AND unit_size = ?4 AND boat_id = ?5 AND archived = 0 \
             ORDER BY out_date, id LIMIT 1",
            COLUMNS
        );
        let assignment = sqlx::query_as::<_, Assignment>(&sql)
            .bind(&key.name)
            .bind(key.unit_price_cents)
            .bind(&key.select_unit)
            .bind(key.unit_size)
            .bind(&key.boat_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(assignment)
    }

    /// Inserts a new assignment.
    pub async fn insert(&mut self, assignment: &Assignment) -> DbResult<()> {
        debug!(
            id = %assignment.id,
            boat_id = %assignment.boat_id,
            quantity = assignment.quantity,
            "Inserting assignment"
        );

        sqlx::query(
            "INSERT INTO assignments (id, name, note, quantity, unit_price_cents, select_unit, \
             unit_size, total_cents, fleet_id, boat_id, out_date, last_updated, archived) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&assignment.id)
        .bind(&assignment.name)
        .bind(&assignment.note)
        .bind(assignment.quantity)
        .bind(assignment.unit_price_cents)
        .bind(&assignment.select_unit)
        .bind(assignment.unit_size)
        .bind(assignment.total_cents)
        .bind(&assignment.fleet_id)
        .bind(&assignment.boat_id)
        .bind(assignment.out_date)
        .bind(assignment.last_updated)
        .bind(assignment.archived)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Rewrites every column of an existing assignment.
    pub async fn update(&mut self, assignment: &Assignment) -> DbResult<()> {
        debug!(
            id = %assignment.id,
            quantity = assignment.quantity,
            "Updating assignment"
        );

        let result = sqlx::query(
            "UPDATE assignments SET name = ?2, note = ?3, quantity = ?4, unit_price_cents = ?5, \
             select_unit = ?6, unit_size = ?7, total_cents = ?8, fleet_id = ?9, boat_id = ?10, \
             out_date = ?11, last_updated = ?12, archived = ?13 WHERE id = ?1",
        )
        .bind(&assignment.id)
        .bind(&assignment.name)
        .bind(&assignment.note)
        .bind(assignment.quantity)
        .bind(assignment.unit_price_cents)
        .bind(&assignment.select_unit)
        .bind(assignment.unit_size)
        .bind(assignment.total_cents)
        .bind(&assignment.fleet_id)
        .bind(&assignment.boat_id)
        .bind(assignment.out_date)
        .bind(assignment.last_updated)
        .bind(assignment.archived)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Assignment", &assignment.id));
        }

        Ok(())
    }

    /// Sets the archived flag on one assignment.
    pub async fn set_archived(&mut self, id: &str, archived: bool) -> DbResult<()> {
        debug!(id = %id, archived, "Setting archive status");

        let result = sqlx::query("UPDATE assignments SET archived = ?2 WHERE id = ?1")
            .bind(id)
            .bind(archived)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Assignment", id));
        }

        Ok(())
    }

    /// Deletes an assignment.
    pub async fn delete(&mut self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting assignment");

        let result = sqlx::query("DELETE FROM assignments WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Assignment", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::fleet::FleetRepository;
    use chrono::Utc;
    use fleet_core::{Boat, Fleet};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        let mut fleets = FleetRepository::new(&mut conn);
        fleets
            .insert_fleet(&Fleet {
                id: "f1".to_string(),
                name: "North Fleet".to_string(),
            })
            .await
            .unwrap();
        for (id, name) in [("b1", "Sea Wolf"), ("b2", "Gannet")] {
            fleets
                .insert_boat(&Boat {
                    id: id.to_string(),
                    fleet_id: "f1".to_string(),
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }
        drop(conn);
        db
    }

    fn assignment(id: &str, boat_id: &str) -> Assignment {
        Assignment {
            id: id.to_string(),
            name: "Gill Net".to_string(),
            note: "40mm".to_string(),
            quantity: 2,
            unit_price_cents: 1000,
            select_unit: "Roll".to_string(),
            unit_size: 3,
            total_cents: 667,
            fleet_id: "f1".to_string(),
            boat_id: boat_id.to_string(),
            out_date: Utc::now(),
            last_updated: None,
            archived: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_detailed() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();
        let mut repo = AssignmentRepository::new(&mut conn);

        repo.insert(&assignment("a1", "b1")).await.unwrap();

        let active = repo.list_detailed(false).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].fleet_name, "North Fleet");
        assert_eq!(active[0].boat_name, "Sea Wolf");
        assert_eq!(active[0].assignment.total_cents, 667);
        assert!(repo.list_detailed(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_target_is_per_boat_and_active() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();
        let mut repo = AssignmentRepository::new(&mut conn);

        let a1 = assignment("a1", "b1");
        repo.insert(&a1).await.unwrap();

        let key = AssignmentMergeKey::of_assignment(&a1);
        assert_eq!(
            repo.find_merge_target(&key).await.unwrap().unwrap().id,
            "a1"
        );

        let mut other_boat = key.clone();
        other_boat.boat_id = "b2".to_string();
        assert!(repo.find_merge_target(&other_boat).await.unwrap().is_none());

        repo.set_archived("a1", true).await.unwrap();
        assert!(repo.find_merge_target(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_set_archived_delete() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();
        let mut repo = AssignmentRepository::new(&mut conn);

        let mut a1 = assignment("a1", "b1");
        repo.insert(&a1).await.unwrap();

        a1.set_quantity(5);
        a1.boat_id = "b2".to_string();
        repo.update(&a1).await.unwrap();
        let loaded = repo.get_by_id("a1").await.unwrap().unwrap();
        assert_eq!(loaded.quantity, 5);
        assert_eq!(loaded.boat_id, "b2");

        repo.set_archived("a1", true).await.unwrap();
        assert!(repo.get_by_id("a1").await.unwrap().unwrap().archived);
        assert_eq!(repo.list_detailed(true).await.unwrap().len(), 1);

        assert!(repo
            .set_archived("missing", true)
            .await
            .unwrap_err()
            .is_not_found());

        repo.delete("a1").await.unwrap();
        assert!(repo.get_by_id("a1").await.unwrap().is_none());
        assert!(repo.delete("a1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = setup().await;
        let mut conn = db.acquire().await.unwrap();
        let mut repo = AssignmentRepository::new(&mut conn);

        let err = repo.insert(&assignment("a1", "nope")).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
