//! # Fleet Repository
//!
//! Read access to the fleet/boat directory, plus the inserts used by
//! seeding and tests. Master data is maintained outside this system.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use fleet_core::{Boat, Fleet};

/// Repository for fleets and boats.
#[derive(Debug)]
pub struct FleetRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> FleetRepository<'c> {
    /// Creates a new FleetRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        FleetRepository { conn }
    }

    pub async fn find_fleet_by_name(&mut self, name: &str) -> DbResult<Option<Fleet>> {
        debug!(name = %name, "Looking up fleet");

        let fleet = sqlx::query_as::<_, Fleet>("SELECT id, name FROM fleets WHERE name = ?1")
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(fleet)
    }

    pub async fn get_fleet(&mut self, id: &str) -> DbResult<Option<Fleet>> {
        let fleet = sqlx::query_as::<_, Fleet>("SELECT id, name FROM fleets WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(fleet)
    }

    /// Boat names are unique across all fleets.
    pub async fn find_boat_by_name(&mut self, name: &str) -> DbResult<Option<Boat>> {
        debug!(name = %name, "Looking up boat");

        let boat =
            sqlx::query_as::<_, Boat>("SELECT id, fleet_id, name FROM boats WHERE name = ?1")
                .bind(name)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(boat)
    }

    pub async fn get_boat(&mut self, id: &str) -> DbResult<Option<Boat>> {
        let boat = sqlx::query_as::<_, Boat>("SELECT id, fleet_id, name FROM boats WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(boat)
    }

    pub async fn list_fleets(&mut self) -> DbResult<Vec<Fleet>> {
        let fleets = sqlx::query_as::<_, Fleet>("SELECT id, name FROM fleets ORDER BY name")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(fleets)
    }

    pub async fn list_boats(&mut self, fleet_id: &str) -> DbResult<Vec<Boat>> {
        let boats = sqlx::query_as::<_, Boat>(
            "SELECT id, fleet_id, name FROM boats WHERE fleet_id = ?1 ORDER BY name",
        )
        .bind(fleet_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(boats)
    }

    pub async fn insert_fleet(&mut self, fleet: &Fleet) -> DbResult<()> {
        debug!(id = %fleet.id, name = %fleet.name, "Inserting fleet");

        sqlx::query("INSERT INTO fleets (id, name) VALUES (?1, ?2)")
            .bind(&fleet.id)
            .bind(&fleet.name)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    pub async fn insert_boat(&mut self, boat: &Boat) -> DbResult<()> {
        debug!(id = %boat.id, fleet_id = %boat.fleet_id, "Inserting boat");

        sqlx::query("INSERT INTO boats (id, fleet_id, name) VALUES (?1, ?2, ?3)")
            .bind(&boat.id)
            .bind(&boat.fleet_id)
            .bind(&boat.name)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}
