pub mod models;

use anyhow::{Context, Result};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Database};

use self::models::Reading;

/// Handle to the configured reading database.
///
/// Cheap to clone — the driver shares one connection pool across clones.
/// Collections are addressed by sanitized field id and created implicitly
/// on first insert.
#[derive(Clone)]
pub struct ReadingStore {
    db: Database,
}

impl ReadingStore {
    /// Parse the connection string and select `database`.
    ///
    /// The driver connects lazily, so this performs no I/O; call [`ping`]
    /// to verify the deployment is actually reachable.
    ///
    /// [`ping`]: ReadingStore::ping
    pub async fn open(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("invalid MongoDB connection string")?;
        Ok(Self {
            db: client.database(database),
        })
    }

    /// Round-trip a `ping` command to the deployment.
    pub async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    /// Insert one reading into the collection named after its field id and
    /// return the store-assigned id.
    pub async fn insert_reading(&self, reading: &Reading) -> Result<ObjectId> {
        let collection = self.db.collection::<Reading>(&reading.field_id);
        let result = collection
            .insert_one(reading)
            .await
            .with_context(|| format!("insert into collection {:?} failed", reading.field_id))?;
        result
            .inserted_id
            .as_object_id()
            .context("store returned a non-ObjectId insert id")
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }
}
