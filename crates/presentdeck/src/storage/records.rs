//! Record access for the `presentations` and `assets` collections.
//!
//! The same operations work on a plain [`Store`](super::Store) and inside a
//! [`StoreTransaction`](super::StoreTransaction), so multi-step updates can be
//! made atomic without a second copy of the SQL.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{AssetRecord, PresentationRecord};
use crate::payload::Payload;

/// Raw slot columns of an `assets` row: id, three logos, video.
type AssetRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Read and write access to both record collections.
pub trait Records {
    /// The connection (or open transaction) statements run against.
    fn connection(&self) -> &Connection;

    /// Get every presentation, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_presentations(&self) -> Result<Vec<PresentationRecord>> {
        let mut stmt = self.connection().prepare(
            r"
            SELECT id, title, description, has_assets
            FROM presentations ORDER BY rowid ASC
            ",
        )?;

        let presentations = stmt
            .query_map([], row_to_presentation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(presentations)
    }

    /// Get a presentation by id, or `None` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_presentation(&self, id: &str) -> Result<Option<PresentationRecord>> {
        let result = self
            .connection()
            .query_row(
                r"
                SELECT id, title, description, has_assets
                FROM presentations WHERE id = ?1
                ",
                [id],
                row_to_presentation,
            )
            .optional()?;
        Ok(result)
    }

    /// Insert a presentation or fully overwrite the one with the same id.
    ///
    /// An overwritten record keeps its position in the listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the database operation fails.
    fn put_presentation(&self, record: &PresentationRecord) -> Result<()> {
        record.validate()?;
        self.connection().execute(
            r"
            INSERT INTO presentations (id, title, description, has_assets)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                has_assets = excluded.has_assets
            ",
            params![
                record.id,
                record.title,
                record.description,
                record.has_assets
            ],
        )?;
        debug!("Stored presentation {}", record.id);
        Ok(())
    }

    /// Get the asset record for a presentation, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored payload
    /// cannot be decoded.
    fn get_assets(&self, id: &str) -> Result<Option<AssetRecord>> {
        let row: Option<AssetRow> = self
            .connection()
            .query_row(
                "SELECT id, logo1, logo2, logo3, video FROM assets WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(row_to_assets).transpose()
    }

    /// Insert an asset record or fully overwrite the one with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the database operation fails.
    fn put_assets(&self, record: &AssetRecord) -> Result<()> {
        record.validate()?;
        let encode = |slot: Option<&Payload>| slot.map(Payload::to_data_uri);
        let [logo1, logo2, logo3] = &record.logos;
        let (logo1, logo2, logo3) = (
            encode(logo1.as_ref()),
            encode(logo2.as_ref()),
            encode(logo3.as_ref()),
        );
        let video = encode(record.video.as_ref());

        self.connection().execute(
            r"
            INSERT OR REPLACE INTO assets (id, logo1, logo2, logo3, video)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![record.id, logo1, logo2, logo3, video],
        )?;
        debug!("Stored assets for presentation {}", record.id);
        Ok(())
    }

    /// Delete the asset record for a presentation.
    ///
    /// Returns `true` if a record was deleted, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_assets(&self, id: &str) -> Result<bool> {
        let affected = self
            .connection()
            .execute("DELETE FROM assets WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get the ids of every stored asset record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_asset_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id FROM assets ORDER BY rowid ASC")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

fn row_to_presentation(row: &rusqlite::Row) -> rusqlite::Result<PresentationRecord> {
    Ok(PresentationRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        has_assets: row.get(3)?,
    })
}

fn row_to_assets((id, logo1, logo2, logo3, video): AssetRow) -> Result<AssetRecord> {
    let decode = |slot: Option<String>| slot.as_deref().map(Payload::from_data_uri).transpose();

    Ok(AssetRecord {
        id,
        logos: [decode(logo1)?, decode(logo2)?, decode(logo3)?],
        video: decode(video)?,
    })
}
