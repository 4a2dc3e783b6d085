//! Release, track, credit and document rows

use chrono::NaiveDate;
use mdist_common::{time, uuid_utils, Error, ReleaseStatus, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::BTreeSet;
use tracing::debug;
use uuid::Uuid;

use super::{enum_from_text, enum_to_text};
use crate::models::{
    Confirmations, DocumentRef, Monetization, Release, ReleaseArtist, Track, TrackWriter,
};
use crate::repository::ReleaseFilter;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    value.as_deref().map(time::parse_date).transpose()
}

fn parse_optional_enum<T: serde::de::DeserializeOwned>(
    column: &str,
    value: Option<String>,
) -> Result<Option<T>> {
    value
        .as_deref()
        .map(|text| enum_from_text(column, text))
        .transpose()
}

/// Insert or replace a release and all of its child rows in one transaction
///
/// An existing `wupc` is kept even if the caller passes a different one.
/// Two tracks sharing an id is a `Conflict` and nothing is written.
pub async fn save_release(pool: &SqlitePool, release: &Release) -> Result<Release> {
    if let Some(track_id) = release.duplicate_track_id() {
        return Err(Error::Conflict(format!(
            "Track id {} appears more than once in release {}",
            track_id, release.id
        )));
    }

    let mut saved = release.clone();
    saved.updated_at = time::now();

    let mut tx = pool.begin().await?;
    upsert_release_row(&mut tx, &saved).await?;

    let release_guid = saved.id.to_string();
    sqlx::query("DELETE FROM tracks WHERE release_guid = ?")
        .bind(&release_guid)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM release_documents WHERE release_guid = ?")
        .bind(&release_guid)
        .execute(&mut *tx)
        .await?;

    for (position, track) in saved.tracks.iter().enumerate() {
        insert_track(&mut tx, &release_guid, position as i64, track).await?;
    }
    for (position, document) in saved.documents.iter().enumerate() {
        sqlx::query(
            "INSERT INTO release_documents (release_guid, position, name, url) VALUES (?, ?, ?, ?)",
        )
        .bind(&release_guid)
        .bind(position as i64)
        .bind(&document.name)
        .bind(&document.url)
        .execute(&mut *tx)
        .await?;
    }

    // Read back the identifier the database kept
    let wupc: Option<String> = sqlx::query_scalar("SELECT wupc FROM releases WHERE guid = ?")
        .bind(&release_guid)
        .fetch_one(&mut *tx)
        .await?;
    saved.wupc = wupc;

    tx.commit().await?;

    debug!(
        release_id = %saved.id,
        status = %saved.status,
        tracks = saved.tracks.len(),
        "Saved release"
    );
    Ok(saved)
}

async fn upsert_release_row(tx: &mut Transaction<'_, Sqlite>, release: &Release) -> Result<()> {
    let release_type = release.release_type.as_ref().map(enum_to_text).transpose()?;

    sqlx::query(
        r#"
        INSERT INTO releases (
            guid, user_guid, title, release_type, genre, sub_genre,
            c_line, c_year, p_line, p_year, record_label, upc, wupc, cover_url,
            selected_stores, monetization, territory_policy, release_timing,
            release_date, distributed_before, original_release_date,
            status, rejection_reason,
            confirm_rights, confirm_accuracy, confirm_commission, confirm_liability,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(guid) DO UPDATE SET
            title = excluded.title,
            release_type = excluded.release_type,
            genre = excluded.genre,
            sub_genre = excluded.sub_genre,
            c_line = excluded.c_line,
            c_year = excluded.c_year,
            p_line = excluded.p_line,
            p_year = excluded.p_year,
            record_label = excluded.record_label,
            upc = excluded.upc,
            wupc = COALESCE(releases.wupc, excluded.wupc),
            cover_url = excluded.cover_url,
            selected_stores = excluded.selected_stores,
            monetization = excluded.monetization,
            territory_policy = excluded.territory_policy,
            release_timing = excluded.release_timing,
            release_date = excluded.release_date,
            distributed_before = excluded.distributed_before,
            original_release_date = excluded.original_release_date,
            status = excluded.status,
            rejection_reason = excluded.rejection_reason,
            confirm_rights = excluded.confirm_rights,
            confirm_accuracy = excluded.confirm_accuracy,
            confirm_commission = excluded.confirm_commission,
            confirm_liability = excluded.confirm_liability,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(release.id.to_string())
    .bind(release.user_id.to_string())
    .bind(&release.title)
    .bind(release_type)
    .bind(&release.genre)
    .bind(&release.sub_genre)
    .bind(&release.c_line)
    .bind(release.c_year)
    .bind(&release.p_line)
    .bind(release.p_year)
    .bind(&release.record_label)
    .bind(&release.upc)
    .bind(&release.wupc)
    .bind(&release.cover_url)
    .bind(serde_json::to_string(&release.selected_stores)?)
    .bind(serde_json::to_string(&release.monetization)?)
    .bind(enum_to_text(&release.territory_policy)?)
    .bind(enum_to_text(&release.release_timing)?)
    .bind(date_text(release.release_date))
    .bind(release.distributed_before)
    .bind(date_text(release.original_release_date))
    .bind(release.status.as_str())
    .bind(&release.rejection_reason)
    .bind(release.confirmations.rights)
    .bind(release.confirmations.accuracy)
    .bind(release.confirmations.commission)
    .bind(release.confirmations.liability)
    .bind(release.created_date.to_rfc3339())
    .bind(release.updated_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_track(
    tx: &mut Transaction<'_, Sqlite>,
    release_guid: &str,
    position: i64,
    track: &Track,
) -> Result<()> {
    let track_guid = track.id.to_string();

    sqlx::query(
        r#"
        INSERT INTO tracks (
            guid, release_guid, position, title, version, isrc, iswc, file_url,
            language, is_instrumental, is_explicit,
            composition_type, copyright_type, ai_usage
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track_guid)
    .bind(release_guid)
    .bind(position)
    .bind(&track.title)
    .bind(&track.version)
    .bind(&track.isrc)
    .bind(&track.iswc)
    .bind(&track.file_url)
    .bind(&track.language)
    .bind(track.is_instrumental)
    .bind(track.is_explicit)
    .bind(enum_to_text(&track.composition_type)?)
    .bind(enum_to_text(&track.copyright_type)?)
    .bind(enum_to_text(&track.ai_usage)?)
    .execute(&mut **tx)
    .await?;

    for (index, artist) in track.artists.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO track_artists (
                release_guid, track_guid, position, name, legal_name, role, spotify_url, apple_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(release_guid)
        .bind(&track_guid)
        .bind(index as i64)
        .bind(&artist.name)
        .bind(&artist.legal_name)
        .bind(enum_to_text(&artist.role)?)
        .bind(&artist.spotify_url)
        .bind(&artist.apple_id)
        .execute(&mut **tx)
        .await?;
    }

    for (index, writer) in track.writers.iter().enumerate() {
        let role = writer.role.as_ref().map(enum_to_text).transpose()?;
        sqlx::query(
            r#"
            INSERT INTO track_writers (release_guid, track_guid, position, name, legal_name, role, share)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(release_guid)
        .bind(&track_guid)
        .bind(index as i64)
        .bind(&writer.name)
        .bind(&writer.legal_name)
        .bind(role)
        .bind(writer.share)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Load a release with its tracks, credits and documents
pub async fn load_release(pool: &SqlitePool, id: Uuid) -> Result<Release> {
    let row = sqlx::query("SELECT * FROM releases WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Release {}", id)))?;

    let mut release = release_from_row(&row)?;
    release.tracks = load_tracks(pool, id).await?;
    release.documents = load_documents(pool, id).await?;
    Ok(release)
}

fn release_from_row(row: &SqliteRow) -> Result<Release> {
    let guid: String = row.try_get("guid")?;
    let user_guid: String = row.try_get("user_guid")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let selected_stores: String = row.try_get("selected_stores")?;
    let monetization: String = row.try_get("monetization")?;
    let territory_policy: String = row.try_get("territory_policy")?;
    let release_timing: String = row.try_get("release_timing")?;

    Ok(Release {
        id: uuid_utils::parse_column("releases.guid", &guid)?,
        user_id: uuid_utils::parse_column("releases.user_guid", &user_guid)?,
        title: row.try_get("title")?,
        release_type: parse_optional_enum("release_type", row.try_get("release_type")?)?,
        genre: row.try_get("genre")?,
        sub_genre: row.try_get("sub_genre")?,
        c_line: row.try_get("c_line")?,
        c_year: row.try_get("c_year")?,
        p_line: row.try_get("p_line")?,
        p_year: row.try_get("p_year")?,
        record_label: row.try_get("record_label")?,
        upc: row.try_get("upc")?,
        wupc: row.try_get("wupc")?,
        cover_url: row.try_get("cover_url")?,
        selected_stores: serde_json::from_str::<BTreeSet<String>>(&selected_stores)?,
        monetization: serde_json::from_str::<Monetization>(&monetization)?,
        territory_policy: enum_from_text("territory_policy", &territory_policy)?,
        release_timing: enum_from_text("release_timing", &release_timing)?,
        release_date: parse_optional_date(row.try_get("release_date")?)?,
        distributed_before: row.try_get("distributed_before")?,
        original_release_date: parse_optional_date(row.try_get("original_release_date")?)?,
        status: status.parse::<ReleaseStatus>()?,
        rejection_reason: row.try_get("rejection_reason")?,
        created_date: time::parse_timestamp(&created_at)?,
        updated_at: time::parse_timestamp(&updated_at)?,
        tracks: Vec::new(),
        documents: Vec::new(),
        confirmations: Confirmations {
            rights: row.try_get("confirm_rights")?,
            accuracy: row.try_get("confirm_accuracy")?,
            commission: row.try_get("confirm_commission")?,
            liability: row.try_get("confirm_liability")?,
        },
    })
}

async fn load_tracks(pool: &SqlitePool, release_id: Uuid) -> Result<Vec<Track>> {
    let release_guid = release_id.to_string();
    let rows = sqlx::query("SELECT * FROM tracks WHERE release_guid = ? ORDER BY position")
        .bind(&release_guid)
        .fetch_all(pool)
        .await?;

    let mut tracks = Vec::with_capacity(rows.len());
    for row in rows {
        let guid: String = row.try_get("guid")?;
        let composition_type: String = row.try_get("composition_type")?;
        let copyright_type: String = row.try_get("copyright_type")?;
        let ai_usage: String = row.try_get("ai_usage")?;

        tracks.push(Track {
            id: uuid_utils::parse_column("tracks.guid", &guid)?,
            title: row.try_get("title")?,
            version: row.try_get("version")?,
            isrc: row.try_get("isrc")?,
            iswc: row.try_get("iswc")?,
            file_url: row.try_get("file_url")?,
            language: row.try_get("language")?,
            is_instrumental: row.try_get("is_instrumental")?,
            is_explicit: row.try_get("is_explicit")?,
            composition_type: enum_from_text("composition_type", &composition_type)?,
            copyright_type: enum_from_text("copyright_type", &copyright_type)?,
            ai_usage: enum_from_text("ai_usage", &ai_usage)?,
            artists: load_artists(pool, &release_guid, &guid).await?,
            writers: load_writers(pool, &release_guid, &guid).await?,
        });
    }
    Ok(tracks)
}

async fn load_artists(
    pool: &SqlitePool,
    release_guid: &str,
    track_guid: &str,
) -> Result<Vec<ReleaseArtist>> {
    let rows = sqlx::query(
        "SELECT * FROM track_artists WHERE release_guid = ? AND track_guid = ? ORDER BY position",
    )
    .bind(release_guid)
    .bind(track_guid)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<ReleaseArtist> {
            let role: String = row.try_get("role")?;
            Ok(ReleaseArtist {
                name: row.try_get("name")?,
                legal_name: row.try_get("legal_name")?,
                role: enum_from_text("track_artists.role", &role)?,
                spotify_url: row.try_get("spotify_url")?,
                apple_id: row.try_get("apple_id")?,
            })
        })
        .collect()
}

async fn load_writers(
    pool: &SqlitePool,
    release_guid: &str,
    track_guid: &str,
) -> Result<Vec<TrackWriter>> {
    let rows = sqlx::query(
        "SELECT * FROM track_writers WHERE release_guid = ? AND track_guid = ? ORDER BY position",
    )
    .bind(release_guid)
    .bind(track_guid)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<TrackWriter> {
            Ok(TrackWriter {
                name: row.try_get("name")?,
                legal_name: row.try_get("legal_name")?,
                role: parse_optional_enum("track_writers.role", row.try_get("role")?)?,
                share: row.try_get("share")?,
            })
        })
        .collect()
}

async fn load_documents(pool: &SqlitePool, release_id: Uuid) -> Result<Vec<DocumentRef>> {
    let rows = sqlx::query(
        "SELECT name, url FROM release_documents WHERE release_guid = ? ORDER BY position",
    )
    .bind(release_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<DocumentRef> {
            Ok(DocumentRef {
                name: row.try_get("name")?,
                url: row.try_get("url")?,
            })
        })
        .collect()
}

/// Hard delete; child rows go with it through `ON DELETE CASCADE`
pub async fn delete_release(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM releases WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Release {}", id)));
    }
    Ok(())
}

/// WHERE clause and its bind values for a filter
fn filter_clause(filter: &ReleaseFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if !filter.statuses.is_empty() {
        let placeholders = vec!["?"; filter.statuses.len()].join(", ");
        conditions.push(format!("status IN ({})", placeholders));
        binds.extend(filter.statuses.iter().map(|s| s.as_str().to_string()));
    }
    if let Some(owner) = filter.owner {
        conditions.push("user_guid = ?".to_string());
        binds.push(owner.to_string());
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

pub async fn list_releases(pool: &SqlitePool, filter: &ReleaseFilter) -> Result<Vec<Release>> {
    let (clause, binds) = filter_clause(filter);
    let sql = format!(
        "SELECT guid FROM releases{} ORDER BY created_at DESC, guid LIMIT ? OFFSET ?",
        clause
    );

    let mut query = sqlx::query_scalar::<_, String>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    // SQLite treats a negative LIMIT as unbounded
    let guids = query
        .bind(filter.limit.unwrap_or(-1))
        .bind(filter.offset.max(0))
        .fetch_all(pool)
        .await?;

    let mut releases = Vec::with_capacity(guids.len());
    for guid in guids {
        let id = uuid_utils::parse_column("releases.guid", &guid)?;
        releases.push(load_release(pool, id).await?);
    }
    Ok(releases)
}

pub async fn count_releases(pool: &SqlitePool, filter: &ReleaseFilter) -> Result<i64> {
    let (clause, binds) = filter_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM releases{}", clause);

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    Ok(query.fetch_one(pool).await?)
}
