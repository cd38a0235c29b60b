use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{ArchiveLink, Bias, Category, DeepAnalysis, IntelRecord};

/// Insert one record at the head of a collection without rewriting the rest.
///
/// This is the primitive the dispatcher uses. The position subquery runs
/// inside the single INSERT, so two concurrent inserts serialize on the
/// SQLite write lock and both survive, unlike the full-replace `save` path.
pub fn insert_record(
    conn: &Connection,
    collection: &str,
    record: &IntelRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO stream_records
            (collection, position, date, category, bias, title, summary, logic_chain,
             tags, publication_date, facts, opinions, logic, assumptions, url,
             raw_doc_link, card_link)
         VALUES
            (?1,
             (SELECT COALESCE(MIN(position), 0) - 1 FROM stream_records WHERE collection = ?1),
             ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            collection,
            record.date.format("%Y-%m-%d").to_string(),
            record.category.as_str(),
            record.bias.as_str(),
            record.title,
            record.summary,
            record.logic_chain,
            encode_tags(&record.tags),
            record.publication_date,
            record.deep_analysis.facts,
            record.deep_analysis.opinions,
            record.deep_analysis.logic,
            record.deep_analysis.assumptions,
            record.url,
            record.raw_doc_link.encode(),
            record.card_link.encode(),
        ],
    )
    .map_err(|e| DatabaseError::CollectionWrite {
        collection: collection.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Load a collection, most-recent-first.
///
/// Never raises: a missing table, a locked database, or an empty collection
/// all come back as an empty list. This conflates "genuinely empty" with
/// "inaccessible"; accepted, the callers treat both as "nothing to show".
pub fn load(conn: &Connection, collection: &str) -> Vec<IntelRecord> {
    match try_load(conn, collection) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(collection, error = %e, "Collection load failed, returning empty");
            Vec::new()
        }
    }
}

fn try_load(conn: &Connection, collection: &str) -> Result<Vec<IntelRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT date, category, bias, title, summary, logic_chain, tags,
                publication_date, facts, opinions, logic, assumptions, url,
                raw_doc_link, card_link
         FROM stream_records
         WHERE collection = ?1
         ORDER BY position ASC, id DESC",
    )?;

    let rows = stmt.query_map(params![collection], |row| {
        Ok(StreamRow {
            date: row.get(0)?,
            category: row.get(1)?,
            bias: row.get(2)?,
            title: row.get(3)?,
            summary: row.get(4)?,
            logic_chain: row.get(5)?,
            tags: row.get(6)?,
            publication_date: row.get(7)?,
            facts: row.get(8)?,
            opinions: row.get(9)?,
            logic: row.get(10)?,
            assumptions: row.get(11)?,
            url: row.get(12)?,
            raw_doc_link: row.get(13)?,
            card_link: row.get(14)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?));
    }
    Ok(records)
}

/// Replace the full contents of a collection in one transaction.
///
/// Compatibility shim over the legacy full-replace persistence model. Two
/// concurrent `save` calls to the same collection still race last-writer-wins
/// at the whole-collection level; new code should use `insert_record`.
pub fn save(
    conn: &mut Connection,
    collection: &str,
    records: &[IntelRecord],
) -> Result<(), DatabaseError> {
    let tx = conn.transaction().map_err(|e| DatabaseError::CollectionWrite {
        collection: collection.to_string(),
        reason: e.to_string(),
    })?;

    let result = (|| -> Result<(), rusqlite::Error> {
        tx.execute(
            "DELETE FROM stream_records WHERE collection = ?1",
            params![collection],
        )?;
        for (position, record) in records.iter().enumerate() {
            tx.execute(
                "INSERT INTO stream_records
                    (collection, position, date, category, bias, title, summary, logic_chain,
                     tags, publication_date, facts, opinions, logic, assumptions, url,
                     raw_doc_link, card_link)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    collection,
                    position as i64,
                    record.date.format("%Y-%m-%d").to_string(),
                    record.category.as_str(),
                    record.bias.as_str(),
                    record.title,
                    record.summary,
                    record.logic_chain,
                    encode_tags(&record.tags),
                    record.publication_date,
                    record.deep_analysis.facts,
                    record.deep_analysis.opinions,
                    record.deep_analysis.logic,
                    record.deep_analysis.assumptions,
                    record.url,
                    record.raw_doc_link.encode(),
                    record.card_link.encode(),
                ],
            )?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => tx.commit().map_err(|e| DatabaseError::CollectionWrite {
            collection: collection.to_string(),
            reason: e.to_string(),
        }),
        Err(e) => Err(DatabaseError::CollectionWrite {
            collection: collection.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Row count for one collection.
pub fn record_count(conn: &Connection, collection: &str) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM stream_records WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count)
}

struct StreamRow {
    date: String,
    category: String,
    bias: String,
    title: String,
    summary: String,
    logic_chain: String,
    tags: String,
    publication_date: String,
    facts: String,
    opinions: String,
    logic: String,
    assumptions: String,
    url: String,
    raw_doc_link: String,
    card_link: String,
}

/// Tags live in a single cell as embedded JSON.
fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Symmetric decode. A bad cell degrades to an empty list for that field
/// only; it never fails the whole collection load. Single-quoted lists
/// left behind by older writers are repaired before parsing.
fn decode_tags(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(trimmed) {
        return tags;
    }
    serde_json::from_str::<Vec<String>>(&trimmed.replace('\'', "\"")).unwrap_or_default()
}

/// Per-field lenient decode: any cell that fails to parse degrades to that
/// field's default instead of failing the row.
fn record_from_row(row: StreamRow) -> IntelRecord {
    IntelRecord {
        date: NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").unwrap_or_default(),
        category: Category::parse_lenient(&row.category),
        bias: Bias::parse_lenient(&row.bias),
        title: row.title,
        summary: row.summary,
        logic_chain: row.logic_chain,
        tags: decode_tags(&row.tags),
        publication_date: row.publication_date,
        deep_analysis: DeepAnalysis {
            facts: row.facts,
            opinions: row.opinions,
            logic: row.logic,
            assumptions: row.assumptions,
        },
        url: row.url,
        raw_doc_link: ArchiveLink::decode(&row.raw_doc_link),
        card_link: ArchiveLink::decode(&row.card_link),
    }
}
