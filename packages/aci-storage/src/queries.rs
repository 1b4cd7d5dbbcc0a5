use time::OffsetDateTime;

use aci_domain::InsightRecord;

use crate::{Error, Result, db::Db, models::InsightRow};

const INSIGHT_COLUMNS: &str =
	"id, insight, results, limitations_context, difference_score, status, created_at";

pub async fn insert_insight(db: &Db, record: &InsightRecord) -> Result<InsightRow> {
	let row = InsightRow::from_record(record, OffsetDateTime::now_utc());

	sqlx::query(
		"\
INSERT INTO insights (
	id,
	insight,
	results,
	limitations_context,
	difference_score,
	status,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(row.id)
	.bind(row.insight.as_str())
	.bind(&row.results)
	.bind(row.limitations_context.as_str())
	.bind(row.difference_score)
	.bind(row.status.as_str())
	.bind(row.created_at)
	.execute(&db.pool)
	.await?;

	Ok(row)
}

/// Rows whose insight text contains any keyword, case-insensitively, newest id first.
pub async fn fetch_by_keywords(db: &Db, keywords: &[String], limit: u32) -> Result<Vec<InsightRow>> {
	check_limit(limit)?;

	if keywords.is_empty() {
		return Ok(Vec::new());
	}

	let patterns: Vec<String> =
		keywords.iter().map(|keyword| format!("%{}%", escape_like(keyword))).collect();
	let sql = format!(
		"\
SELECT {INSIGHT_COLUMNS}
FROM insights
WHERE insight ILIKE ANY($1)
ORDER BY id DESC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, InsightRow>(&sql)
		.bind(&patterns)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn fetch_recent(db: &Db, limit: u32) -> Result<Vec<InsightRow>> {
	check_limit(limit)?;

	let sql = format!(
		"\
SELECT {INSIGHT_COLUMNS}
FROM insights
ORDER BY id DESC
LIMIT $1"
	);
	let rows =
		sqlx::query_as::<_, InsightRow>(&sql).bind(i64::from(limit)).fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn count_insights(db: &Db) -> Result<i64> {
	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM insights").fetch_one(&db.pool).await?;

	Ok(count)
}

fn check_limit(limit: u32) -> Result<()> {
	if limit == 0 {
		return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
	}

	Ok(())
}

fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
