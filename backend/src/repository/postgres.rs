//! PostgreSQL repository adapter

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CoffeeRating, CuppingAttributes, CuppingRecord, GreenCoffeeBatch, RoastedCoffeeBatch,
    SalesEntry, ThresholdPolicy, WeightUnit,
};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::InventoryRepository;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgInventoryRepository {
    db: PgPool,
}

impl PgInventoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Database row for a green batch
#[derive(Debug, sqlx::FromRow)]
struct GreenBatchRow {
    id: Uuid,
    variety: String,
    origin: String,
    farm: Option<String>,
    importer: Option<String>,
    warehouse: String,
    bag_size_value: f64,
    bag_size_unit: String,
    quantity_bags: i32,
    rating: String,
    price_per_unit: Option<Decimal>,
    price_unit: String,
    delivery_cost: Option<Decimal>,
    received_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

/// Database row for a roasted batch
#[derive(Debug, sqlx::FromRow)]
struct RoastedBatchRow {
    id: Uuid,
    variety: String,
    origin: String,
    rating: String,
    roast_level: String,
    format_type: String,
    quantity_bags: i32,
    warehouse: String,
    roast_date: NaiveDate,
    linked_green_batch_id: Option<Uuid>,
    cost_per_bag: Option<Decimal>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SalesEntryRow {
    id: Uuid,
    sale_date: NaiveDate,
    product_name: String,
    mapped_variety: Option<String>,
    quantity: f64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CuppingRecordRow {
    id: Uuid,
    cupping_date: NaiveDate,
    variety: String,
    origin: String,
    farm: Option<String>,
    green_batch_id: Option<Uuid>,
    score: Decimal,
    attributes: Json<CuppingAttributes>,
    descriptors: Vec<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

fn parse_column<T>(column: &str, value: &str) -> AppResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| AppError::Storage(format!("Invalid {} '{}': {}", column, value, e)))
}

fn bags_from_column(quantity_bags: i32) -> AppResult<u32> {
    u32::try_from(quantity_bags)
        .map_err(|_| AppError::Storage(format!("Negative bag count {}", quantity_bags)))
}

fn bags_to_column(quantity_bags: u32) -> AppResult<i32> {
    i32::try_from(quantity_bags)
        .map_err(|_| AppError::ValidationError(format!("Bag count {} is too large", quantity_bags)))
}

fn unit_from_column(value: &str) -> WeightUnit {
    match value.parse() {
        Ok(unit) => unit,
        Err(never) => match never {},
    }
}

impl TryFrom<GreenBatchRow> for GreenCoffeeBatch {
    type Error = AppError;

    fn try_from(row: GreenBatchRow) -> AppResult<Self> {
        Ok(GreenCoffeeBatch {
            id: row.id,
            variety: row.variety,
            origin: row.origin,
            farm: row.farm,
            importer: row.importer,
            warehouse: row.warehouse,
            bag_size_value: row.bag_size_value,
            bag_size_unit: unit_from_column(&row.bag_size_unit),
            quantity_bags: bags_from_column(row.quantity_bags)?,
            rating: parse_column::<CoffeeRating>("rating", &row.rating)?,
            price_per_unit: row.price_per_unit,
            price_unit: unit_from_column(&row.price_unit),
            delivery_cost: row.delivery_cost,
            received_date: row.received_date,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<RoastedBatchRow> for RoastedCoffeeBatch {
    type Error = AppError;

    fn try_from(row: RoastedBatchRow) -> AppResult<Self> {
        Ok(RoastedCoffeeBatch {
            id: row.id,
            variety: row.variety,
            origin: row.origin,
            rating: parse_column("rating", &row.rating)?,
            roast_level: parse_column("roast_level", &row.roast_level)?,
            format_type: parse_column("format_type", &row.format_type)?,
            quantity_bags: bags_from_column(row.quantity_bags)?,
            warehouse: row.warehouse,
            roast_date: row.roast_date,
            linked_green_batch_id: row.linked_green_batch_id,
            cost_per_bag: row.cost_per_bag,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

impl From<SalesEntryRow> for SalesEntry {
    fn from(row: SalesEntryRow) -> Self {
        SalesEntry {
            id: row.id,
            date: row.sale_date,
            product_name: row.product_name,
            mapped_variety: row.mapped_variety,
            quantity: row.quantity,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

impl From<CuppingRecordRow> for CuppingRecord {
    fn from(row: CuppingRecordRow) -> Self {
        CuppingRecord {
            id: row.id,
            date: row.cupping_date,
            variety: row.variety,
            origin: row.origin,
            farm: row.farm,
            green_batch_id: row.green_batch_id,
            score: row.score,
            attributes: row.attributes.0,
            descriptors: row.descriptors,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

const GREEN_COLUMNS: &str = "id, variety, origin, farm, importer, warehouse, bag_size_value, \
    bag_size_unit, quantity_bags, rating, price_per_unit, price_unit, delivery_cost, \
    received_date, notes, created_at";

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn list_green_batches(&self) -> AppResult<Vec<GreenCoffeeBatch>> {
        let rows = sqlx::query_as::<_, GreenBatchRow>(&format!(
            "SELECT {} FROM green_batches ORDER BY created_at, id",
            GREEN_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(GreenCoffeeBatch::try_from).collect()
    }

    async fn get_green_batch(&self, id: Uuid) -> AppResult<Option<GreenCoffeeBatch>> {
        let row = sqlx::query_as::<_, GreenBatchRow>(&format!(
            "SELECT {} FROM green_batches WHERE id = $1",
            GREEN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(GreenCoffeeBatch::try_from).transpose()
    }

    async fn insert_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO green_batches (
                id, variety, origin, farm, importer, warehouse, bag_size_value, bag_size_unit,
                quantity_bags, rating, price_per_unit, price_unit, delivery_cost,
                received_date, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(batch.id)
        .bind(&batch.variety)
        .bind(&batch.origin)
        .bind(&batch.farm)
        .bind(&batch.importer)
        .bind(&batch.warehouse)
        .bind(batch.bag_size_value)
        .bind(batch.bag_size_unit.as_str())
        .bind(bags_to_column(batch.quantity_bags)?)
        .bind(batch.rating.as_str())
        .bind(batch.price_per_unit)
        .bind(batch.price_unit.as_str())
        .bind(batch.delivery_cost)
        .bind(batch.received_date)
        .bind(&batch.notes)
        .bind(batch.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn update_green_batch(&self, batch: &GreenCoffeeBatch) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE green_batches
            SET variety = $2, origin = $3, farm = $4, importer = $5, warehouse = $6,
                bag_size_value = $7, bag_size_unit = $8, quantity_bags = $9, rating = $10,
                price_per_unit = $11, price_unit = $12, delivery_cost = $13,
                received_date = $14, notes = $15
            WHERE id = $1
            "#,
        )
        .bind(batch.id)
        .bind(&batch.variety)
        .bind(&batch.origin)
        .bind(&batch.farm)
        .bind(&batch.importer)
        .bind(&batch.warehouse)
        .bind(batch.bag_size_value)
        .bind(batch.bag_size_unit.as_str())
        .bind(bags_to_column(batch.quantity_bags)?)
        .bind(batch.rating.as_str())
        .bind(batch.price_per_unit)
        .bind(batch.price_unit.as_str())
        .bind(batch.delivery_cost)
        .bind(batch.received_date)
        .bind(&batch.notes)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_green_batch(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM green_batches WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_roasted_batches(&self) -> AppResult<Vec<RoastedCoffeeBatch>> {
        let rows = sqlx::query_as::<_, RoastedBatchRow>(
            r#"
            SELECT id, variety, origin, rating, roast_level, format_type, quantity_bags,
                   warehouse, roast_date, linked_green_batch_id, cost_per_bag, notes, created_at
            FROM roasted_batches
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(RoastedCoffeeBatch::try_from).collect()
    }

    async fn insert_roasted_batch(&self, batch: &RoastedCoffeeBatch) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roasted_batches (
                id, variety, origin, rating, roast_level, format_type, quantity_bags,
                warehouse, roast_date, linked_green_batch_id, cost_per_bag, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(batch.id)
        .bind(&batch.variety)
        .bind(&batch.origin)
        .bind(batch.rating.as_str())
        .bind(batch.roast_level.as_str())
        .bind(batch.format_type.as_str())
        .bind(bags_to_column(batch.quantity_bags)?)
        .bind(&batch.warehouse)
        .bind(batch.roast_date)
        .bind(batch.linked_green_batch_id)
        .bind(batch.cost_per_bag)
        .bind(&batch.notes)
        .bind(batch.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_roasted_batch(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roasted_batches WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_sales_entries(&self) -> AppResult<Vec<SalesEntry>> {
        let rows = sqlx::query_as::<_, SalesEntryRow>(
            r#"
            SELECT id, sale_date, product_name, mapped_variety, quantity, notes, created_at
            FROM sales_entries
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SalesEntry::from).collect())
    }

    async fn insert_sales_entry(&self, entry: &SalesEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sales_entries (id, sale_date, product_name, mapped_variety, quantity, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.date)
        .bind(&entry.product_name)
        .bind(&entry.mapped_variety)
        .bind(entry.quantity)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_sales_entry(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sales_entries WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_cupping_records(&self) -> AppResult<Vec<CuppingRecord>> {
        let rows = sqlx::query_as::<_, CuppingRecordRow>(
            r#"
            SELECT id, cupping_date, variety, origin, farm, green_batch_id, score,
                   attributes, descriptors, notes, created_at
            FROM cupping_records
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CuppingRecord::from).collect())
    }

    async fn insert_cupping_record(&self, record: &CuppingRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cupping_records (
                id, cupping_date, variety, origin, farm, green_batch_id, score,
                attributes, descriptors, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(record.date)
        .bind(&record.variety)
        .bind(&record.origin)
        .bind(&record.farm)
        .bind(record.green_batch_id)
        .bind(record.score)
        .bind(Json(&record.attributes))
        .bind(&record.descriptors)
        .bind(&record.notes)
        .bind(record.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_cupping_record(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cupping_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_thresholds(&self) -> AppResult<ThresholdPolicy> {
        let stored = sqlx::query_scalar::<_, Json<ThresholdPolicy>>(
            "SELECT thresholds FROM inventory_settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await?;

        Ok(stored.map(|json| json.0).unwrap_or_default())
    }

    async fn save_thresholds(&self, policy: &ThresholdPolicy) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory_settings (id, thresholds, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE SET thresholds = EXCLUDED.thresholds, updated_at = NOW()
            "#,
        )
        .bind(Json(policy))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
