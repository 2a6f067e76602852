//! Postgres-backed product store.
//!
//! All kinds live in a single `product` table, discriminated by the `type`
//! column (`ProductVariant::discriminator`). Every kind-specific column exists on
//! every row; only the columns of the row's own kind are populated.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateSku` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{instrument, Span};

use catalog_core::ProductId;
use catalog_products::{
    Attributes, BookAttributes, DvdAttributes, FurnitureAttributes, NewProduct, Product,
    ProductVariant,
};

use super::r#trait::{ProductStore, StoreError};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS product (
        id BIGSERIAL PRIMARY KEY,
        type SMALLINT NOT NULL,
        sku VARCHAR(255) NOT NULL UNIQUE,
        name VARCHAR(255) NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        size INTEGER NULL,
        weight DOUBLE PRECISION NULL,
        height DOUBLE PRECISION NULL,
        width DOUBLE PRECISION NULL,
        length DOUBLE PRECISION NULL
    )
"#;

const CREATE_TYPE_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS product_type_idx ON product (type)";

const SELECT_COLUMNS: &str = "id, type, sku, name, price, size, weight, height, width, length";

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
/// The `UNIQUE` constraint on `sku` is the authoritative duplicate guard.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `product` table and its index if they do not exist.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for sql in [CREATE_TABLE_SQL, CREATE_TYPE_INDEX_SQL] {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

/// Kind-specific column values of one row.
#[derive(Debug, Default)]
struct VariantColumns {
    size: Option<i32>,
    weight: Option<f64>,
    height: Option<f64>,
    width: Option<f64>,
    length: Option<f64>,
}

impl VariantColumns {
    fn from_attributes(attributes: &Attributes) -> Self {
        match attributes {
            Attributes::Dvd(a) => Self {
                size: Some(a.size),
                ..Self::default()
            },
            Attributes::Book(a) => Self {
                weight: Some(a.weight),
                ..Self::default()
            },
            Attributes::Furniture(a) => Self {
                height: Some(a.height),
                width: Some(a.width),
                length: Some(a.length),
                ..Self::default()
            },
        }
    }

    fn into_attributes(self, variant: ProductVariant) -> Result<Attributes, String> {
        fn need<T>(v: Option<T>, column: &str) -> Result<T, String> {
            v.ok_or_else(|| format!("missing {column}"))
        }

        Ok(match variant {
            ProductVariant::Dvd => DvdAttributes {
                size: need(self.size, "size")?,
            }
            .into(),
            ProductVariant::Book => BookAttributes {
                weight: need(self.weight, "weight")?,
            }
            .into(),
            ProductVariant::Furniture => FurnitureAttributes {
                height: need(self.height, "height")?,
                width: need(self.width, "width")?,
                length: need(self.length, "length")?,
            }
            .into(),
        })
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::Backend(format!("failed to read product id: {e}")))?;
    let corrupt = |reason: String| StoreError::Corrupt { id, reason };

    let discriminator: i16 = row.try_get("type").map_err(|e| corrupt(e.to_string()))?;
    let variant = ProductVariant::from_discriminator(discriminator).map_err(|e| corrupt(e.to_string()))?;

    let columns = VariantColumns {
        size: row.try_get("size").map_err(|e| corrupt(e.to_string()))?,
        weight: row.try_get("weight").map_err(|e| corrupt(e.to_string()))?,
        height: row.try_get("height").map_err(|e| corrupt(e.to_string()))?,
        width: row.try_get("width").map_err(|e| corrupt(e.to_string()))?,
        length: row.try_get("length").map_err(|e| corrupt(e.to_string()))?,
    };
    let attributes = columns.into_attributes(variant).map_err(corrupt)?;

    let sku: String = row.try_get("sku").map_err(|e| corrupt(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| corrupt(e.to_string()))?;
    let price: f64 = row.try_get("price").map_err(|e| corrupt(e.to_string()))?;

    Ok(Product::restore(ProductId::new(id), sku, name, price, attributes))
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), fields(product_count = tracing::field::Empty), err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM product ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let products = rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()?;
        Span::current().record("product_count", products.len());
        Ok(products)
    }

    #[instrument(skip(self), err)]
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM product WHERE sku = $1"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_sku", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self, product), fields(sku = %product.sku()), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let columns = VariantColumns::from_attributes(product.attributes());

        let row = sqlx::query(
            r#"
            INSERT INTO product (type, sku, name, price, size, weight, height, width, length)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(product.variant().discriminator())
        .bind(product.sku())
        .bind(product.name())
        .bind(product.price())
        .bind(columns.size)
        .bind(columns.weight)
        .bind(columns.height)
        .bind(columns.width)
        .bind(columns.length)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("insert", e) {
            StoreError::DuplicateSku(_) => StoreError::DuplicateSku(product.sku().to_string()),
            other => other,
        })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| StoreError::Backend(format!("insert returned no id: {e}")))?;
        Ok(product.into_stored(ProductId::new(id)))
    }

    #[instrument(skip(self), fields(requested = ids.len()), err)]
    async fn delete_many(&self, ids: &[ProductId]) -> Result<Vec<ProductId>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows = sqlx::query("DELETE FROM product WHERE id = ANY($1) RETURNING id")
            .bind(raw)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_many", e))?;

        let mut removed = rows
            .iter()
            .map(|r| r.try_get::<i64, _>("id").map(ProductId::new))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Backend(format!("delete returned bad id: {e}")))?;
        removed.sort();
        Ok(removed)
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::DuplicateSku(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dvd_columns_only_populate_size() {
        let cols = VariantColumns::from_attributes(&DvdAttributes { size: 700 }.into());
        assert_eq!(cols.size, Some(700));
        assert!(cols.weight.is_none() && cols.height.is_none());
    }

    #[test]
    fn furniture_columns_round_trip() {
        let attrs: Attributes = FurnitureAttributes {
            height: 1.0,
            width: 2.0,
            length: 3.0,
        }
        .into();
        let back = VariantColumns::from_attributes(&attrs)
            .into_attributes(ProductVariant::Furniture)
            .unwrap();
        assert_eq!(back, attrs);
    }

    #[test]
    fn incomplete_columns_are_reported() {
        let cols = VariantColumns {
            height: Some(1.0),
            ..VariantColumns::default()
        };
        assert_eq!(
            cols.into_attributes(ProductVariant::Furniture).unwrap_err(),
            "missing width"
        );
    }

    #[test]
    fn columns_of_another_kind_do_not_satisfy_a_row() {
        let cols = VariantColumns::from_attributes(&BookAttributes { weight: 1.0 }.into());
        assert!(cols.into_attributes(ProductVariant::Dvd).is_err());
    }
}
