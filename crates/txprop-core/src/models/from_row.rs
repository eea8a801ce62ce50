#[cfg(feature = "postgres")]
use sqlx_core::from_row::FromRow;
#[cfg(feature = "postgres")]
use sqlx_core::row::Row;
#[cfg(feature = "postgres")]
use sqlx_postgres::PgRow;

#[cfg(feature = "postgres")]
use super::User;

#[cfg(feature = "postgres")]
impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx_core::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}
