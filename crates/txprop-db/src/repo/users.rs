use sqlx_core::row::Row;
use sqlx_postgres::PgConnection;
use txprop_core::User;

/// Statements against `users`, run on whatever connection the caller's
/// transaction scope hands out.
pub struct UserRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user: &User) -> Result<(), sqlx_core::Error> {
        query!(
            r#"
            INSERT INTO users (id, name)
            VALUES ($1, $2)
            "#,
            user.id,
            user.name.as_str()
        )
        .execute(&mut *self.conn)
        .await
        .map(|_| ())
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, name
            FROM users
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.conn)
        .await
    }

    pub async fn list(&mut self) -> Result<Vec<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, name
            FROM users
            ORDER BY id
            "#
        )
        .fetch_all(&mut *self.conn)
        .await
    }

    pub async fn count(&mut self) -> Result<i64, sqlx_core::Error> {
        let row = query!(r#"SELECT COUNT(*) AS count FROM users"#)
            .fetch_one(&mut *self.conn)
            .await?;
        row.try_get::<i64, _>("count")
    }

    pub async fn delete_all(&mut self) -> Result<u64, sqlx_core::Error> {
        query!(r#"DELETE FROM users"#)
            .execute(&mut *self.conn)
            .await
            .map(|result| result.rows_affected())
    }
}
