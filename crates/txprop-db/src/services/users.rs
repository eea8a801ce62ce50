use std::sync::Arc;

use sqlx_postgres::PgConnection;
use tracing::{error, info};
use txprop_core::{
    DivideByZero, FaultInjector, InnerCall, Propagation, SaveReport, SequencerRows,
    ServiceError, ServiceResult, User,
};

use crate::repo::UserRepo;
use crate::tx::{TxManager, TxScope};

fn db_error(err: sqlx_core::Error) -> ServiceError {
    ServiceError::Db(err.to_string())
}

fn insert_error(err: sqlx_core::Error, id: i64) -> ServiceError {
    if let sqlx_core::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ServiceError::DuplicateId { id };
        }
    }
    db_error(err)
}

async fn insert_user(conn: &mut PgConnection, user: &User) -> ServiceResult<()> {
    UserRepo::new(conn)
        .create(user)
        .await
        .map_err(|err| insert_error(err, user.id))
}

/// Two dependent writes under different transaction boundaries: the outer
/// row joins or creates a transaction, the inner row gets an independent
/// one and then fails.
pub struct UserService<'a> {
    manager: &'a TxManager,
    rows: SequencerRows,
    fault: Arc<dyn FaultInjector>,
    inner_call: InnerCall,
}

impl<'a> UserService<'a> {
    pub fn new(manager: &'a TxManager) -> Self {
        Self {
            manager,
            rows: SequencerRows::default(),
            fault: Arc::new(DivideByZero),
            inner_call: InnerCall::default(),
        }
    }

    pub fn with_rows(mut self, rows: SequencerRows) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_fault(mut self, fault: impl FaultInjector + 'static) -> Self {
        self.fault = Arc::new(fault);
        self
    }

    pub fn with_inner_call(mut self, inner_call: InnerCall) -> Self {
        self.inner_call = inner_call;
        self
    }

    pub fn rows(&self) -> &SequencerRows {
        &self.rows
    }

    /// Outer write. Failures of the inner write are logged and swallowed;
    /// anything failing before that rolls the outer transaction back.
    pub async fn save(&self) -> ServiceResult<SaveReport> {
        self.rows.validate()?;
        let mut tx = self.manager.begin(Propagation::Required, None).await?;
        let outcome = self.save_in(&mut tx).await;
        let report = tx.complete(outcome).await?;
        info!(
            event = "outer_write_committed",
            outer_id = report.outer_id,
            inner_call = %report.inner_call,
            inner_failed = report.inner_failed()
        );
        Ok(report)
    }

    async fn save_in(&self, tx: &mut TxScope<'_>) -> ServiceResult<SaveReport> {
        insert_user(tx.connection(), &self.rows.outer).await?;

        let inner = match self.inner_call {
            InnerCall::Routed => self.save2(Some(&mut *tx)).await,
            InnerCall::Direct => self.save2_direct(tx).await,
            InnerCall::Joined => self.save2_with(Propagation::Required, Some(&mut *tx)).await,
        };
        let inner_error = match inner {
            Ok(()) => None,
            Err(err) => {
                error!(
                    event = "inner_write_failed",
                    inner_call = %self.inner_call,
                    kind = err.kind(),
                    error = %err,
                    "inner write failed"
                );
                Some(err)
            }
        };

        Ok(SaveReport {
            inner_call: self.inner_call,
            outer_id: self.rows.outer.id,
            inner_id: self.rows.inner.id,
            inner_error,
        })
    }

    /// Inner write in a new, independent transaction. Always propagates the
    /// injected fault, so with the default injector its row never commits.
    pub async fn save2(&self, outer: Option<&mut TxScope<'_>>) -> ServiceResult<()> {
        self.save2_with(Propagation::RequiresNew, outer).await
    }

    async fn save2_with(
        &self,
        propagation: Propagation,
        outer: Option<&mut TxScope<'_>>,
    ) -> ServiceResult<()> {
        let mut tx = self.manager.begin(propagation, outer).await?;
        let outcome = self.save2_in(&mut tx).await;
        tx.complete(outcome).await
    }

    /// Inner body on the outer connection, its declared propagation ignored.
    /// Only the insert sits behind a savepoint: a failed statement would
    /// otherwise abort the outer transaction and its commit would silently
    /// roll back.
    async fn save2_direct(&self, tx: &mut TxScope<'_>) -> ServiceResult<()> {
        let mut savepoint = self.manager.begin(Propagation::Nested, Some(tx)).await?;
        let outcome = insert_user(savepoint.connection(), &self.rows.inner).await;
        savepoint.complete(outcome).await?;
        self.fault.after_inner_insert()
    }

    async fn save2_in(&self, tx: &mut TxScope<'_>) -> ServiceResult<()> {
        insert_user(tx.connection(), &self.rows.inner).await?;
        self.fault.after_inner_insert()
    }
}

/// Reads and housekeeping on `users`, each call in its own transaction.
pub struct UserTableService<'a> {
    manager: &'a TxManager,
}

impl<'a> UserTableService<'a> {
    pub fn new(manager: &'a TxManager) -> Self {
        Self { manager }
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        let mut tx = self.manager.begin(Propagation::Required, None).await?;
        let outcome = UserRepo::new(tx.connection()).list().await.map_err(db_error);
        tx.complete(outcome).await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Option<User>> {
        let mut tx = self.manager.begin(Propagation::Required, None).await?;
        let outcome = UserRepo::new(tx.connection())
            .get_by_id(id)
            .await
            .map_err(db_error);
        tx.complete(outcome).await
    }

    pub async fn reset(&self) -> ServiceResult<u64> {
        let mut tx = self.manager.begin(Propagation::Required, None).await?;
        let outcome = UserRepo::new(tx.connection())
            .delete_all()
            .await
            .map_err(db_error);
        let deleted = tx.complete(outcome).await?;
        info!(event = "users_reset", deleted = deleted);
        Ok(deleted)
    }
}
