//! Explicit transaction scopes.
//!
//! A [`TxScope`] is opened from a [`TxManager`] with a [`Propagation`] and,
//! optionally, the scope it is called from. Statements run on
//! [`TxScope::connection`]. Opening a scope from an outer one borrows the
//! outer mutably for as long as the new scope lives, so a suspended outer
//! scope cannot run statements until the inner one is finished.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlx_core::connection::Connection;
use sqlx_core::transaction::Transaction;
use sqlx_postgres::{PgConnection, Postgres};
use tracing::{debug, warn};
use txprop_core::{Propagation, ScopePlan, TxError};
use uuid::Uuid;

use crate::PgPool;

#[derive(Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin<'a>(
        &self,
        propagation: Propagation,
        outer: Option<&'a mut TxScope<'_>>,
    ) -> Result<TxScope<'a>, TxError> {
        let Some(outer) = outer else {
            return self.begin_physical(propagation, None).await;
        };
        match propagation.plan(true) {
            ScopePlan::Physical => self.begin_physical(propagation, Some(outer.tx_id)).await,
            ScopePlan::Participant => {
                let tx_id = outer.tx_id;
                let rollback_only = Arc::clone(&outer.rollback_only);
                debug!(
                    event = "tx_join",
                    tx_id = %tx_id,
                    propagation = %propagation,
                    outer_propagation = %outer.propagation
                );
                Ok(TxScope {
                    tx_id,
                    propagation,
                    state: ScopeState::Participant(outer.connection()),
                    rollback_only,
                    _outer: PhantomData,
                })
            }
            ScopePlan::Savepoint => {
                let tx_id = Uuid::now_v7();
                let parent_id = outer.tx_id;
                let tx = Connection::begin(outer.connection())
                    .await
                    .map_err(|err| TxError::Begin(err.to_string()))?;
                debug!(
                    event = "tx_savepoint",
                    tx_id = %tx_id,
                    parent_tx_id = %parent_id,
                    propagation = %propagation
                );
                Ok(TxScope {
                    tx_id,
                    propagation,
                    state: ScopeState::Savepoint(tx),
                    rollback_only: Arc::new(AtomicBool::new(false)),
                    _outer: PhantomData,
                })
            }
        }
    }

    async fn begin_physical<'a>(
        &self,
        propagation: Propagation,
        suspended: Option<Uuid>,
    ) -> Result<TxScope<'a>, TxError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|err| TxError::Begin(err.to_string()))?;
        let tx_id = Uuid::now_v7();
        debug!(
            event = "tx_begin",
            tx_id = %tx_id,
            propagation = %propagation,
            suspended_tx_id = ?suspended
        );
        Ok(TxScope {
            tx_id,
            propagation,
            state: ScopeState::Physical(tx),
            rollback_only: Arc::new(AtomicBool::new(false)),
            _outer: PhantomData,
        })
    }
}

enum ScopeState<'a> {
    Physical(Transaction<'static, Postgres>),
    Savepoint(Transaction<'a, Postgres>),
    Participant(&'a mut PgConnection),
}

/// A transaction boundary. Dropping a physical or savepoint scope without
/// finishing it rolls it back; dropping a participant does nothing.
pub struct TxScope<'a> {
    tx_id: Uuid,
    propagation: Propagation,
    state: ScopeState<'a>,
    rollback_only: Arc<AtomicBool>,
    _outer: PhantomData<&'a mut ()>,
}

impl<'a> TxScope<'a> {
    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn is_new_transaction(&self) -> bool {
        matches!(self.state, ScopeState::Physical(_))
    }

    pub fn has_savepoint(&self) -> bool {
        matches!(self.state, ScopeState::Savepoint(_))
    }

    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only.load(Ordering::Acquire)
    }

    /// Forces the physical transaction (or savepoint) behind this scope to
    /// roll back when its owner commits.
    pub fn set_rollback_only(&self) {
        self.rollback_only.store(true, Ordering::Release);
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        match &mut self.state {
            ScopeState::Physical(tx) => &mut **tx,
            ScopeState::Savepoint(tx) => &mut **tx,
            ScopeState::Participant(conn) => &mut **conn,
        }
    }

    pub async fn commit(self) -> Result<(), TxError> {
        let tx_id = self.tx_id;
        let rollback_only = self.rollback_only.load(Ordering::Acquire);
        match self.state {
            ScopeState::Physical(tx) => finish_owned(tx, tx_id, rollback_only, "tx_commit").await,
            ScopeState::Savepoint(tx) => {
                finish_owned(tx, tx_id, rollback_only, "tx_release_savepoint").await
            }
            ScopeState::Participant(_) => {
                debug!(event = "tx_participant_done", tx_id = %tx_id);
                Ok(())
            }
        }
    }

    pub async fn rollback(self) -> Result<(), TxError> {
        let tx_id = self.tx_id;
        match self.state {
            ScopeState::Physical(tx) => {
                tx.rollback()
                    .await
                    .map_err(|err| TxError::Rollback(err.to_string()))?;
                debug!(event = "tx_rollback", tx_id = %tx_id);
            }
            ScopeState::Savepoint(tx) => {
                tx.rollback()
                    .await
                    .map_err(|err| TxError::Rollback(err.to_string()))?;
                debug!(event = "tx_rollback_savepoint", tx_id = %tx_id);
            }
            ScopeState::Participant(_) => {
                self.rollback_only.store(true, Ordering::Release);
                debug!(event = "tx_mark_rollback_only", tx_id = %tx_id);
            }
        }
        Ok(())
    }

    /// Commits on `Ok` and rolls back on `Err`, handing the outcome back.
    /// A failed rollback is logged; the original error wins.
    pub async fn complete<T, E>(self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<TxError>,
    {
        match outcome {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                let tx_id = self.tx_id;
                if let Err(rollback_err) = self.rollback().await {
                    warn!(event = "tx_rollback_failed", tx_id = %tx_id, error = %rollback_err);
                }
                Err(err)
            }
        }
    }
}

async fn finish_owned(
    tx: Transaction<'_, Postgres>,
    tx_id: Uuid,
    rollback_only: bool,
    event: &'static str,
) -> Result<(), TxError> {
    if rollback_only {
        tx.rollback()
            .await
            .map_err(|err| TxError::Rollback(err.to_string()))?;
        warn!(event = "tx_unexpected_rollback", tx_id = %tx_id);
        return Err(TxError::UnexpectedRollback { tx_id });
    }
    tx.commit()
        .await
        .map_err(|err| TxError::Commit(err.to_string()))?;
    debug!(event = event, tx_id = %tx_id);
    Ok(())
}
