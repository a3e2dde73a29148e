// ABOUTME: RAII transaction guard rolling back any evaluation cycle or goal write not committed
// ABOUTME: Wraps an SQLx SQLite transaction with a consuming commit and logged drop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction guard
//!
//! ```text
//! let mut guard = database.begin().await?;
//! sessions::load_sessions(guard.executor()?).await?;
//! achievements::update_instance(guard.executor()?, &instance).await?;
//! guard.commit().await?;
//! ```
//!
//! Dropping the guard before `commit()` rolls the transaction back, so an
//! error propagated with `?` anywhere inside a cycle leaves the store untouched.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for a `SQLite` transaction
pub struct TransactionGuard<'c> {
    transaction: Option<Transaction<'c, Sqlite>>,
    committed: bool,
}

impl<'c> TransactionGuard<'c> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, Sqlite>) -> Self {
        debug!("TransactionGuard created - transaction will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            ));
        };
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("TransactionGuard committed successfully");
        Ok(())
    }

    /// Roll back explicitly and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the rollback fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            ));
        };
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
        debug!("TransactionGuard rolled back explicitly");
        Ok(())
    }

    /// Connection to run queries on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was used after commit or rollback
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("TransactionGuard dropped without commit - transaction will be rolled back");
        }
    }
}
