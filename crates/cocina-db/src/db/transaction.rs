//! Transaction helper for multi-statement writes.
//!
//! ```rust,ignore
//! use diesel_async::scoped_futures::ScopedFutureExt;
//! use crate::db::transaction::with_transaction;
//!
//! with_transaction(&mut conn, |conn| async move {
//!     query::user::clear_invite_token(conn, inviter_id, &token, now).await?;
//!     query::user::create_user(conn, &new_user).await
//! }.scope_boxed()).await?;
//! ```

use diesel_async::{AsyncConnection, scoped_futures::ScopedBoxFuture};

use crate::db::connection::DbConnection;
use crate::error::{DbError, DbResult};

/// ## Summary
/// Runs a database transaction and returns the closure result. The transaction
/// is rolled back when the closure returns an error.
///
/// ## Errors
/// Returns any error produced by the closure, or errors raised while starting
/// or committing the transaction.
pub async fn with_transaction<'a, 'conn, 'pool, T, F>(
    conn: &'conn mut DbConnection<'pool>,
    callback: F,
) -> DbResult<T>
where
    F: for<'r> FnOnce(&'r mut DbConnection<'pool>) -> ScopedBoxFuture<'a, 'r, DbResult<T>>
        + Send
        + 'a,
    T: Send + 'a,
    'a: 'conn,
{
    conn.transaction::<T, DbError, F>(callback).await
}
