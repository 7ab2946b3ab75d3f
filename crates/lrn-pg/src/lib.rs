//! PostgreSQL model registry.
//!
//! Published artifacts live in the object store under [`MODEL_PREFIX`];
//! the database records one `evaluation` row per artifact so that serving
//! and evaluation jobs can find it.
//!
//! ## Connectivity
//!
//! - [`db()`] — connects, and creates the registry tables if missing
//!
//! ## Core Types
//!
//! - [`Schema`] — table metadata and DDL
//! - [`Evaluations`] — count and insert of model rows, for [`Client`]
//! - [`MemoryEvaluations`] — in-process rows for tests and dry runs
//! - [`Registry`] — existence check and publish
//! - [`ModelRegistry`] — [`Registry`] over an object store and [`Evaluations`]
//!
//! [`MODEL_PREFIX`]: lrn_core::MODEL_PREFIX
mod error;
mod evaluations;
mod registry;
mod schema;

pub use error::*;
pub use evaluations::*;
pub use registry::*;
pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection and ensures the registry tables exist.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("{:<32}{:<32}", "connecting to database", redact(url));
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    client.batch_execute(Evaluation::creates()).await?;
    client.batch_execute(Network::creates()).await?;
    Ok(Arc::new(client))
}

/// Drops the password from a connection URL before it is logged.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            let userinfo = &url[scheme + 3..at];
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{}{}:***{}", &url[..scheme + 3], user, &url[at..])
        }
        _ => url.to_string(),
    }
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table with one row per published model.
#[rustfmt::skip]
pub const EVALUATION: &str = "evaluation";
/// Table naming the architecture behind each published model.
#[rustfmt::skip]
pub const NETWORK:    &str = "network";
