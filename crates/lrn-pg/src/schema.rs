use super::*;

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` built with [`const_format::concatcp!`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
}

/// One row per published model: `(name, total_reward, total_count)`.
pub struct Evaluation;

impl Schema for Evaluation {
    fn name() -> &'static str {
        EVALUATION
    }
    fn creates() -> &'static str {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ", EVALUATION, " (",
                "name         TEXT PRIMARY KEY, ",
                "total_reward BIGINT NOT NULL DEFAULT 0, ",
                "total_count  BIGINT NOT NULL DEFAULT 0",
            ")"
        );
        SQL
    }
}

/// Architecture tag of each published model: `(name, type)`.
pub struct Network;

impl Schema for Network {
    fn name() -> &'static str {
        NETWORK
    }
    fn creates() -> &'static str {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ", NETWORK, " (",
                "name TEXT PRIMARY KEY, ",
                "type TEXT NOT NULL",
            ")"
        );
        SQL
    }
}
