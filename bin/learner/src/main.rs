//! Learner Binary
//!
//! Pulls sample units from the store, trains, and publishes models until stopped.
//!
//! Commands: run (default), status

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lrn_core::log();
    lrn_core::kys();
    lrn_core::brb();
    lrn_autotrain::Mode::run().await
}
