//! Schema command: JSON Schema of the results file.

use clap::Args;
use tracing::instrument;

use stemwise_core::batch::result_set_schema;

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the schema of the file `complete` writes.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&result_set_schema())?);
    Ok(())
}
