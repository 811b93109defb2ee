//! Listing of registered tasks and encoders.

use clap::Parser;

/// Tasks command arguments.
#[derive(Parser)]
pub struct TasksCommand {
    /// Print as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

use anyhow::Result as AnyhowResult;
use shapepiece_tasks::TaskRegistry;
use shapepiece_tokenizer::BpeRegistry;

pub fn run(cmd: TasksCommand) -> AnyhowResult<()> {
    let tasks = TaskRegistry::with_builtin().names();
    let encoders = BpeRegistry::with_builtin().names();

    if cmd.json {
        let listing = serde_json::json!({ "tasks": tasks, "bpe": encoders });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Tasks:");
    for name in &tasks {
        println!("  {}", name);
    }
    println!("Encoders (--bpe):");
    for name in &encoders {
        println!("  {}", name);
    }
    Ok(())
}
