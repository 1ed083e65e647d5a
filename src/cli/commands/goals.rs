use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::goals::GoalListController;
use crate::session::SessionCache;
use crate::store::RestStore;

#[derive(Subcommand)]
pub enum GoalsCommands {
    #[command(about = "List your goals, newest first")]
    List,

    #[command(about = "Add a new goal")]
    Add {
        #[arg(help = "Goal text")]
        text: String,
    },

    #[command(about = "Toggle a goal between done and not done")]
    Toggle {
        #[arg(help = "Goal id")]
        id: Uuid,
    },

    #[command(about = "Delete a goal")]
    Remove {
        #[arg(help = "Goal id")]
        id: Uuid,
    },

    #[command(about = "Show goal counts")]
    Stats,
}

pub async fn handle(cmd: GoalsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let controller = build_controller()?;

    // Every command starts from a fresh load of the owner's collection.
    controller.load().await;
    ensure_clean(&controller)?;

    match cmd {
        GoalsCommands::List => render_list(&controller, &output_format),

        GoalsCommands::Add { text } => {
            if text.trim().is_empty() {
                return output_success(&output_format, "Nothing to add (empty goal text)", None);
            }

            controller.create(&text).await;
            ensure_clean(&controller)?;

            let created = controller.goals().into_iter().next();
            output_success(
                &output_format,
                "Goal added",
                created.map(|goal| json!({ "goal": goal })),
            )
        }

        GoalsCommands::Toggle { id } => {
            controller.toggle(id).await;
            ensure_clean(&controller)?;

            let completed = controller
                .goals()
                .into_iter()
                .find(|g| g.id == id)
                .map(|g| g.completed)
                .unwrap_or(false);
            let message = if completed {
                "Goal marked done"
            } else {
                "Goal marked not done"
            };
            output_success(&output_format, message, Some(json!({ "id": id, "completed": completed })))
        }

        GoalsCommands::Remove { id } => {
            controller.delete(id).await;
            ensure_clean(&controller)?;

            output_success(&output_format, "Goal deleted", Some(json!({ "id": id })))
        }

        GoalsCommands::Stats => {
            let goals = controller.goals();
            let completed = goals.iter().filter(|g| g.completed).count();
            let in_progress = goals.len() - completed;

            match output_format {
                OutputFormat::Text => {
                    println!("Total goals: {}", goals.len());
                    println!("Completed: {}", completed);
                    println!("In progress: {}", in_progress);
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "total": goals.len(),
                            "completed": completed,
                            "in_progress": in_progress,
                        }))?
                    );
                }
            }
            Ok(())
        }
    }
}

fn build_controller() -> anyhow::Result<GoalListController> {
    let session = SessionCache::open_default()?
        .load()?
        .ok_or_else(|| anyhow::anyhow!("not signed in; run 'goaltrack auth login' first"))?;

    let store = RestStore::from_config(config::config(), &session)?;
    Ok(GoalListController::new(Arc::new(store), session.user))
}

/// Map the controller's error slot onto the CLI's failure path.
fn ensure_clean(controller: &GoalListController) -> anyhow::Result<()> {
    match controller.error() {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}

fn render_list(
    controller: &GoalListController,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let goals = controller.goals();
    if goals.is_empty() {
        return output_empty_collection(
            output_format,
            "goals",
            "No goals yet. Add your first goal with 'goaltrack goals add'.",
        );
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "goals": goals }))?);
        }
        OutputFormat::Text => {
            for goal in &goals {
                let mark = if goal.completed { "[x]" } else { "[ ]" };
                println!(
                    "{} {}  {}  {}",
                    mark,
                    goal.id,
                    goal.created_at.format("%Y-%m-%d"),
                    goal.description
                );
            }
        }
    }
    Ok(())
}
