//! Dry-run output: what an invocation would do.

use anyhow::Result;

use bdrive_lib::Plan;

use crate::output::{ARROW, BULLET, OutputFormat, Tone, emit_json, field, status};

pub fn print_plan(plan: &Plan, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return emit_json(plan);
  }

  status(Tone::Notice, "Dry run - nothing will be removed, built or run");
  field("Platform", plan.os.as_str());
  field("Build directory", &plan.build_dir().display().to_string());
  field(
    "Existing directory",
    if plan.configuration.use_cache { "reused" } else { "removed" },
  );
  field(
    "Toolchain file",
    &plan.configuration.toolchain_file().display().to_string(),
  );
  println!();
  println!("Steps:");
  println!("  {} {}", ARROW, plan.configure);
  println!("  {} {}", ARROW, plan.build);

  if !plan.artifacts.is_empty() {
    println!();
    println!("Artifacts:");
    for artifact in &plan.artifacts {
      println!("  {} {}", BULLET, artifact.expected_path.display());
    }
  }

  Ok(())
}
