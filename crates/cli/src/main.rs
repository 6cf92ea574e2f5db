use std::io;

use stockbook_cli::{Shell, ShellConfig};

fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env();
    stockbook_observability::init_with(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let mut shell = Shell::new(config.code_policy).with_prompt(config.prompt);
    shell.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
