//! Interactive session: reads commands, drives the store, prints results.

use std::io::{self, BufRead, Write};

use stockbook_core::DomainResult;
use stockbook_products::{
    CodePolicy, ProductFilter, ProductStore, describe_error, input, render_listing,
};

use crate::command::{Command, HELP};
use crate::config::DEFAULT_PROMPT;

/// What the session should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Quit,
}

/// A shell session owning its own store.
#[derive(Debug)]
pub struct Shell {
    store: ProductStore,
    policy: CodePolicy,
    prompt: String,
}

impl Shell {
    pub fn new(policy: CodePolicy) -> Self {
        Self::with_store(ProductStore::new(), policy)
    }

    pub fn with_store(store: ProductStore, policy: CodePolicy) -> Self {
        Self {
            store,
            policy,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily rather than ending
    /// the session.
    pub fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        tracing::info!(policy = ?self.policy, "shell started");

        write!(output, "{}", self.prompt)?;
        output.flush()?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let raw = String::from_utf8_lossy(&buf);
            let line = raw.trim_end_matches(['\n', '\r']);
            match self.handle_line(line) {
                Some(Reply::Quit) => break,
                Some(Reply::Print(text)) => writeln!(output, "{text}")?,
                None => {}
            }
            write!(output, "{}", self.prompt)?;
            output.flush()?;
        }

        writeln!(output)?;
        tracing::info!(products = self.store.len(), "shell finished");
        Ok(())
    }

    /// Handle one raw input line. `None` for lines that produce no output.
    pub fn handle_line(&mut self, line: &str) -> Option<Reply> {
        match Command::parse(line) {
            Ok(Some(command)) => Some(self.execute(command)),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable command line");
                Some(Reply::Print(format!("Error: {e}")))
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Reply {
        if command == Command::Quit {
            return Reply::Quit;
        }

        let text = match self.apply(command) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(kind = e.kind(), error = %e, "command rejected");
                format!("Error: {}", describe_error(&e))
            }
        };
        Reply::Print(text)
    }

    fn apply(&mut self, command: Command) -> DomainResult<String> {
        match command {
            Command::Add {
                code,
                name,
                category,
                price,
                quantity,
            } => {
                let new =
                    input::parse_new_product(self.policy, &code, &name, &category, &price, &quantity)?;
                self.store.insert(new)?;
                Ok("Product added.".to_string())
            }
            Command::Edit {
                code,
                name,
                category,
                price,
                quantity,
            } => {
                let code = code.trim();
                let patch = input::parse_patch(&name, &category, &price, &quantity)?;
                let unchanged = patch.is_empty();
                self.store.update(code, patch)?;
                Ok(if unchanged {
                    "Nothing to change.".to_string()
                } else {
                    "Product updated.".to_string()
                })
            }
            Command::Remove { code } => {
                self.store.delete(code.trim())?;
                Ok("Product removed.".to_string())
            }
            Command::Show { code } => Ok(self.store.find(code.trim())?.to_string()),
            Command::Move {
                direction,
                code,
                amount,
            } => {
                let delta = input::parse_movement(direction, &amount)?;
                let code = code.trim();
                let quantity = self.store.adjust_quantity(code, delta)?;
                Ok(format!("Stock updated: {code} now has {quantity}."))
            }
            Command::Sort { key } => Ok(render_listing(&self.store.sort_by_name(&key)?)),
            Command::Filter {
                code,
                name,
                category,
            } => {
                let filter = ProductFilter::new()
                    .code(code.trim())
                    .name(name.trim())
                    .category(category.trim());
                Ok(render_listing(&self.store.filter(&filter)))
            }
            Command::List => Ok(render_listing(&self.store.list())),
            Command::Export => Ok(self.export()),
            Command::Help | Command::Quit => Ok(HELP.to_string()),
        }
    }

    fn export(&self) -> String {
        match serde_json::to_string_pretty(&self.store.list()) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                format!("Error: export failed ({e}).")
            }
        }
    }
}
