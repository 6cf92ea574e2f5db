//! Shell command grammar.
//!
//! One command per line. Arguments are separated by whitespace, double quotes
//! group words (`add 7 "Lápiz HB" Escritura 0.5 10`), and optional fields use
//! `field=value`. Lines that are blank or start with `#` are ignored.

use stockbook_products::StockDirection;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        code: String,
        name: String,
        category: String,
        price: String,
        quantity: String,
    },
    Edit {
        code: String,
        name: String,
        category: String,
        price: String,
        quantity: String,
    },
    Remove {
        code: String,
    },
    Show {
        code: String,
    },
    Move {
        direction: StockDirection,
        code: String,
        amount: String,
    },
    List,
    Sort {
        key: String,
    },
    Filter {
        code: String,
        name: String,
        category: String,
    },
    Export,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument {argument:?}")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error("{command}: unknown field {field:?} (expected one of: {expected})")]
    UnknownField {
        command: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("unterminated quote")]
    UnterminatedQuote,
}

pub const HELP: &str = "\
commands:
  add <code> <name> <category> <price> <quantity>
  edit <code> [name=..] [category=..] [price=..] [quantity=..]
  remove <code>
  show <code>
  in <code> <amount>
  out <code> <amount>
  list
  sort <name|price|category|quantity>
  filter [code=..] [name=..] [category=..]
  export
  help
  quit";

impl Command {
    /// Parse one input line. `Ok(None)` for blank and comment lines.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        if line.trim_start().starts_with('#') {
            return Ok(None);
        }
        let tokens = tokenize(line)?;
        let Some((head, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match head.to_lowercase().as_str() {
            "add" => {
                let [code, name, category, price, quantity] =
                    positional("add", args, ["code", "name", "category", "price", "quantity"])?;
                Command::Add {
                    code,
                    name,
                    category,
                    price,
                    quantity,
                }
            }
            "edit" => {
                let (code, rest) = args.split_first().ok_or(CommandError::MissingArgument {
                    command: "edit",
                    argument: "code",
                })?;
                let [name, category, price, quantity] =
                    fields("edit", rest, ["name", "category", "price", "quantity"])?;
                Command::Edit {
                    code: code.clone(),
                    name,
                    category,
                    price,
                    quantity,
                }
            }
            "remove" => {
                let [code] = positional("remove", args, ["code"])?;
                Command::Remove { code }
            }
            "show" => {
                let [code] = positional("show", args, ["code"])?;
                Command::Show { code }
            }
            "in" => {
                let [code, amount] = positional("in", args, ["code", "amount"])?;
                Command::Move {
                    direction: StockDirection::In,
                    code,
                    amount,
                }
            }
            "out" => {
                let [code, amount] = positional("out", args, ["code", "amount"])?;
                Command::Move {
                    direction: StockDirection::Out,
                    code,
                    amount,
                }
            }
            "list" => {
                positional("list", args, [])?;
                Command::List
            }
            "sort" => {
                let [key] = positional("sort", args, ["key"])?;
                Command::Sort { key }
            }
            "filter" => {
                let [code, name, category] = fields("filter", args, ["code", "name", "category"])?;
                Command::Filter {
                    code,
                    name,
                    category,
                }
            }
            "export" => {
                positional("export", args, [])?;
                Command::Export
            }
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Exactly `N` positional arguments, named for error messages.
fn positional<const N: usize>(
    command: &'static str,
    args: &[String],
    names: [&'static str; N],
) -> Result<[String; N], CommandError> {
    if let Some(extra) = args.get(N) {
        return Err(CommandError::UnexpectedArgument {
            command,
            argument: extra.clone(),
        });
    }
    if args.len() < N {
        return Err(CommandError::MissingArgument {
            command,
            argument: names[args.len()],
        });
    }
    Ok(core::array::from_fn(|i| args[i].clone()))
}

/// Optional `field=value` arguments; absent fields come back empty.
fn fields<const N: usize>(
    command: &'static str,
    args: &[String],
    names: [&'static str; N],
) -> Result<[String; N], CommandError> {
    let mut values: [String; N] = core::array::from_fn(|_| String::new());

    for arg in args {
        let Some((field, value)) = arg.split_once('=') else {
            return Err(CommandError::UnexpectedArgument {
                command,
                argument: arg.clone(),
            });
        };
        let field = field.trim().to_lowercase();
        let Some(idx) = names.iter().position(|n| *n == field) else {
            return Err(CommandError::UnknownField {
                command,
                field,
                expected: expected_fields(command),
            });
        };
        values[idx] = value.to_string();
    }

    Ok(values)
}

fn expected_fields(command: &str) -> &'static str {
    match command {
        "edit" => "name, category, price, quantity",
        _ => "code, name, category",
    }
}

/// Split on whitespace, keeping double-quoted runs together (quotes removed).
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(core::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_groups_quoted_words() {
        assert_eq!(
            tokenize(r#"add 7 "Lápiz HB" Escritura"#).unwrap(),
            ["add", "7", "Lápiz HB", "Escritura"]
        );
        assert_eq!(
            tokenize(r#"edit 7 name="Regla 30 cm""#).unwrap(),
            ["edit", "7", "name=Regla 30 cm"]
        );
        assert_eq!(tokenize(r#"filter name="""#).unwrap(), ["filter", "name="]);
        assert_eq!(tokenize("   ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn tokenizer_rejects_open_quote() {
        assert_eq!(tokenize(r#"add "Lápiz"#), Err(CommandError::UnterminatedQuote));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# seed data").unwrap(), None);
        assert_eq!(Command::parse("  # restock \"later").unwrap(), None);
    }

    #[test]
    fn parses_add() {
        let cmd = Command::parse(r#"ADD 001 Regla "Geometría" 1.50 20"#).unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                code: "001".into(),
                name: "Regla".into(),
                category: "Geometría".into(),
                price: "1.50".into(),
                quantity: "20".into(),
            }
        );
    }

    #[test]
    fn add_reports_first_missing_argument() {
        assert_eq!(
            Command::parse("add 001 Regla").unwrap_err(),
            CommandError::MissingArgument {
                command: "add",
                argument: "category"
            }
        );
    }

    #[test]
    fn rejects_extra_positional_arguments() {
        assert_eq!(
            Command::parse("remove 1 2").unwrap_err(),
            CommandError::UnexpectedArgument {
                command: "remove",
                argument: "2".into()
            }
        );
        assert!(Command::parse("list all").is_err());
    }

    #[test]
    fn parses_edit_fields_in_any_order() {
        let cmd = Command::parse("edit 001 price=9.99 Name=Regla").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Edit {
                code: "001".into(),
                name: "Regla".into(),
                category: String::new(),
                price: "9.99".into(),
                quantity: String::new(),
            }
        );
    }

    #[test]
    fn edit_rejects_unknown_field() {
        let err = Command::parse("edit 001 color=red").unwrap_err();
        assert!(matches!(err, CommandError::UnknownField { field, .. } if field == "color"));
    }

    #[test]
    fn parses_stock_movements() {
        assert_eq!(
            Command::parse("out 001 5").unwrap().unwrap(),
            Command::Move {
                direction: StockDirection::Out,
                code: "001".into(),
                amount: "5".into(),
            }
        );
    }

    #[test]
    fn parses_filter_and_sort() {
        assert_eq!(
            Command::parse("filter name=lap category=escritura").unwrap().unwrap(),
            Command::Filter {
                code: String::new(),
                name: "lap".into(),
                category: "escritura".into(),
            }
        );
        assert_eq!(
            Command::parse("sort color").unwrap().unwrap(),
            Command::Sort { key: "color".into() }
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            Command::parse("frobnicate").unwrap_err(),
            CommandError::UnknownCommand("frobnicate".into())
        );
    }
}
