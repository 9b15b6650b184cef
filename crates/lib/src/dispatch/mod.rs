//! The path command dispatcher.
//!
//! [`Dispatcher`] is the single entry point the hosting process calls: it
//! parses the command string, validates operands, runs the read-modify-write
//! cycle against the [`Ledger`], and returns a [`Reply`].
//!
//! Replies separate two failure channels deliberately. Validation failures
//! (wrong operand type, protected field, unknown command) are data: they come
//! back as `Ok(Err(CommandError))` so the host can render them to the caller.
//! Infrastructure failures (the backend erroring) propagate as `Err(_)` and
//! abort the request. Because every write is the final step of its handler, an
//! aborted command never leaves a partially-updated record behind.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::info;

use crate::Result;
use crate::backend::Backend;
use crate::doc::Value;
use crate::ledger::{CURRENCY_FIELD, Ledger};

mod command;
mod errors;

pub use command::Command;
pub use errors::CommandError;

/// The outcome of one command: a value, or a validation error carried as data.
pub type Reply = std::result::Result<Value, CommandError>;

/// Executes commands against a [`Ledger`].
///
/// The dispatcher holds no record state of its own. Its only internal state is
/// the set of caller tags seen so far, kept for first-interaction logging and
/// without any effect on data semantics. Two concurrent commands against the
/// same player can interleave their read-modify-write windows; see the crate
/// documentation for the accepted lost-update race.
pub struct Dispatcher<B> {
    ledger: Ledger<B>,
    /// Caller tags that have interacted with the store, for first-seen logging
    dependents: Mutex<HashSet<String>>,
}

impl<B: Backend> Dispatcher<B> {
    /// Creates a dispatcher over the given ledger.
    pub fn new(ledger: Ledger<B>) -> Self {
        Self {
            ledger,
            dependents: Mutex::new(HashSet::new()),
        }
    }

    /// The ledger this dispatcher executes against.
    pub fn ledger(&self) -> &Ledger<B> {
        &self.ledger
    }

    /// Handles one command from a caller.
    ///
    /// `event` is the raw command string, `from` an opaque tag naming the
    /// caller, and `args[0]` the target player id for every command that takes
    /// one (`args[1]` the operand where applicable).
    ///
    /// Unknown commands, `format`, and `round` never touch the backend.
    pub async fn handle(&self, event: &str, from: &str, args: &[Value]) -> Result<Reply> {
        self.note_dependent(from);

        let command = match Command::parse(event) {
            Ok(command) => command,
            Err(err) => return Ok(Err(err)),
        };

        self.execute(command, args).await
    }

    /// Renders a reply as the wire shape the host expects: the value itself,
    /// or `{"error": "<message>"}`.
    pub fn reply_json(reply: &Reply) -> serde_json::Value {
        match reply {
            Ok(value) => value.clone().into(),
            Err(err) => serde_json::json!({ "error": err.to_string() }),
        }
    }

    async fn execute(&self, command: Command, args: &[Value]) -> Result<Reply> {
        // The two pure helpers take their operand in args[0] and need no
        // player record at all.
        match command {
            Command::Format => {
                return Ok(match args.first().and_then(Value::as_number) {
                    Some(amount) => Ok(Value::Text(self.ledger.format(amount))),
                    None => Err(CommandError::FormatOperandNotNumber),
                });
            }
            Command::Round => {
                return Ok(match args.first().and_then(Value::as_number) {
                    Some(amount) => Ok(Value::Number(self.ledger.round(amount))),
                    None => Err(CommandError::RoundOperandNotNumber),
                });
            }
            _ => {}
        }

        let Some(player) = args.first().and_then(Value::as_text) else {
            return Ok(Err(CommandError::MissingPlayerId));
        };
        let operand = args.get(1);

        match command {
            Command::Get => {
                let record = self.ledger.record(player).await?;
                Ok(Ok(Value::Doc(record)))
            }

            Command::Currency => {
                let balance = self.ledger.balance(player).await?;
                Ok(Ok(Value::Text(balance)))
            }

            Command::GetPath(path) => {
                let record = self.ledger.record(player).await?;
                Ok(Ok(record.get(&path).cloned().unwrap_or(Value::Null)))
            }

            Command::Update => match operand {
                Some(Value::Doc(partial)) => {
                    self.ledger.merge(player, partial.clone()).await?;
                    Ok(Ok(Value::Null))
                }
                _ => Ok(Err(CommandError::UpdateOperandNotMap)),
            },

            Command::Set(path) => {
                let mut record = self.ledger.record(player).await?;
                record.set_path(&path, operand.cloned().unwrap_or(Value::Null))?;
                self.ledger.merge(player, record).await?;
                Ok(Ok(Value::Null))
            }

            Command::Add(path) => {
                let mut record = self.ledger.record(player).await?;
                let new_value;
                {
                    let (container, field) = record.resolve_mut(&path)?;
                    let existing = match container.get(field) {
                        None => 0.0,
                        Some(Value::Number(n)) => *n,
                        Some(_) => return Ok(Err(CommandError::AddTargetNotNumber)),
                    };
                    let Some(amount) = operand.and_then(Value::as_number) else {
                        return Ok(Err(CommandError::AddOperandNotNumber));
                    };
                    // The persist step rounds a top-level currency field, and
                    // the caller sees the same value that is stored.
                    new_value = if path.len() == 1 && field == CURRENCY_FIELD {
                        self.ledger.round(existing + amount)
                    } else {
                        existing + amount
                    };
                    container.insert(field, new_value);
                }
                self.ledger.merge(player, record).await?;
                Ok(Ok(Value::Number(new_value)))
            }

            Command::Push(path) => {
                let mut record = self.ledger.record(player).await?;
                let result;
                {
                    let (container, field) = record.resolve_mut(&path)?;
                    match container.get(field) {
                        None | Some(Value::List(_)) => {}
                        Some(_) => return Ok(Err(CommandError::PushTargetNotList)),
                    }
                    if container.get(field).is_none() {
                        container.insert(field, Value::List(Vec::new()));
                    }
                    let pushed = operand.cloned().unwrap_or(Value::Null);
                    if let Some(Value::List(list)) = container.get_mut(field) {
                        list.push(pushed);
                    }
                    result = container.get(field).cloned().unwrap_or(Value::Null);
                }
                self.ledger.merge(player, record).await?;
                Ok(Ok(result))
            }

            Command::Delete(path) => {
                if path.len() == 1
                    && path.last().is_some_and(|field| self.ledger.is_base_field(field))
                {
                    return Ok(Err(CommandError::DeleteBaseField));
                }
                let mut record = self.ledger.record(player).await?;
                let captured = record.remove_path(&path)?.unwrap_or(Value::Null);
                self.ledger.replace(player, record).await?;
                Ok(Ok(captured))
            }

            // Handled before the player id is required
            Command::Format | Command::Round => unreachable!(),
        }
    }

    fn note_dependent(&self, from: &str) {
        let Ok(mut seen) = self.dependents.lock() else {
            return;
        };
        if seen.insert(from.to_string()) {
            info!(caller = %from, "new caller interacting with the currency store");
        }
    }

    /// Number of distinct caller tags seen so far.
    pub fn dependent_count(&self) -> usize {
        self.dependents.lock().map(|seen| seen.len()).unwrap_or(0)
    }
}
