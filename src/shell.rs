/*!
 * Command Shell
 * Line-oriented commands driving a `MemoryManager`
 *
 * ```text
 * mode <fixed|variable|dynamic|compaction>
 * policy <first|best|worst>
 * alloc <bytes|NKiB|NMiB> <name...>
 * run <program-id|program name...>
 * define <MiB> <name...>
 * free <owner-id...>
 * compact
 * reset
 * show | stats | programs | events
 * ```
 */

use crate::core::serde::parse_size;
use crate::core::types::Size;
use crate::memory::{
    MemoryError, MemoryInfo, MemoryManager, MemoryResult, MemoryStats, PartitionMode,
    PlacementPolicy, ProgramDefinition, Snapshot,
};
use crate::monitoring::Event;
use serde::Serialize;
use std::str::FromStr;

/// One parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mode(PartitionMode),
    Policy(PlacementPolicy),
    Alloc { size: Size, name: String },
    Run(String),
    Define { mib: f64, name: String },
    Free(String),
    Compact,
    Reset,
    Show,
    Stats,
    Programs,
    Events,
}

/// Result of executing a command, printed as one JSON line
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Output {
    Snapshot(Snapshot),
    Stats(MemoryStats),
    Programs(Vec<ProgramDefinition>),
    Defined(ProgramDefinition),
    Events { dropped: u64, events: Vec<Event> },
    Policy(PlacementPolicy),
}

/// Whether a script line carries a command at all
pub fn is_command_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

fn usage(command: &str, form: &str) -> MemoryError {
    MemoryError::invalid_input(format!("usage: {} {}", command, form))
}

fn rest_as_name<'a>(parts: impl Iterator<Item = &'a str>) -> Option<String> {
    let name = parts.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl FromStr for Command {
    type Err = MemoryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let keyword = parts
            .next()
            .ok_or_else(|| MemoryError::invalid_input("empty command"))?
            .to_ascii_lowercase();

        let command = match keyword.as_str() {
            "mode" => Command::Mode(
                parts
                    .next()
                    .ok_or_else(|| usage("mode", "<fixed|variable|dynamic|compaction>"))?
                    .parse()?,
            ),
            "policy" => Command::Policy(
                parts
                    .next()
                    .ok_or_else(|| usage("policy", "<first|best|worst>"))?
                    .parse()?,
            ),
            "alloc" => {
                let raw = parts.next().ok_or_else(|| usage("alloc", "<size> <name>"))?;
                let size = parse_size(raw).ok_or_else(|| {
                    MemoryError::invalid_input(format!("'{}' is not a valid size", raw))
                })?;
                let name = rest_as_name(parts).ok_or_else(|| usage("alloc", "<size> <name>"))?;
                Command::Alloc { size, name }
            }
            "run" => Command::Run(
                rest_as_name(parts).ok_or_else(|| usage("run", "<program-id|name>"))?,
            ),
            "define" => {
                let raw = parts.next().ok_or_else(|| usage("define", "<MiB> <name>"))?;
                let mib = raw.parse::<f64>().map_err(|_| {
                    MemoryError::invalid_input(format!("'{}' is not a number of MB", raw))
                })?;
                let name = rest_as_name(parts).ok_or_else(|| usage("define", "<MiB> <name>"))?;
                Command::Define { mib, name }
            }
            "free" | "release" => {
                Command::Free(rest_as_name(parts).ok_or_else(|| usage("free", "<owner-id>"))?)
            }
            "compact" => Command::Compact,
            "reset" => Command::Reset,
            "show" => Command::Show,
            "stats" => Command::Stats,
            "programs" => Command::Programs,
            "events" => Command::Events,
            other => {
                return Err(MemoryError::invalid_input(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        Ok(command)
    }
}

impl Command {
    /// Apply the command to `manager`
    pub fn execute(self, manager: &mut MemoryManager) -> MemoryResult<Output> {
        let output = match self {
            Command::Mode(mode) => Output::Snapshot(manager.set_mode(mode)),
            Command::Policy(policy) => {
                manager.set_policy(policy);
                Output::Policy(manager.policy())
            }
            Command::Alloc { size, name } => Output::Snapshot(manager.allocate(&name, size)?),
            Command::Run(key) => Output::Snapshot(manager.launch(&key)?),
            Command::Define { mib, name } => {
                let id = manager.define_program_mib(&name, mib)?;
                let program = manager
                    .registry()
                    .get(id)
                    .cloned()
                    .ok_or_else(|| MemoryError::UnknownProgram(id.to_string()))?;
                Output::Defined(program)
            }
            Command::Free(owner) => Output::Snapshot(manager.release(&owner)?),
            Command::Compact => Output::Snapshot(manager.compact_now()?),
            Command::Reset => Output::Snapshot(manager.reset()),
            Command::Show => Output::Snapshot(manager.snapshot()),
            Command::Stats => Output::Stats(manager.stats()),
            Command::Programs => Output::Programs(manager.programs().to_vec()),
            Command::Events => Output::Events {
                dropped: manager.dropped_events(),
                events: manager.drain_events(),
            },
        };
        Ok(output)
    }
}
