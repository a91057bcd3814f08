/*!
 * Process Registry
 * Owner id issuing and the program catalog
 */

use super::types::{MemoryError, MemoryResult, ProgramDefinition};
use crate::core::limits::DEFAULT_PROGRAMS;
use crate::core::types::{OwnerId, ProgramId, Size, MIB};
use log::info;

/// Issues owner ids and remembers which programs can be launched
///
/// The sequence counter is simulation-wide: only [`ProcessRegistry::reset`]
/// rewinds it, switching partition mode does not.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    next_sequence: u64,
    next_program: u32,
    programs: Vec<ProgramDefinition>,
}

impl ProcessRegistry {
    /// Registry preloaded with the default program catalog
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, size) in DEFAULT_PROGRAMS {
            registry.push_program(name.to_string(), size);
        }
        registry
    }

    /// Registry with no programs defined
    pub fn empty() -> Self {
        Self {
            next_sequence: 1,
            next_program: 1,
            programs: Vec::new(),
        }
    }

    /// Owner id the next accepted request will receive
    pub fn peek_owner(&self, program: &str) -> OwnerId {
        OwnerId::issue(program, self.next_sequence)
    }

    /// Mark the peeked owner id as used
    pub fn commit(&mut self) {
        self.next_sequence += 1;
    }

    /// Start a new simulation; the catalog is kept
    pub fn reset(&mut self) {
        self.next_sequence = 1;
    }

    /// Register a custom program and return its catalog id
    pub fn define(&mut self, name: &str, size: Size) -> MemoryResult<ProgramId> {
        let name = validate_name(name)?;
        if size == 0 {
            return Err(MemoryError::invalid_input("program size must be greater than 0"));
        }

        let id = self.push_program(name.to_string(), size);
        info!("Defined program {} '{}' ({} bytes)", id, name, size);
        Ok(id)
    }

    pub fn get(&self, id: ProgramId) -> Option<&ProgramDefinition> {
        self.programs.iter().find(|p| p.id == id)
    }

    /// Look a program up by catalog id or, failing that, by name (case-insensitive)
    pub fn lookup(&self, key: &str) -> MemoryResult<&ProgramDefinition> {
        let key = key.trim();
        let by_id = key
            .parse::<u32>()
            .ok()
            .and_then(|id| self.get(ProgramId(id)));

        by_id
            .or_else(|| {
                self.programs
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| MemoryError::UnknownProgram(key.to_string()))
    }

    pub fn programs(&self) -> &[ProgramDefinition] {
        &self.programs
    }

    fn push_program(&mut self, name: String, size: Size) -> ProgramId {
        let id = ProgramId(self.next_program);
        self.next_program += 1;
        self.programs.push(ProgramDefinition { id, name, size });
        id
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramDefinition {
    /// Convert a size given in (possibly fractional) MB to bytes
    pub fn bytes_from_mib(mib: f64) -> MemoryResult<Size> {
        if !mib.is_finite() || mib <= 0.0 {
            return Err(MemoryError::invalid_input(format!(
                "program size must be a positive number of MB, got {}",
                mib
            )));
        }
        let bytes = (mib * MIB as f64).round();
        if bytes < 1.0 || bytes > Size::MAX as f64 {
            return Err(MemoryError::invalid_input(format!(
                "program size {} MB is out of range",
                mib
            )));
        }
        Ok(bytes as Size)
    }
}

/// Trimmed, non-empty program name
pub(crate) fn validate_name(name: &str) -> MemoryResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MemoryError::invalid_input("program name must not be empty"));
    }
    Ok(name)
}
