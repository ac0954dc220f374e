//! # Register Map Lint
//!
//! Cross-entity checks over an already-loaded [`Block`]. The loader accepts
//! duplicate names, overlapping offsets and overlapping bit ranges; this
//! module is where a caller opts in to rejecting them.
//!
//! ## Checks
//!
//! | Kind | Severity |
//! |------|----------|
//! | duplicate register name | error |
//! | overlapping register offset | error |
//! | duplicate field name within a register | error |
//! | overlapping field bits within a register | error |
//! | field beyond the register width | error |
//! | reset value wider than its field | error |
//! | register address beyond the address bus | error |
//! | unknown access mode | warning |
//!
//! Findings are reported in declaration order.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::config::LintConfig;
use crate::model::{Block, Register};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    DuplicateRegisterName,
    OverlappingOffset,
    DuplicateFieldName,
    OverlappingBits,
    FieldOutOfRange,
    ResetOverflow,
    AddressOutOfRange,
    UnknownAccessMode,
}

impl LintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateRegisterName => "duplicate_register_name",
            Self::OverlappingOffset => "overlapping_offset",
            Self::DuplicateFieldName => "duplicate_field_name",
            Self::OverlappingBits => "overlapping_bits",
            Self::FieldOutOfRange => "field_out_of_range",
            Self::ResetOverflow => "reset_overflow",
            Self::AddressOutOfRange => "address_out_of_range",
            Self::UnknownAccessMode => "unknown_access_mode",
        }
    }

    /// Severity before any `warnings_as_errors` promotion.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnknownAccessMode => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for LintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: LintKind,
    pub severity: Severity,
    /// Register the finding is about, if any.
    pub register: Option<String>,
    /// Field the finding is about, if any.
    pub field: Option<String>,
    pub message: String,
}

impl Finding {
    /// `REG.field`, `REG`, or `block`.
    pub fn location(&self) -> String {
        match (&self.register, &self.field) {
            (Some(reg), Some(field)) => format!("{reg}.{field}"),
            (Some(reg), None) => reg.clone(),
            _ => "block".to_string(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity.as_str().to_ascii_uppercase(),
            self.kind,
            self.location(),
            self.message
        )
    }
}

/// All findings for one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub findings: Vec<Finding>,
}

impl LintReport {
    /// No findings of any severity.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether any error-severity finding exists.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: LintKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

struct Linter<'a> {
    config: &'a LintConfig,
    report: LintReport,
}

impl Linter<'_> {
    fn push(&mut self, kind: LintKind, register: Option<&str>, field: Option<&str>, message: String) {
        let severity = if self.config.warnings_as_errors {
            Severity::Error
        } else {
            kind.default_severity()
        };
        self.report.findings.push(Finding {
            kind,
            severity,
            register: register.map(str::to_string),
            field: field.map(str::to_string),
            message,
        });
    }
}

/// Run every check over `block`.
pub fn lint(block: &Block, config: &LintConfig) -> LintReport {
    let mut linter = Linter {
        config,
        report: LintReport::default(),
    };

    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut offsets: HashMap<u64, &str> = HashMap::new();

    for (index, reg) in block.registers().iter().enumerate() {
        match names.entry(reg.name()) {
            Entry::Occupied(first) => {
                let message = format!(
                    "register name also used by register at index {} (this is index {index})",
                    first.get()
                );
                linter.push(LintKind::DuplicateRegisterName, Some(reg.name()), None, message);
            }
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }

        match offsets.entry(reg.offset()) {
            Entry::Occupied(other) => {
                let message = format!(
                    "offset {} already used by register '{}'",
                    reg.offset_hex(),
                    other.get()
                );
                linter.push(LintKind::OverlappingOffset, Some(reg.name()), None, message);
            }
            Entry::Vacant(slot) => {
                slot.insert(reg.name());
            }
        }

        if !reg.access().is_known() {
            linter.push(
                LintKind::UnknownAccessMode,
                Some(reg.name()),
                None,
                format!("access mode '{}' is not one of RW, RO, WO", reg.access()),
            );
        }

        check_address(&mut linter, block, reg);
        check_fields(&mut linter, reg);
    }

    tracing::debug!(
        block = block.name(),
        findings = linter.report.findings.len(),
        "linted register block"
    );
    linter.report
}

fn check_address(linter: &mut Linter<'_>, block: &Block, reg: &Register) {
    let width = linter.config.address_width;
    // Last byte of the register word must be addressable.
    let last_byte = block
        .base_address()
        .checked_add(reg.offset())
        .and_then(|addr| addr.checked_add(3));
    let fits = match last_byte {
        Some(addr) => width >= u64::BITS || addr >> width == 0,
        None => false,
    };
    if !fits {
        let message = format!(
            "address {:#X} + {} does not fit a {width}-bit address bus",
            block.base_address(),
            reg.offset_hex()
        );
        linter.push(LintKind::AddressOutOfRange, Some(reg.name()), None, message);
    }
}

fn check_fields(linter: &mut Linter<'_>, reg: &Register) {
    let register_width = linter.config.register_width;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut claimed: Vec<(&str, u64)> = Vec::new();

    for (index, field) in reg.fields().iter().enumerate() {
        let name = field.name();

        if !seen.insert(name) {
            linter.push(
                LintKind::DuplicateFieldName,
                Some(reg.name()),
                Some(name),
                format!("field name declared more than once (again at index {index})"),
            );
        }

        if field.msb() >= register_width {
            linter.push(
                LintKind::FieldOutOfRange,
                Some(reg.name()),
                Some(name),
                format!(
                    "bits {} exceed the {register_width}-bit register",
                    field.bits_label()
                ),
            );
        }

        if !field.reset_fits() {
            linter.push(
                LintKind::ResetOverflow,
                Some(reg.name()),
                Some(name),
                format!(
                    "reset value {} does not fit in {} bit(s)",
                    field.reset_hex(),
                    field.width()
                ),
            );
        }

        let mask = field.mask();
        for (other, other_mask) in &claimed {
            if mask & other_mask != 0 {
                let message = format!(
                    "bits {} overlap field '{other}' (mask {:#X})",
                    field.bits_label(),
                    mask & other_mask
                );
                linter.push(LintKind::OverlappingBits, Some(reg.name()), Some(name), message);
            }
        }
        claimed.push((name, mask));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessMode;
    use crate::model::Field;

    fn reg(name: &str, offset: u64, fields: Vec<Field>) -> Register {
        Register::new(name, offset, AccessMode::ReadWrite)
            .unwrap()
            .with_fields(fields)
    }

    fn field(name: &str, msb: u32, lsb: u32) -> Field {
        Field::new(name, msb, lsb).unwrap()
    }

    fn run(block: &Block) -> LintReport {
        lint(block, &LintConfig::default())
    }

    #[test]
    fn clean_block_is_clean() {
        let block = Block::new("B", 0x4000_0000).with_registers(vec![
            reg("CTRL", 0, vec![field("en", 0, 0), field("mode", 3, 1)]),
            reg("STATUS", 4, vec![field("ready", 0, 0), field("code", 15, 8)]),
        ]);
        let report = run(&block);
        assert!(report.is_clean(), "{report:?}");
        assert!(!report.has_errors());
    }

    #[test]
    fn duplicate_register_names() {
        let block = Block::new("B", 0).with_registers(vec![
            reg("CTRL", 0, vec![]),
            reg("CTRL", 4, vec![]),
            reg("CTRL", 8, vec![]),
        ]);
        let report = run(&block);
        let dups: Vec<_> = report.of_kind(LintKind::DuplicateRegisterName).collect();
        assert_eq!(dups.len(), 2);
        assert!(dups[1].message.contains("index 0"));
    }

    #[test]
    fn overlapping_offsets() {
        let block = Block::new("B", 0).with_registers(vec![reg("A", 4, vec![]), reg("B", 4, vec![])]);
        let report = run(&block);
        let found: Vec<_> = report.of_kind(LintKind::OverlappingOffset).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].register.as_deref(), Some("B"));
        assert!(found[0].message.contains("0x4"));
        assert!(found[0].message.contains("'A'"));
    }

    #[test]
    fn duplicate_field_names() {
        let block =
            Block::new("B", 0).with_registers(vec![reg("R", 0, vec![field("x", 0, 0), field("x", 1, 1)])]);
        let report = run(&block);
        assert_eq!(report.of_kind(LintKind::DuplicateFieldName).count(), 1);
        assert_eq!(report.of_kind(LintKind::OverlappingBits).count(), 0);
    }

    #[test]
    fn overlapping_bits() {
        let block = Block::new("B", 0)
            .with_registers(vec![reg("R", 0, vec![field("lo", 7, 0), field("mid", 11, 4)])]);
        let report = run(&block);
        let found: Vec<_> = report.of_kind(LintKind::OverlappingBits).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location(), "R.mid");
        assert!(found[0].message.contains("0xF0"));
    }

    #[test]
    fn field_out_of_range_uses_config_width() {
        let block = Block::new("B", 0).with_registers(vec![reg("R", 0, vec![field("hi", 31, 16)])]);
        assert!(run(&block).is_clean());

        let narrow = LintConfig {
            register_width: 16,
            ..LintConfig::default()
        };
        let report = lint(&block, &narrow);
        assert_eq!(report.of_kind(LintKind::FieldOutOfRange).count(), 1);
    }

    #[test]
    fn reset_overflow() {
        let block = Block::new("B", 0)
            .with_registers(vec![reg("R", 0, vec![field("two", 1, 0).with_reset(0x4)])]);
        let report = run(&block);
        let found: Vec<_> = report.of_kind(LintKind::ResetOverflow).collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("0x4"));
    }

    #[test]
    fn address_out_of_range() {
        let block = Block::new("B", 0xFFFF_FFF0).with_registers(vec![
            reg("LAST", 0xC, vec![]),
            reg("OVER", 0x10, vec![]),
        ]);
        let report = run(&block);
        let found: Vec<_> = report.of_kind(LintKind::AddressOutOfRange).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location(), "OVER");

        let wide = LintConfig {
            address_width: 64,
            ..LintConfig::default()
        };
        assert!(lint(&block, &wide).is_clean());
    }

    #[test]
    fn unknown_access_is_warning() {
        let irq = Register::new("IRQ", 0, AccessMode::from("W1C")).unwrap();
        let block = Block::new("B", 0).with_registers(vec![irq]);
        let report = run(&block);
        assert!(!report.is_clean());
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);

        let strict = LintConfig {
            warnings_as_errors: true,
            ..LintConfig::default()
        };
        let report = lint(&block, &strict);
        assert!(report.has_errors());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn finding_display() {
        let finding = Finding {
            kind: LintKind::OverlappingBits,
            severity: Severity::Error,
            register: Some("R".to_string()),
            field: Some("f".to_string()),
            message: "bits 3:0 overlap field 'g' (mask 0x1)".to_string(),
        };
        assert_eq!(
            finding.to_string(),
            "ERROR [overlapping_bits] R.f: bits 3:0 overlap field 'g' (mask 0x1)"
        );
    }

    #[test]
    fn findings_keep_declaration_order() {
        let block = Block::new("B", 0).with_registers(vec![
            reg("A", 0, vec![field("x", 0, 0), field("x", 0, 0)]),
            reg("A", 0, vec![]),
        ]);
        let kinds: Vec<_> = run(&block).findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LintKind::DuplicateFieldName,
                LintKind::OverlappingBits,
                LintKind::DuplicateRegisterName,
                LintKind::OverlappingOffset,
            ]
        );
    }
}
