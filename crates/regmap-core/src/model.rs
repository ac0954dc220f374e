//! # Register Map Model
//!
//! The immutable snapshot produced by the loader: [`Block`] owns an ordered
//! list of [`Register`]s, each owning an ordered list of [`Field`]s.
//! Declaration order is preserved everywhere; documentation and layout
//! generators depend on it.
//!
//! Every derived value (width, mask, hex renderings) is a plain accessor
//! recomputed from the stored attributes. Nothing is cached.
//!
//! Fields are private. The only way to build a model from a document is
//! [`crate::loader`]; the `new` constructors exist for generators and tests
//! that build a model directly, and enforce the same per-entity invariants.

use serde::Serialize;

use crate::access::AccessMode;

/// Byte alignment every register offset must satisfy.
pub const REGISTER_ALIGNMENT: u64 = 4;

/// Highest bit index a field may reach. Masks and reset values are `u64`.
pub const MAX_BIT_INDEX: u32 = u64::BITS - 1;

/// A named, contiguous bit range within a register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    name: String,
    msb: u32,
    lsb: u32,
    description: String,
    reset: u64,
}

impl Field {
    /// Build a field. Returns `None` if `msb < lsb` or `msb` is past
    /// [`MAX_BIT_INDEX`].
    pub fn new(name: impl Into<String>, msb: u32, lsb: u32) -> Option<Self> {
        (msb >= lsb && msb <= MAX_BIT_INDEX).then(|| Self {
            name: name.into(),
            msb,
            lsb,
            description: String::new(),
            reset: 0,
        })
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a reset value.
    pub fn with_reset(mut self, reset: u64) -> Self {
        self.reset = reset;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn msb(&self) -> u32 {
        self.msb
    }

    pub fn lsb(&self) -> u32 {
        self.lsb
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reset(&self) -> u64 {
        self.reset
    }

    /// Number of bits covered: `msb - lsb + 1`, between 1 and 64.
    pub fn width(&self) -> u32 {
        self.msb - self.lsb + 1
    }

    /// Mask of the covered bits in register position.
    pub fn mask(&self) -> u64 {
        // A 64-bit wide field is the one case where `1 << width` overflows.
        let ones = 1u64
            .checked_shl(self.width())
            .map_or(u64::MAX, |bit| bit - 1);
        ones << self.lsb
    }

    /// Reset value as `0x` + uppercase hex, unpadded.
    pub fn reset_hex(&self) -> String {
        format!("0x{:X}", self.reset)
    }

    /// Bit range as written in documentation: `"15:8"`, or `"3"` for a
    /// single-bit field.
    pub fn bits_label(&self) -> String {
        if self.msb == self.lsb {
            self.lsb.to_string()
        } else {
            format!("{}:{}", self.msb, self.lsb)
        }
    }

    /// Whether the reset value fits in the field's width.
    pub fn reset_fits(&self) -> bool {
        self.width() >= u64::BITS || self.reset >> self.width() == 0
    }
}

/// An addressable, word-aligned unit within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Register {
    name: String,
    offset: u64,
    access: AccessMode,
    description: String,
    fields: Vec<Field>,
}

impl Register {
    /// Build a register. Returns `None` if `offset` is not word-aligned.
    pub fn new(name: impl Into<String>, offset: u64, access: AccessMode) -> Option<Self> {
        (offset % REGISTER_ALIGNMENT == 0).then(|| Self {
            name: name.into(),
            offset,
            access,
            description: String::new(),
            fields: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the field list. Order is kept as given.
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset relative to the block base.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn access(&self) -> &AccessMode {
        &self.access
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Offset as `0x` + uppercase hex, unpadded.
    pub fn offset_hex(&self) -> String {
        format!("0x{:X}", self.offset)
    }

    /// Register reset value composed from its fields' reset values.
    pub fn reset_value(&self) -> u64 {
        self.fields.iter().fold(0, |acc, f| {
            acc | (f.reset.checked_shl(f.lsb).unwrap_or(0) & f.mask())
        })
    }

    /// Union of every field mask.
    pub fn used_bits(&self) -> u64 {
        self.fields.iter().fold(0, |acc, f| acc | f.mask())
    }

    /// Absolute address given a block base. Saturates on overflow.
    pub fn address(&self, base: u64) -> u64 {
        base.saturating_add(self.offset)
    }
}

/// A named IP register map: the root of one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    name: String,
    base_address: u64,
    description: String,
    registers: Vec<Register>,
}

impl Block {
    pub fn new(name: impl Into<String>, base_address: u64) -> Self {
        Self {
            name: name.into(),
            base_address,
            description: String::new(),
            registers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the register list. Order is kept as given.
    pub fn with_registers(mut self, registers: Vec<Register>) -> Self {
        self.registers = registers;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registers in declaration order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// First register with the given name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Base address as `0x` + 8 zero-padded uppercase hex digits.
    pub fn base_address_hex(&self) -> String {
        format!("0x{:08X}", self.base_address)
    }

    /// Absolute address of a register in this block.
    pub fn absolute_address(&self, register: &Register) -> u64 {
        register.address(self.base_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(msb: u32, lsb: u32) -> Field {
        Field::new("test", msb, lsb).unwrap()
    }

    #[test]
    fn field_width_single_bit() {
        assert_eq!(field(0, 0).width(), 1);
    }

    #[test]
    fn field_width_multi_bit() {
        assert_eq!(field(7, 0).width(), 8);
    }

    #[test]
    fn field_mask() {
        assert_eq!(field(3, 1).width(), 3);
        assert_eq!(field(3, 1).mask(), 0b1110);
        assert_eq!(field(0, 0).mask(), 0b1);
        assert_eq!(field(15, 8).mask(), 0xFF00);
    }

    #[test]
    fn field_mask_at_64_bits() {
        assert_eq!(field(63, 0).width(), 64);
        assert_eq!(field(63, 0).mask(), u64::MAX);
        assert_eq!(field(63, 63).mask(), 1 << 63);
    }

    #[test]
    fn field_rejects_inverted_range() {
        assert!(Field::new("bad", 0, 3).is_none());
    }

    #[test]
    fn field_rejects_bits_past_63() {
        assert!(Field::new("wide", 64, 0).is_none());
        assert!(Field::new("huge", u32::MAX, 0).is_none());
        assert!(Field::new("high", u32::MAX, u32::MAX).is_none());
        assert!(Field::new("top", MAX_BIT_INDEX, 0).is_some());
    }

    #[test]
    fn field_reset_hex_is_uppercase_unpadded() {
        let f = field(7, 0).with_reset(0xab);
        assert_eq!(f.reset_hex(), "0xAB");
        assert_eq!(field(0, 0).reset_hex(), "0x0");
    }

    #[test]
    fn field_bits_label() {
        assert_eq!(field(15, 8).bits_label(), "15:8");
        assert_eq!(field(4, 4).bits_label(), "4");
    }

    #[test]
    fn field_reset_fits() {
        assert!(field(1, 0).with_reset(3).reset_fits());
        assert!(!field(1, 0).with_reset(4).reset_fits());
        assert!(field(63, 0).with_reset(u64::MAX).reset_fits());
    }

    #[test]
    fn register_rejects_unaligned_offset() {
        assert!(Register::new("R", 3, AccessMode::ReadWrite).is_none());
        assert!(Register::new("R", 4, AccessMode::ReadWrite).is_some());
        assert!(Register::new("R", 0, AccessMode::ReadWrite).is_some());
    }

    #[test]
    fn register_offset_hex() {
        let r = Register::new("R", 0x1C, AccessMode::ReadOnly).unwrap();
        assert_eq!(r.offset_hex(), "0x1C");
        let r = Register::new("R", 0, AccessMode::ReadOnly).unwrap();
        assert_eq!(r.offset_hex(), "0x0");
    }

    #[test]
    fn register_reset_value_combines_fields() {
        let r = Register::new("CTRL", 0, AccessMode::ReadWrite)
            .unwrap()
            .with_fields(vec![
                Field::new("enable", 0, 0).unwrap().with_reset(1),
                Field::new("mode", 3, 1).unwrap().with_reset(0b101),
                Field::new("div", 15, 8).unwrap().with_reset(0x12),
            ]);
        assert_eq!(r.reset_value(), 0x120B);
        assert_eq!(r.used_bits(), 0xFF0F);
    }

    #[test]
    fn register_reset_value_drops_overflowing_bits() {
        let r = Register::new("R", 0, AccessMode::ReadWrite)
            .unwrap()
            .with_fields(vec![Field::new("two", 1, 0).unwrap().with_reset(0x7)]);
        assert_eq!(r.reset_value(), 0x3);
    }

    #[test]
    fn register_field_lookup_keeps_order() {
        let r = Register::new("R", 0, AccessMode::ReadWrite)
            .unwrap()
            .with_fields(vec![field(0, 0), Field::new("mode", 3, 1).unwrap()]);
        assert_eq!(r.fields()[0].name(), "test");
        assert_eq!(r.fields()[1].name(), "mode");
        assert_eq!(r.field("mode").map(Field::lsb), Some(1));
        assert!(r.field("missing").is_none());
    }

    #[test]
    fn block_base_address_hex_is_padded() {
        assert_eq!(Block::new("B", 0x10000000).base_address_hex(), "0x10000000");
        assert_eq!(Block::new("B", 0x400).base_address_hex(), "0x00000400");
        assert_eq!(Block::new("B", 0).base_address_hex(), "0x00000000");
        assert_eq!(Block::new("B", 0x1_0000_0000).base_address_hex(), "0x100000000");
    }

    #[test]
    fn block_absolute_address() {
        let reg = Register::new("STATUS", 0x4, AccessMode::ReadOnly).unwrap();
        let block = Block::new("B", 0x4000_0000).with_registers(vec![reg]);
        let status = block.register("STATUS").unwrap();
        assert_eq!(block.absolute_address(status), 0x4000_0004);
    }

    #[test]
    fn model_serializes_to_json() {
        let block = Block::new("B", 16).with_registers(vec![Register::new(
            "R",
            0,
            AccessMode::WriteOnly,
        )
        .unwrap()]);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["name"], "B");
        assert_eq!(json["base_address"], 16);
        assert_eq!(json["registers"][0]["access"], "WO");
    }

    #[test]
    fn model_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Block>();
    }
}
