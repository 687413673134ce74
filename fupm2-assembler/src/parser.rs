//! Assembly operand parser
//!
//! Consumes the operand words that follow a mnemonic, according to the
//! opcode's operand format.

use crate::encoder::Field;
use crate::error::ErrorKind;
use fupm2_spec::{OperandFormat, Opcode, Register};

/// Immediate or address operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    /// Unsigned decimal literal, already checked against its field width
    Literal(u32),
    /// Label reference, resolved after the whole source is read
    Label(&'a str),
}

/// One instruction with its operands parsed but labels unresolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInstruction<'a> {
    pub opcode: Opcode,
    /// First register (RI, RR, RM)
    pub r1: Option<Register>,
    /// Second register (RR)
    pub r2: Option<Register>,
    /// Trailing immediate or address field
    pub operand: Operand<'a>,
}

impl ParsedInstruction<'_> {
    /// Field receiving the trailing operand
    pub fn field(&self) -> Field {
        Field::for_format(self.opcode.format())
    }
}

/// Parse register name (`r0`..`r15`, any case)
pub fn parse_register(name: &str) -> Result<Register, ErrorKind> {
    Register::from_name(name).ok_or_else(|| ErrorKind::UnknownRegister(name.to_string()))
}

/// Parse an immediate/address word for `field`
///
/// Digit-only words are literals; anything else names a label.
pub fn parse_operand(word: &str, field: Field) -> Result<Operand<'_>, ErrorKind> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(Operand::Label(word));
    }
    match word.parse::<u32>() {
        Ok(value) if value <= field.max() => Ok(Operand::Literal(value)),
        _ => Err(field.too_large(word)),
    }
}

/// Parse the operands of `opcode` from `words`
pub fn parse_instruction<'a, I>(opcode: Opcode, words: &mut I) -> Result<ParsedInstruction<'a>, ErrorKind>
where
    I: Iterator<Item = &'a str>,
{
    let format = opcode.format();
    let field = Field::for_format(format);

    let (r1, r2) = match format {
        OperandFormat::RI | OperandFormat::RM => (Some(next_register(words)?), None),
        OperandFormat::RR => {
            let r1 = next_register(words)?;
            let r2 = next_register(words)?;
            (Some(r1), Some(r2))
        }
        OperandFormat::Me | OperandFormat::Im => (None, None),
    };

    let word = words.next().ok_or(field.expected())?;
    let operand = parse_operand(word, field)?;

    Ok(ParsedInstruction {
        opcode,
        r1,
        r2,
        operand,
    })
}

fn next_register<'a, I>(words: &mut I) -> Result<Register, ErrorKind>
where
    I: Iterator<Item = &'a str>,
{
    let word = words.next().ok_or(ErrorKind::RegisterExpected)?;
    parse_register(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Words;

    fn parse(opcode: Opcode, operands: &str) -> Result<ParsedInstruction<'_>, ErrorKind> {
        parse_instruction(opcode, &mut Words::new(operands))
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(parse_register("r0").unwrap(), Register::R0);
        assert_eq!(parse_register("R14").unwrap(), Register::SP);
        assert_eq!(
            parse_register("r16"),
            Err(ErrorKind::UnknownRegister("r16".to_string()))
        );
    }

    #[test]
    fn test_parse_operand() {
        assert_eq!(parse_operand("42", Field::Imm20), Ok(Operand::Literal(42)));
        assert_eq!(parse_operand("loop", Field::Addr20), Ok(Operand::Label("loop")));
        // Signs are not part of the literal syntax
        assert_eq!(parse_operand("-1", Field::Imm20), Ok(Operand::Label("-1")));
        assert_eq!(
            parse_operand("1048576", Field::Imm20),
            Err(ErrorKind::ImmediateTooLarge("1048576".to_string()))
        );
        assert_eq!(parse_operand("65535", Field::Imm16), Ok(Operand::Literal(65535)));
        assert_eq!(
            parse_operand("65536", Field::Imm16),
            Err(ErrorKind::ImmediateTooLarge("65536".to_string()))
        );
        assert_eq!(
            parse_operand("99999999999999999999", Field::Addr20),
            Err(ErrorKind::AddressTooLarge("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_parse_ri() {
        let inst = parse(Opcode::Lc, "r3 7").unwrap();
        assert_eq!(inst.r1, Some(Register::R3));
        assert_eq!(inst.r2, None);
        assert_eq!(inst.operand, Operand::Literal(7));
        assert_eq!(inst.field(), Field::Imm20);
    }

    #[test]
    fn test_parse_rr() {
        let inst = parse(Opcode::Add, "r1 r2 0").unwrap();
        assert_eq!(inst.r1, Some(Register::R1));
        assert_eq!(inst.r2, Some(Register::R2));
        assert_eq!(inst.field(), Field::Imm16);
    }

    #[test]
    fn test_parse_me() {
        let inst = parse(Opcode::Jmp, "done").unwrap();
        assert_eq!(inst.r1, None);
        assert_eq!(inst.operand, Operand::Label("done"));
    }

    #[test]
    fn test_missing_operands() {
        assert_eq!(parse(Opcode::Lc, ""), Err(ErrorKind::RegisterExpected));
        assert_eq!(parse(Opcode::Lc, "r0"), Err(ErrorKind::ImmediateExpected));
        assert_eq!(parse(Opcode::Add, "r0"), Err(ErrorKind::RegisterExpected));
        assert_eq!(parse(Opcode::Load, "r0"), Err(ErrorKind::AddressExpected));
        assert_eq!(parse(Opcode::Jmp, ""), Err(ErrorKind::AddressExpected));
        assert_eq!(parse(Opcode::Ret, ""), Err(ErrorKind::ImmediateExpected));
    }
}
