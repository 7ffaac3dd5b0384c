use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{Aig, AigEdge, Result, aig::error::ParserError};

fn read_u64(s: &str) -> std::result::Result<u64, ParserError> {
    s.parse::<u64>()
        .map_err(|_| ParserError::InvalidToken(s.to_string() + " expected u64"))
}

fn check_even(x: u64) -> Result<()> {
    if x & 1 == 1 {
        return Err(ParserError::InvalidToken(
            "expected literal to be even, got ".to_string() + &x.to_string(),
        )
        .into());
    }
    Ok(())
}

/// Reads one line, failing on end of file.
fn read_line(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(ParserError::from)?;
    if read == 0 {
        return Err(ParserError::InvalidToken("unexpected end of file".to_string()).into());
    }
    Ok(line)
}

/// Reads a line holding exactly one literal.
fn read_literal(line: &str, what: &str) -> Result<u64> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.is_empty() {
        return Err(ParserError::InvalidToken(format!("expected {} token, got nothing", what)).into());
    }

    if tokens.len() > 1 {
        return Err(ParserError::InvalidToken(format!(
            "expected nothing after {}, got {}",
            what, tokens[1]
        ))
        .into());
    }

    Ok(read_u64(tokens[0])?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u64,
    i: u64,
    l: u64,
    o: u64,
    a: u64,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken(
                "missing header tokens".to_string(),
            ));
        }

        if tokens[0] != "aag" && tokens[0] != "aig" {
            return Err(ParserError::InvalidToken(
                "expected aag (or at least aig)".to_string(),
            ));
        }

        let m = read_u64(tokens[1])?;
        let i = read_u64(tokens[2])?;
        let l = read_u64(tokens[3])?;
        let o = read_u64(tokens[4])?;
        let a = read_u64(tokens[5])?;

        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }

        if l > 0 {
            return Err(ParserError::UnsupportedFeature(
                "latches (only combinational AIGs are supported)".to_string(),
            ));
        }

        if i.checked_add(a).is_none_or(|needed| m < needed) {
            return Err(ParserError::InvalidToken(format!(
                "maximum variable index {} is too small for {} inputs and {} and gates",
                m, i, a
            )));
        }

        // Every literal, and the first literal after the last variable, must fit
        if m.checked_add(1).and_then(|v| v.checked_mul(2)).is_none() {
            return Err(ParserError::InvalidToken(format!(
                "maximum variable index {} is too large",
                m
            )));
        }

        Ok(Header { m, i, l, o, a })
    }
}

/// Maps AIGER variables to the signals built so far.
///
/// Only defined variables are stored, the header alone never decides how much is allocated.
struct Literals {
    max_var: u64,
    vars: HashMap<u64, AigEdge>,
}

impl Literals {
    fn new(header: Header) -> Self {
        Literals {
            max_var: header.m,
            vars: HashMap::from([(0, AigEdge::constant(false))]),
        }
    }

    fn define(&mut self, var: u64, edge: AigEdge) -> Result<()> {
        if var > self.max_var {
            return Err(ParserError::InvalidToken(format!(
                "variable {} exceeds the maximum variable index",
                var
            ))
            .into());
        }
        if self.vars.insert(var, edge).is_some() {
            return Err(
                ParserError::InvalidToken(format!("variable {} is defined twice", var)).into(),
            );
        }
        Ok(())
    }

    fn get(&self, literal: u64) -> Option<AigEdge> {
        let edge = *self.vars.get(&(literal >> 1))?;
        Some(if literal & 1 == 1 { !edge } else { edge })
    }

    fn resolve(&self, literal: u64) -> Result<AigEdge> {
        self.get(literal).ok_or_else(|| {
            ParserError::InvalidToken(format!("literal {} is not defined", literal)).into()
        })
    }
}

/// Parser for the ASCII AIGER format.
mod ascii {
    use std::io::BufRead;

    use log::debug;

    use crate::{
        Aig, Network, Result,
        aig::error::ParserError,
        aig::parser::{Header, Literals, check_even, read_line, read_literal, read_u64},
    };

    pub(super) fn read_input(line: &str) -> Result<u64> {
        let i = read_literal(line, "input")?;
        check_even(i)?;
        Ok(i >> 1)
    }

    pub(super) fn read_output(line: &str) -> Result<u64> {
        read_literal(line, "output")
    }

    /// Returns the and gate variable and its two fanin literals.
    pub(super) fn read_and(line: &str) -> Result<(u64, u64, u64)> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 3 {
            return Err(ParserError::InvalidToken("not enough and tokens".to_string()).into());
        }

        if tokens.len() > 3 {
            return Err(ParserError::InvalidToken(
                "expected nothing after and tokens, got ".to_string() + tokens[3],
            )
            .into());
        }

        let lhs = read_u64(tokens[0])?;
        let rhs0 = read_u64(tokens[1])?;
        let rhs1 = read_u64(tokens[2])?;

        check_even(lhs)?;
        if lhs == 0 {
            return Err(ParserError::InvalidToken("and gate cannot be the constant".to_string()).into());
        }
        Ok((lhs >> 1, rhs0, rhs1))
    }

    impl Aig {
        /// Creates an AIG from a reader on an ASCII AIGER (.aag) file.
        ///
        /// And gates may be listed in any order. They are structurally hashed while building,
        /// so the result may hold fewer gates than the file.
        pub fn from_ascii(mut reader: impl BufRead) -> Result<Self> {
            let header = Header::try_from(read_line(&mut reader)?.as_str())?;
            let mut aig = Aig::new();
            let mut literals = Literals::new(header);

            for _ in 0..header.i {
                let var = read_input(&read_line(&mut reader)?)?;
                if var == 0 {
                    return Err(ParserError::InvalidToken("input cannot be the constant".to_string()).into());
                }
                let input = aig.add_input();
                literals.define(var, input)?;
            }

            let mut outputs = Vec::new();
            for _ in 0..header.o {
                outputs.push(read_output(&read_line(&mut reader)?)?);
            }

            let mut ands = Vec::new();
            for _ in 0..header.a {
                ands.push(read_and(&read_line(&mut reader)?)?);
            }
            // Whatever comes next (symbols, comments) is ignored

            // Gates are only built once both fanins are, until no progress is made
            while !ands.is_empty() {
                let before = ands.len();
                let mut pending = Vec::new();
                for (lhs, rhs0, rhs1) in ands {
                    match (literals.get(rhs0), literals.get(rhs1)) {
                        (Some(fanin0), Some(fanin1)) => {
                            let gate = aig.create_and(fanin0, fanin1);
                            literals.define(lhs, gate)?;
                        }
                        _ => pending.push((lhs, rhs0, rhs1)),
                    }
                }
                if pending.len() == before {
                    return Err(ParserError::InvalidToken(format!(
                        "and gate {} depends on undefined literals (or on itself)",
                        pending[0].0 << 1
                    ))
                    .into());
                }
                ands = pending;
            }

            for literal in outputs {
                aig.add_output(literals.resolve(literal)?)?;
            }

            debug!(
                "parsed ascii aiger: {} inputs, {} outputs, {} gates",
                aig.num_inputs(),
                aig.num_outputs(),
                aig.num_gates()
            );
            aig.check_integrity()?;
            Ok(aig)
        }
    }

}

/// Parser for the bin AIGER format.
mod bin {
    use std::io::BufRead;

    use log::debug;

    use crate::{
        Aig, Network, Result,
        aig::error::ParserError,
        aig::parser::{Header, Literals, read_line, read_literal},
    };

    fn getnoneofch(buf: &[u8], offset: &mut usize) -> Result<u8> {
        if *offset >= buf.len() {
            return Err(ParserError::InvalidToken("unexpected end of file".to_string()).into());
        }

        let byte = buf[*offset];
        *offset += 1;
        Ok(byte)
    }

    pub(super) fn decode_delta(buf: &[u8], offset: &mut usize) -> Result<u64> {
        let mut x = 0;
        let mut i = 0;

        loop {
            let ch = getnoneofch(buf, offset)?;
            if i >= 10 {
                return Err(ParserError::InvalidToken("delta does not fit on 64 bits".to_string()).into());
            }
            x |= ((ch & 0x7f) as u64) << (7 * i);
            i += 1;

            if ch & 0x80 == 0 {
                break;
            }
        }
        Ok(x)
    }

    impl Aig {
        /// Creates an AIG from a reader on a binary AIGER (.aig) file.
        pub fn from_bin(mut reader: impl BufRead) -> Result<Self> {
            let header = Header::try_from(read_line(&mut reader)?.as_str())?;
            let mut aig = Aig::new();
            let mut literals = Literals::new(header);

            // Inputs are implicit: variables 1 to I
            for var in 1..=header.i {
                let input = aig.add_input();
                literals.define(var, input)?;
            }

            let mut outputs = Vec::new();
            for _ in 0..header.o {
                outputs.push(read_literal(&read_line(&mut reader)?, "output")?);
            }

            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map_err(ParserError::from)?;

            let mut offset = 0;
            let mut lhs = header
                .i
                .checked_add(header.l + 1)
                .and_then(|first| first.checked_mul(2))
                .ok_or_else(|| ParserError::InvalidToken("too many inputs".to_string()))?;

            for _ in 0..header.a {
                let delta0 = decode_delta(&buf, &mut offset)?;
                let delta1 = decode_delta(&buf, &mut offset)?;

                let (Some(rhs0), Some(rhs1)) = (
                    lhs.checked_sub(delta0),
                    lhs.checked_sub(delta0)
                        .and_then(|rhs0| rhs0.checked_sub(delta1)),
                ) else {
                    return Err(ParserError::InvalidToken(format!(
                        "invalid deltas for and gate {}",
                        lhs
                    ))
                    .into());
                };
                if rhs0 >= lhs {
                    return Err(ParserError::InvalidToken(format!(
                        "and gate {} cannot use itself",
                        lhs
                    ))
                    .into());
                }

                let gate = aig.create_and(literals.resolve(rhs0)?, literals.resolve(rhs1)?);
                literals.define(lhs >> 1, gate)?;

                lhs += 2;
            }

            for literal in outputs {
                aig.add_output(literals.resolve(literal)?)?;
            }

            debug!(
                "parsed binary aiger: {} inputs, {} outputs, {} gates",
                aig.num_inputs(),
                aig.num_outputs(),
                aig.num_gates()
            );
            aig.check_integrity()?;
            Ok(aig)
        }
    }

}

impl Aig {
    /// Creates an AIG from an .aig (resp .aag) file using bin (resp. ASCII) AIGER format.
    ///
    /// Only combinational AIGs are supported: files with latches are rejected.
    /// Symbol tables and comments are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(ParserError::from)?;
        let reader = BufReader::new(f);
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("aag") => Aig::from_ascii(reader),
            Some("aig") => Aig::from_bin(reader),
            _ => Err(
                ParserError::IoError("invalid extension, expected .aag or .aig".to_string()).into(),
            ),
        }
    }
}
