//! Interactive prompting for monitor options missing from the command line.
use std::io::{BufRead, Write};

use zwallet_common::{Result, WalletError};

/// Returns `value` if set, otherwise asks for it with [`prompt_f64`].
pub fn value_or_prompt<R: BufRead, W: Write>(
    value: Option<f64>,
    label: &str,
    input: &mut R,
    output: &mut W,
) -> Result<f64> {
    match value {
        Some(value) => Ok(value),
        None => prompt_f64(label, input, output),
    }
}

/// Prompts for a finite number until one is entered.
///
/// Fails if `input` ends before a valid value is read.
pub fn prompt_f64<R: BufRead, W: Write>(label: &str, input: &mut R, output: &mut W) -> Result<f64> {
    loop {
        write!(output, "{}: ", label)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(WalletError::Prompt(format!("no value entered for {}", label)));
        }

        let answer = line.trim();
        match answer.parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => writeln!(output, "Error: {:?} is not a valid number.", answer)?,
        }
    }
}
