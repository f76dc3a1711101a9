//! Interactive item picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `sts plot` and choose an item" UX
//!
//! Items come from the sales table's `id` column. Typing text that is not a
//! number narrows the list to identifiers containing it.

use std::io::{self, BufRead, Write};

use polars::prelude::DataFrame;

use crate::domain::frame::text_values;
use crate::domain::schema;
use crate::error::{AppError, TableResult};

/// At most this many candidates are listed at once.
const MAX_LISTED: usize = 20;

/// All item identifiers of a sales table, in row order.
pub fn item_ids(sales: &DataFrame) -> TableResult<Vec<String>> {
    Ok(text_values(sales, schema::ITEM_ID)?.into_iter().flatten().collect())
}

/// Prompt on stdin/stdout for one of `items`.
pub fn prompt_for_item(items: &[String]) -> Result<String, AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    choose_item(items, stdin.lock(), stdout.lock())
}

/// Prompt loop over arbitrary input/output streams.
///
/// Behavior:
/// - list (up to [`MAX_LISTED`]) candidates
/// - accept a number from the list, an exact identifier, or a filter substring
/// - `q` cancels
pub fn choose_item<R: BufRead, W: Write>(
    items: &[String],
    mut input: R,
    mut output: W,
) -> Result<String, AppError> {
    if items.is_empty() {
        return Err(AppError::new(3, "The sales table has no items."));
    }
    let io_err = |e: io::Error| AppError::new(2, format!("Failed to talk to terminal: {e}"));

    let mut candidates: Vec<&String> = items.iter().collect();
    loop {
        writeln!(output, "{} item(s):", candidates.len()).map_err(io_err)?;
        for (idx, item) in candidates.iter().take(MAX_LISTED).enumerate() {
            writeln!(output, "{:>3}) {item}", idx + 1).map_err(io_err)?;
        }
        if candidates.len() > MAX_LISTED {
            let more = candidates.len() - MAX_LISTED;
            writeln!(output, "  ... {more} more (type text to filter)").map_err(io_err)?;
        }
        write!(output, "Select an item by number, type an id or filter (q to quit): ")
            .map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line).map_err(io_err)?;
        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide an item with `--item <id>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            let listed = candidates.len().min(MAX_LISTED);
            if (1..=listed).contains(&choice) {
                return Ok(candidates[choice - 1].clone());
            }
            writeln!(
                output,
                "Invalid choice: {choice}. Enter a number between 1 and {listed}."
            )
            .map_err(io_err)?;
            continue;
        }

        if let Some(exact) = items.iter().find(|item| item.as_str() == line) {
            return Ok(exact.clone());
        }

        let narrowed: Vec<&String> = items.iter().filter(|item| item.contains(line)).collect();
        if narrowed.is_empty() {
            writeln!(output, "No item matches '{line}'.").map_err(io_err)?;
            continue;
        }
        if let [only] = narrowed.as_slice() {
            return Ok((*only).clone());
        }
        candidates = narrowed;
    }
}
