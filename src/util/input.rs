use crate::display;
use crate::prelude::*;
use anyhow::{anyhow, ensure};
use std::fmt::Display;
use std::str::FromStr;

/// Prints the prompt and reads one trimmed line from stdin.
///
/// Tokio recommends spawning a blocking thread for user input
/// <https://docs.rs/tokio/latest/tokio/io/struct.Stdin.html>.
/// EOF is an error so that validation loops terminate in non-interactive runs.
pub(crate) async fn read_line(message: &str) -> Result<String> {
    info!("{message}");

    let line = tokio::task::spawn_blocking(move || {
        std::io::stdin()
            .lines()
            .next()
            .transpose()
            .context("Failed to read input from `stdin`")?
            .context("Reached end-of-file (EOF) while reading input from `stdin`")
    })
    .await
    .expect("Failed to spawn blocking task for user input")?;

    Ok(line.trim().to_owned())
}

pub(crate) async fn confirm(message: &str, auto_confirm: bool) -> Result<bool> {
    if auto_confirm {
        return Ok(true);
    }

    let line = read_line(&format!("{message} Only `yes` will be accepted to confirm")).await?;

    Ok(line == "yes")
}

/// One attempt at parsing an ascending interval of two whitespace-separated
/// numbers, both within `[min, max]`.
pub(crate) fn parse_interval<T>(line: &str, min: T, max: T) -> Result<(T, T)>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let parts = line.split_whitespace().collect_vec();

    let [begin, end] = parts[..] else {
        bail!("Please enter an interval of two values in ascending order, between {min} and {max}");
    };

    let parse = |raw: &str| {
        raw.parse::<T>()
            .map_err(|_| anyhow!("Please enter valid numbers between {min} and {max}"))
    };

    let (begin, end) = (parse(begin)?, parse(end)?);

    ensure!(
        begin >= min && begin <= max && end >= min && end <= max,
        "Please enter valid numbers between {min} and {max}"
    );
    ensure!(
        begin <= end,
        "Please enter an interval in ascending order, between {min} and {max}"
    );

    Ok((begin, end))
}

pub(crate) async fn prompt_interval<T>(message: &str, min: T, max: T) -> Result<(T, T)>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let message = format!("[{min},{max}] {message}");

    loop {
        let line = read_line(&message).await?;

        match parse_interval(&line, min, max) {
            Ok(interval) => return Ok(interval),
            Err(err) => warn!("{err}"),
        }
    }
}

/// One attempt at matching the input against the option values. Empty input
/// falls back to the default when one is configured.
pub(crate) fn parse_choice<'a>(
    line: &str,
    options: &[(&'a str, &str)],
    default: Option<&'a str>,
) -> Result<&'a str> {
    if line.is_empty() {
        if let Some(default) = default {
            return Ok(default);
        }
    }

    options
        .iter()
        .map(|(value, _)| *value)
        .find(|value| *value == line)
        .context("Please choose one of the available options")
}

/// Renders the option table and loops until the input matches an option
/// value. Fewer than two options is a programming error on the caller's side
/// and fails before anything is read.
pub(crate) async fn prompt_choice<'a>(
    message: &str,
    description: Option<&str>,
    options: &[(&'a str, &str)],
    default: Option<&'a str>,
) -> Result<&'a str> {
    ensure!(
        options.len() >= 2,
        "BUG: a choice needs at least two options, got {}",
        options.len()
    );

    let rows = options
        .iter()
        .map(|(value, label)| vec![value.to_string(), label.to_string()])
        .collect_vec();

    info!("\n{}", display::table(&["Value", "Description"], &rows));

    if let Some(description) = description {
        info!("{description}");
    }

    let message = match default {
        Some(default) => format!("[default={default}] {message}"),
        None => message.to_owned(),
    };

    loop {
        let line = read_line(&message).await?;

        match parse_choice(&line, options, default) {
            Ok(value) => return Ok(value),
            Err(err) => warn!("{err}"),
        }
    }
}

/// Overridable messages for the three ways a bounded input can be rejected.
#[derive(Default)]
pub(crate) struct BoundsErrors {
    pub(crate) not_a_number: Option<String>,
    pub(crate) below_min: Option<String>,
    pub(crate) above_max: Option<String>,
}

/// One attempt at parsing a single number within `[min, max]` (inclusive).
/// Empty input falls back to the default when one is configured.
pub(crate) fn parse_bounded<T>(
    line: &str,
    min: T,
    max: T,
    default: Option<T>,
    errors: &BoundsErrors,
) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    if line.is_empty() {
        if let Some(default) = default {
            return Ok(default);
        }
    }

    let value = line
        .parse::<T>()
        .map_err(|_| message_or(&errors.not_a_number, || "Please enter a number".to_owned()))?;

    if value < min {
        return Err(message_or(&errors.below_min, || {
            format!("Please enter a number greater than or equal to {min}")
        }));
    }

    if value > max {
        return Err(message_or(&errors.above_max, || {
            format!("The maximum value is {max}, please enter a valid number")
        }));
    }

    Ok(value)
}

pub(crate) async fn prompt_bounded<T>(
    message: &str,
    min: T,
    max: T,
    default: Option<T>,
    errors: &BoundsErrors,
) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let message = match default {
        Some(default) => format!("[default={default}] [{min},{max}] {message}"),
        None => format!("[{min},{max}] {message}"),
    };

    loop {
        let line = read_line(&message).await?;

        match parse_bounded(&line, min, max, default, errors) {
            Ok(value) => return Ok(value),
            Err(err) => warn!("{err}"),
        }
    }
}

/// Free-form input with a default for the empty line.
pub(crate) async fn prompt_text(message: &str, default: &str) -> Result<String> {
    let message = match default.is_empty() {
        true => message.to_owned(),
        false => format!("[default={default}] {message}"),
    };

    let line = read_line(&message).await?;

    Ok(match line.is_empty() {
        true => default.to_owned(),
        false => line,
    })
}

fn message_or(custom: &Option<String>, fallback: impl FnOnce() -> String) -> anyhow::Error {
    match custom {
        Some(custom) => anyhow!("{custom}"),
        None => anyhow!("{}", fallback()),
    }
}
