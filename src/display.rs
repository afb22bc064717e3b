use itertools::Itertools;
use std::fmt;

pub(crate) fn bold(value: &impl fmt::Display) -> String {
    nu_ansi_term::Style::new()
        .bold()
        .paint(value.to_string())
        .to_string()
}

pub(crate) fn human_size(bytes: impl humansize::ToF64 + humansize::Unsigned) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

pub(crate) fn bold_human_size(bytes: impl humansize::ToF64 + humansize::Unsigned) -> String {
    bold(&human_size(bytes))
}

pub(crate) fn elapsed(start: std::time::Instant) -> String {
    bold(&format!("{:.2?}", start.elapsed()))
}

pub(crate) fn yes_no(flag: bool) -> String {
    match flag {
        true => "yes".to_owned(),
        false => "no".to_owned(),
    }
}

/// Plain-text column-aligned table. Cells must be free of ANSI escapes,
/// otherwise the width bookkeeping is off; styling is applied per line here.
pub(crate) fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = header.iter().map(|cell| cell.len()).collect_vec();

    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render_row = |row: &[String]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let header = render_row(&header.iter().map(ToString::to_string).collect_vec());
    let divider = widths.iter().map(|width| "-".repeat(*width)).join("  ");

    std::iter::once(bold(&header))
        .chain([divider])
        .chain(rows.iter().map(|row| render_row(row)))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn table_alignment() {
        // Strip the header styling to keep the snapshot readable
        let rendered = table(
            &["Filepath", "Uploaded"],
            &[
                vec!["clips/a.mp4".to_owned(), "no".to_owned()],
                vec!["b.mp4".to_owned(), "yes".to_owned()],
            ],
        )
        .replace("\u{1b}[1m", "")
        .replace("\u{1b}[0m", "");

        expect![[r#"
            Filepath     Uploaded
            -----------  --------
            clips/a.mp4  no
            b.mp4        yes"#]]
        .assert_eq(&rendered);
    }
}
