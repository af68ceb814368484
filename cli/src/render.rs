use std::io::{self, Write};

use sweeper_core::{DisplayCell, GameEngine};

pub fn glyph(cell: DisplayCell) -> char {
    match cell {
        DisplayCell::Hidden => '.',
        DisplayCell::Flagged => '*',
        DisplayCell::Mine => 'X',
        DisplayCell::Empty => '/',
        DisplayCell::Count(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
    }
}

/// Draws the board framed by 1-based row numbers and the last digit of each column number.
pub fn render_board<W: Write>(engine: &GameEngine, out: &mut W) -> io::Result<()> {
    let dimension = usize::from(engine.grid().dimension());
    let label_width = dimension.to_string().len();
    let rule = format!("{}│{}│", "—".repeat(label_width), "—".repeat(dimension));

    let header: String = (1..=dimension)
        .map(|col| char::from_digit((col % 10) as u32, 10).unwrap_or(' '))
        .collect();
    writeln!(out, "{:>label_width$}│{header}│", "")?;
    writeln!(out, "{rule}")?;

    let cells: Vec<char> = engine.display_cells().map(glyph).collect();
    for (row, line) in cells.chunks(dimension).enumerate() {
        let line: String = line.iter().collect();
        writeln!(out, "{:>label_width$}│{line}│", row + 1)?;
    }

    writeln!(out, "{rule}")
}
