use ratatui::layout::Rect;

use crate::models::Cd;

/// Width of the id column in the inventory table.
pub(crate) const ID_COLUMN: usize = 6;
/// Width of the title column. Longer titles are truncated so the artist
/// column stays aligned.
pub(crate) const TITLE_COLUMN: usize = 28;

/// Pad or truncate a cell so the table columns line up regardless of how long
/// a value is. Counts characters, not bytes, so multi-byte titles stay inside
/// their column.
pub(crate) fn fit_cell(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    while cell.chars().count() < width {
        cell.push(' ');
    }
    cell
}

/// The fixed header above the table rows.
pub(crate) fn header_row() -> String {
    format!(
        "{} {} Artist",
        fit_cell("ID", ID_COLUMN),
        fit_cell("CD Title", TITLE_COLUMN)
    )
}

/// One table row: fixed-width id and title, artist free to run to the edge.
pub(crate) fn inventory_row(cd: &Cd) -> String {
    format!(
        "{} {} {}",
        fit_cell(&cd.id.to_string(), ID_COLUMN),
        fit_cell(&cd.title, TITLE_COLUMN),
        cd.artist
    )
}

/// Rectangle for a modal dialog: the requested percentage of `area` in each
/// dimension, centered, with any rounding slack split between the two sides.
pub(crate) fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = scaled(area.width, percent_x);
    let height = scaled(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn scaled(length: u16, percent: u16) -> u16 {
    let percent = percent.min(100);
    (u32::from(length) * u32::from(percent) / 100) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_cell_pads_short_values_and_truncates_long_ones() {
        assert_eq!(fit_cell("ab", 4), "ab  ");
        assert_eq!(fit_cell("abcdef", 4), "abcd");
        assert_eq!(fit_cell("héllo", 4), "héll");
    }

    #[test]
    fn inventory_rows_share_the_header_columns() {
        let cd = Cd::new(7, "Abbey Road", "The Beatles");
        let row = inventory_row(&cd);
        assert!(row.starts_with(&fit_cell("7", ID_COLUMN)));
        assert!(row.ends_with("The Beatles"));
        let artist_offset = ID_COLUMN + 1 + TITLE_COLUMN + 1;
        assert_eq!(header_row().chars().count(), artist_offset + "Artist".chars().count());
        assert_eq!(row.char_indices().nth(artist_offset).map(|(_, ch)| ch), Some('T'));
    }

    #[test]
    fn popups_are_centered_inside_the_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = popup_area(area, 60, 30);
        assert_eq!((popup.width, popup.height), (60, 12));
        assert_eq!((popup.x, popup.y), (20, 14));
    }

    #[test]
    fn popups_respect_the_area_origin() {
        let area = Rect::new(10, 5, 80, 20);
        let popup = popup_area(area, 50, 50);
        assert_eq!((popup.x, popup.y), (30, 10));
        assert_eq!((popup.width, popup.height), (40, 10));
    }
}
