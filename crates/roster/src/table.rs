//! Terminal table display surface.
//!
//! [`TableSurface`] receives the sorted view from the binding and renders it
//! as an aligned text table. It also owns the current sort columns: picking a
//! column replaces the comparator the binding sorts with.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};

use clap::ValueEnum;
use roster_seeker::{Comparator, Dir, DisplaySurface, OrderBy, Property};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::person::Person;

const COLUMNS: [(&str, &str); 3] = [
    (Person::LAST_NAME, "Last name"),
    (Person::FIRST_NAME, "First name"),
    (Person::PATRONYMIC, "Patronymic"),
];

/// How the visible rows are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Table,
    /// Pretty-printed JSON array.
    Json,
}

/// Display surface that renders people as a text table.
#[derive(Debug)]
pub struct TableSurface {
    rows: RefCell<Vec<Person>>,
    renders: Cell<u64>,
    sort: RefCell<Vec<OrderBy>>,
    comparator: Property<Option<Comparator<Person>>>,
}

impl TableSurface {
    pub fn new() -> Self {
        TableSurface {
            rows: RefCell::new(Vec::new()),
            renders: Cell::new(0),
            sort: RefCell::new(Vec::new()),
            comparator: Property::new(None),
        }
    }

    /// Sorts by the given columns; an empty list restores source order.
    pub fn sort_by(&self, columns: &[OrderBy]) -> Result<()> {
        for column in columns {
            Person::check_field(&column.field)?;
        }
        *self.sort.borrow_mut() = columns.to_vec();
        let comparator = if columns.is_empty() {
            None
        } else {
            Some(Comparator::by_fields(columns))
        };
        self.comparator.set(comparator)?;
        Ok(())
    }

    /// Restores source order.
    pub fn clear_sort(&self) -> Result<()> {
        self.sort_by(&[])
    }

    /// Current sort columns.
    pub fn sort_columns(&self) -> Vec<OrderBy> {
        self.sort.borrow().clone()
    }

    /// Copy of the visible rows.
    pub fn rows(&self) -> Vec<Person> {
        self.rows.borrow().clone()
    }

    /// Visible row at 1-based position `number`.
    pub fn row(&self, number: usize) -> Option<Person> {
        number
            .checked_sub(1)
            .and_then(|index| self.rows.borrow().get(index).cloned())
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    /// How many times the binding replaced the rows.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// Writes the table, a separator, and a one-line footer.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.rows.borrow();
        let sort = self.sort.borrow();

        let mut header: Vec<String> = vec!["#".to_string()];
        for (field, title) in COLUMNS {
            let marker = match sort.first() {
                Some(primary) if primary.field == field => match primary.dir {
                    Dir::Asc => " ▲",
                    Dir::Desc => " ▼",
                },
                _ => "",
            };
            header.push(format!("{}{}", title, marker));
        }

        let body: Vec<[String; 4]> = rows
            .iter()
            .enumerate()
            .map(|(i, p)| {
                [
                    (i + 1).to_string(),
                    p.last_name.clone(),
                    p.first_name.clone(),
                    p.patronymic.clone(),
                ]
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
        for row in &body {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.width());
            }
        }

        write_line(out, &header, &widths)?;
        let total: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        writeln!(out, "{}", "-".repeat(total))?;
        for row in &body {
            write_line(out, row, &widths)?;
        }

        match rows.len() {
            0 => writeln!(out, "(no matching records)"),
            1 => writeln!(out, "1 record"),
            n => writeln!(out, "{} records", n),
        }
    }

    /// Writes the visible rows in the given format.
    pub fn write<W: Write>(&self, out: &mut W, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Table => self.render(out),
            OutputFormat::Json => self.render_json(out),
        }
    }

    /// Writes the visible rows as a JSON array.
    pub fn render_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, &*self.rows.borrow())?;
        writeln!(out)
    }
}

fn write_line<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let cell = cell.as_ref();
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    writeln!(out, "{}", line.trim_end())
}

impl Default for TableSurface {
    fn default() -> Self {
        TableSurface::new()
    }
}

impl DisplaySurface<Person> for TableSurface {
    fn set_visible(&self, items: Vec<Person>) {
        *self.rows.borrow_mut() = items;
        self.renders.set(self.renders.get() + 1);
    }

    fn comparator(&self) -> Property<Option<Comparator<Person>>> {
        self.comparator.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(table: &TableSurface) -> String {
        let mut out = Vec::new();
        table.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_aligned_columns() {
        let table = TableSurface::new();
        table.set_visible(vec![
            Person::new("Anna", "Smith", "Ivanovna"),
            Person::new("Ben", "Anders", ""),
        ]);
        let text = rendered(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#  Last name  First name  Patronymic");
        assert_eq!(lines[1], "-".repeat(36));
        assert_eq!(lines[2], "1  Smith      Anna        Ivanovna");
        assert_eq!(lines[3], "2  Anders     Ben");
        assert_eq!(lines[4], "2 records");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn wide_characters_align_by_display_width() {
        let table = TableSurface::new();
        table.set_visible(vec![Person::new("李", "王", "")]);
        let text = rendered(&table);
        let row = text.lines().nth(2).unwrap();
        // "王" is two columns wide
        assert_eq!(row, format!("1  王{}李", " ".repeat(9)));
    }

    #[test]
    fn empty_table_says_so() {
        let table = TableSurface::new();
        table.set_visible(Vec::new());
        assert!(rendered(&table).ends_with("(no matching records)\n"));
    }

    #[test]
    fn header_marks_primary_sort_column() {
        let table = TableSurface::new();
        table.sort_by(&[OrderBy::desc("first_name")]).unwrap();
        let text = rendered(&table);
        assert!(text.starts_with("#  Last name  First name ▼  Patronymic"));
        assert_eq!(table.sort_columns(), vec![OrderBy::desc("first_name")]);
    }

    #[test]
    fn sort_by_sets_and_clears_comparator() {
        let table = TableSurface::new();
        let comparator = table.comparator();
        table.sort_by(&[OrderBy::asc("last_name")]).unwrap();
        assert!(comparator.get().is_some());
        table.clear_sort().unwrap();
        assert!(comparator.get().is_none());
        assert!(table.sort_columns().is_empty());
    }

    #[test]
    fn sort_by_unknown_column_is_rejected() {
        let table = TableSurface::new();
        assert!(table.sort_by(&[OrderBy::asc("age")]).is_err());
        assert!(table.comparator().get().is_none());
    }

    #[test]
    fn row_lookup_is_one_based() {
        let table = TableSurface::new();
        table.set_visible(vec![Person::new("Anna", "Smith", "")]);
        assert_eq!(table.row(1), Some(Person::new("Anna", "Smith", "")));
        assert_eq!(table.row(0), None);
        assert_eq!(table.row(2), None);
    }

    #[test]
    fn json_output() {
        let table = TableSurface::new();
        table.set_visible(vec![Person::new("Anna", "Smith", "")]);
        let mut out = Vec::new();
        table.render_json(&mut out).unwrap();
        let parsed: Vec<Person> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, table.rows());
    }
}
