//! Turns a [`UserManagerState`] into a screen.
//!
//! [`ViewModel::from_state`] decides *what* is shown; [`ViewModel::draw`]
//! lays it out with ratatui widgets into an off-screen [`Buffer`], which
//! [`render`] flattens to text for a line-oriented terminal.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Row, Table, Widget},
};

use crate::domain::{FormField, UserId};
use crate::manager::UserManagerState;

pub const TITLE: &str = "User Management";
const HEADERS: [&str; 6] = ["ID", "First Name", "Last Name", "Email", "Department", "Actions"];
const ROW_ACTIONS: &str = "[Edit] [Delete]";
const COLUMN_SPACING: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub field: FormField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub inputs: Vec<InputView>,
    pub submit_label: &'static str,
    pub show_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub banner: Option<String>,
    pub form: FormView,
    pub rows: Vec<RowView>,
}

impl ViewModel {
    pub fn from_state(state: &UserManagerState) -> Self {
        let banner = (!state.error.is_empty()).then(|| state.error.clone());

        let inputs = FormField::ALL
            .into_iter()
            .map(|field| InputView {
                field,
                value: state.form.get(field).to_string(),
            })
            .collect();
        let form = FormView {
            inputs,
            submit_label: if state.is_editing() { "Update User" } else { "Add User" },
            show_cancel: state.is_editing(),
        };

        let rows = state
            .users
            .iter()
            .map(|user| RowView {
                id: user.id,
                first_name: user.display_first_name().to_string(),
                last_name: user.display_last_name().to_string(),
                email: user.email.clone(),
                department: user.display_department().to_string(),
            })
            .collect();

        Self { banner, form, rows }
    }
}

impl ViewModel {
    /// Lays out title, banner, form and table top to bottom. The buffer is
    /// exactly as wide as the widest part.
    pub fn draw(&self) -> Buffer {
        let top = self.top_text();
        let form = self.form_text();
        let cells = self.cells();
        let widths = column_widths(&cells);

        let table_width = widths.iter().sum::<u16>() + COLUMN_SPACING * (widths.len() as u16 - 1);
        // header, its bottom margin, then one line per user
        let table_height = 2 + cells.len() as u16;
        let width = table_width.max(top.width() as u16).max(form.width() as u16);
        let top_height = top.height() as u16;
        let form_height = form.height() as u16;
        let area = Rect::new(0, 0, width, top_height + form_height + table_height);

        let mut buffer = Buffer::empty(area);
        let [top_area, form_area, table_area] = Layout::vertical([
            Constraint::Length(top_height),
            Constraint::Length(form_height),
            Constraint::Length(table_height),
        ])
        .areas(area);

        Paragraph::new(top).render(top_area, &mut buffer);
        Paragraph::new(form).render(form_area, &mut buffer);
        users_table(cells, &widths).render(table_area, &mut buffer);
        buffer
    }

    fn top_text(&self) -> Text<'static> {
        let mut lines = vec![
            Line::from(TITLE).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from("=".repeat(TITLE.len())),
        ];
        if let Some(banner) = &self.banner {
            lines.push(Line::from(Span::styled(
                format!("! {}", banner),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::default());
        Text::from(lines)
    }

    fn form_text(&self) -> Text<'static> {
        let label_width = FormField::ALL
            .iter()
            .map(|field| field.placeholder().len())
            .max()
            .unwrap_or(0);

        let mut lines: Vec<Line> = self
            .form
            .inputs
            .iter()
            .map(|input| {
                let label = Span::raw(format!("{:>width$}: ", input.field.placeholder(), width = label_width));
                let value = if input.value.is_empty() {
                    Span::styled(
                        format!("<{}>", input.field.placeholder()),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    Span::raw(input.value.clone())
                };
                Line::from(vec![label, value])
            })
            .collect();

        let mut buttons = vec![Span::styled(
            format!("[{}]", self.form.submit_label),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.form.show_cancel {
            buttons.push(Span::raw(" [Cancel]"));
        }
        lines.push(Line::from(buttons));
        lines.push(Line::default());
        Text::from(lines)
    }

    fn cells(&self) -> Vec<[String; 6]> {
        self.rows
            .iter()
            .map(|row| {
                [
                    row.id.to_string(),
                    row.first_name.clone(),
                    row.last_name.clone(),
                    row.email.clone(),
                    row.department.clone(),
                    ROW_ACTIONS.to_string(),
                ]
            })
            .collect()
    }
}

/// Widest of header and cells, per column.
fn column_widths(cells: &[[String; 6]]) -> [u16; 6] {
    let mut widths = HEADERS.map(|header| Line::from(header).width() as u16);
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(Line::from(cell.as_str()).width() as u16);
        }
    }
    widths
}

fn users_table(cells: Vec<[String; 6]>, widths: &[u16; 6]) -> Table<'static> {
    let header = Row::new(HEADERS)
        .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows: Vec<Row> = cells.into_iter().map(|row| Row::new(row).height(1)).collect();
    Table::new(rows, widths.map(Constraint::Length))
        .header(header)
        .column_spacing(COLUMN_SPACING)
}

/// Renders the whole screen for `state` as plain text, one line per buffer
/// row with trailing blanks removed.
pub fn render(state: &UserManagerState) -> String {
    buffer_text(&ViewModel::from_state(state).draw())
}

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}
