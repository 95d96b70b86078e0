// Date Range Picker
// Demo entry point: prints both calendars as text
//
// Usage: daterange-picker [config-name] [range-text]

use anyhow::Result;
use chrono::Datelike;

use daterange_picker::models::calendar_cell::{CalendarCell, CellClass, Side};
use daterange_picker::models::settings::PickerOptions;
use daterange_picker::services::grid::MonthGrid;
use daterange_picker::services::picker::DateRangePicker;
use daterange_picker::services::settings::{default_config_path, load_registry, ConfigRegistry};

const CELL_WIDTH: usize = 4;

fn render_cell(cell: &CalendarCell) -> String {
    let Some(date) = cell.date else {
        return " ".repeat(CELL_WIDTH);
    };
    if cell.is_off_month {
        return "  . ".to_string();
    }
    if cell.is_disabled {
        return " -- ".to_string();
    }
    let (open, close) = if cell.has_class(&CellClass::Active) {
        ('[', ']')
    } else if cell.has_class(&CellClass::InRange) {
        ('(', ')')
    } else if cell.has_class(&CellClass::Today) {
        (' ', '*')
    } else {
        (' ', ' ')
    };
    format!("{}{:>2}{}", open, date.day(), close)
}

fn render_row(grid: &MonthGrid, row: usize, week_number: Option<u32>) -> String {
    let mut line = match week_number {
        Some(week) => format!("{:>3} ", week),
        None => String::new(),
    };
    for column in 0..7 {
        if let Some(cell) = grid.cell(row, column) {
            line.push_str(&render_cell(cell));
        }
    }
    line
}

fn print_calendars(picker: &DateRangePicker) {
    let config = picker.config();
    let left = picker.calendar(Side::Left);
    let right = picker.calendar(Side::Right);
    let weeks = |grid: &MonthGrid| {
        if config.show_iso_week_numbers {
            grid.iso_week_numbers()
        } else if config.show_week_numbers {
            grid.week_numbers()
        } else {
            vec![None; 6]
        }
    };
    let (left_weeks, right_weeks) = (weeks(&left), weeks(&right));
    let gutter = if config.show_week_numbers || config.show_iso_week_numbers {
        "    "
    } else {
        ""
    };
    let width = CELL_WIDTH * 7;

    println!(
        "{gutter}{:^width$}   {gutter}{:^width$}",
        picker.month_label(Side::Left),
        picker.month_label(Side::Right),
    );
    let header: String = picker
        .weekday_header()
        .iter()
        .map(|name| format!(" {:>2} ", name))
        .collect();
    println!("{gutter}{header}   {gutter}{header}");
    for row in 0..6 {
        println!(
            "{}   {}",
            render_row(&left, row, left_weeks.get(row).copied().flatten()),
            render_row(&right, row, right_weeks.get(row).copied().flatten()),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting date range picker demo");

    let mut args = std::env::args().skip(1);
    let config_name = args.next();
    let range_text = args.next();

    let path = default_config_path();
    let registry = match load_registry(&path) {
        Ok(registry) => registry,
        Err(e) => {
            log::warn!("Failed to load picker config: {e:?}, using defaults");
            ConfigRegistry::default()
        }
    };
    let config = registry.resolve(config_name.as_deref(), PickerOptions::new())?;

    let mut picker = DateRangePicker::new(config);
    if let Some(text) = range_text {
        if !picker.on_text_input(&text) {
            eprintln!("Could not read '{}' as a date range", text);
        }
    }
    picker.refresh_hooks().await;

    print_calendars(&picker);
    println!();
    match picker.committed() {
        Some(range) => println!(
            "Selected: {} ({} days)",
            picker.formatted_range(),
            range.day_count()
        ),
        None => println!("No range selected"),
    }

    Ok(())
}
