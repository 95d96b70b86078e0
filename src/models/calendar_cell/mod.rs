// Calendar cell module
// One day slot of a 6x7 month grid and the markers attached to it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two linked calendars a grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Display/interaction marker attached to a cell.
///
/// `as_str` yields the conventional class names (`today`, `in-range`, ...)
/// so a host UI can map them straight onto its own styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellClass {
    Today,
    Weekend,
    /// Greyed out: adjacent month or disabled
    Off,
    /// Adjacent-month filler at the grid ends
    Ends,
    Disabled,
    Active,
    StartDate,
    EndDate,
    InRange,
    Available,
    Custom(String),
}

impl CellClass {
    pub fn as_str(&self) -> &str {
        match self {
            CellClass::Today => "today",
            CellClass::Weekend => "weekend",
            CellClass::Off => "off",
            CellClass::Ends => "ends",
            CellClass::Disabled => "disabled",
            CellClass::Active => "active",
            CellClass::StartDate => "start-date",
            CellClass::EndDate => "end-date",
            CellClass::InRange => "in-range",
            CellClass::Available => "available",
            CellClass::Custom(name) => name,
        }
    }
}

impl fmt::Display for CellClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free list of markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellClasses(Vec<CellClass>);

impl CellClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker unless it is already present. Empty custom names are dropped.
    pub fn push(&mut self, class: CellClass) {
        if let CellClass::Custom(name) = &class {
            if name.trim().is_empty() {
                return;
            }
        }
        if !self.0.contains(&class) {
            self.0.push(class);
        }
    }

    pub fn contains(&self, class: &CellClass) -> bool {
        self.0.contains(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellClass> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CellClasses {
    /// Space-separated class names in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(class.as_str())?;
        }
        Ok(())
    }
}

/// A single grid slot.
///
/// `date` is `None` for out-of-range cells, whose date would fall outside
/// the representable calendar. Those cells are never classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub side: Side,
    pub is_off_month: bool,
    pub is_disabled: bool,
    pub classes: CellClasses,
}

impl CalendarCell {
    /// Unclassified cell for a concrete date.
    pub fn new(date: NaiveDate, side: Side, is_off_month: bool) -> Self {
        Self {
            date: Some(date),
            side,
            is_off_month,
            is_disabled: false,
            classes: CellClasses::new(),
        }
    }

    /// Placeholder for a slot whose date is not representable.
    pub fn out_of_range(side: Side) -> Self {
        Self {
            date: None,
            side,
            is_off_month: true,
            is_disabled: true,
            classes: CellClasses::new(),
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        self.date.is_none()
    }

    pub fn has_class(&self, class: &CellClass) -> bool {
        self.classes.contains(class)
    }

    /// Whether a click on this cell should reach the selection state machine.
    pub fn is_selectable(&self) -> bool {
        self.date.is_some() && !self.is_disabled
    }
}
