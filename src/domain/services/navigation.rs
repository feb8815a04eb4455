use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::domain::models::intent::PendingBookingIntent;
use crate::domain::models::slot::{SlotStatus, TaggedSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDirection {
    Prev,
    Next,
}

/// Client-visible cursor over a doctor's calendar: the month in view,
/// the selected date and the selected slot. A pure state machine with no
/// business rules; slot data is fed in via [`CalendarNavigation::set_slots`]
/// after each availability query.
#[derive(Debug, Clone)]
pub struct CalendarNavigation {
    doctor_id: String,
    viewed_month: NaiveDate,
    selected_date: Option<NaiveDate>,
    selected_slot: Option<TaggedSlot>,
    slots: BTreeMap<NaiveDate, Vec<TaggedSlot>>,
}

impl CalendarNavigation {
    pub fn new(doctor_id: String, today: NaiveDate) -> Self {
        Self {
            doctor_id,
            viewed_month: today.with_day(1).unwrap(),
            selected_date: None,
            selected_slot: None,
            slots: BTreeMap::new(),
        }
    }

    /// First day of the month in view.
    pub fn viewed_month(&self) -> NaiveDate {
        self.viewed_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_slot(&self) -> Option<&TaggedSlot> {
        self.selected_slot.as_ref()
    }

    pub fn slots_for_selected_date(&self) -> &[TaggedSlot] {
        self.selected_date
            .and_then(|date| self.slots.get(&date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Date range covered by the month in view, for the availability query.
    pub fn month_range(&self) -> (NaiveDate, NaiveDate) {
        let first = self.viewed_month;
        let next_month = first_of_next_month(first);
        (first, next_month - Duration::days(1))
    }

    /// Installs freshly queried slots. The first date with availability
    /// is auto-selected once, when nothing is selected yet.
    pub fn set_slots(&mut self, slots: BTreeMap<NaiveDate, Vec<TaggedSlot>>) {
        self.slots = slots;
        if self.selected_date.is_none()
            && let Some((&first, _)) = self.slots.iter().next()
        {
            self.selected_date = Some(first);
        }
    }

    pub fn change_month(&mut self, dir: MonthDirection) {
        self.selected_date = None;
        self.selected_slot = None;
        self.viewed_month = match dir {
            MonthDirection::Next => first_of_next_month(self.viewed_month),
            MonthDirection::Prev => first_of_prev_month(self.viewed_month),
        };
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.selected_slot = None;
    }

    /// Selects the slot starting at `start` on the selected date.
    /// Booked slots and starts outside the selected date's slot set are
    /// rejected.
    pub fn select_slot(&mut self, start: DateTime<Utc>) -> bool {
        let Some(date) = self.selected_date else {
            return false;
        };
        let Some(day_slots) = self.slots.get(&date) else {
            return false;
        };

        match day_slots
            .iter()
            .find(|s| s.start == start && s.status == SlotStatus::Free)
        {
            Some(slot) => {
                self.selected_slot = Some(slot.clone());
                true
            }
            None => false,
        }
    }

    /// Hands the selection to the booking flow. No-op without a
    /// selected slot.
    pub fn confirm_booking(&self) -> Option<PendingBookingIntent> {
        self.selected_slot.as_ref().map(|slot| PendingBookingIntent {
            doctor_id: self.doctor_id.clone(),
            start: slot.start,
            end: slot.end,
        })
    }
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1).unwrap()
    }
}

fn first_of_prev_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 1 {
        NaiveDate::from_ymd_opt(first.year() - 1, 12, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() - 1, 1).unwrap()
    }
}
