use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

use crate::domain::models::appointment::Appointment;
use crate::domain::models::availability_rule::AvailabilityRule;
use crate::domain::models::slot::{Slot, SlotStatus, TaggedSlot};

/// Expands a doctor's rule set into candidate slots for the closed date
/// range `[from, to]`, grouped by calendar date. Dates without slots are
/// absent from the map, so key presence answers "does this calendar cell
/// have availability".
pub fn expand_rules(
    doctor_id: &str,
    rules: &[AvailabilityRule],
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<Slot>> {
    let mut by_date = BTreeMap::new();

    let mut current = from;
    while current <= to {
        let slots = slots_for_date(doctor_id, rules, current);
        if !slots.is_empty() {
            by_date.insert(current, slots);
        }
        current += Duration::days(1);
    }

    by_date
}

/// Candidate slots for a single calendar date, sorted by start time.
///
/// A `date` rule for the date suppresses every `weekly` rule on it
/// (explicit override beats recurring default). Malformed rows are
/// skipped without aborting the query. Overlapping output from
/// conflicting rules is emitted as-is; only the ordering is guaranteed.
pub fn slots_for_date(doctor_id: &str, rules: &[AvailabilityRule], date: NaiveDate) -> Vec<Slot> {
    let has_date_rule = rules.iter().any(|r| r.kind == "date" && r.date == Some(date));

    let mut slots = Vec::new();

    for rule in rules {
        let applies = match rule.kind.as_str() {
            "date" => rule.date == Some(date),
            "weekly" => {
                !has_date_rule && rule.day_of_week as u32 == date.weekday().num_days_from_sunday()
            }
            other => {
                warn!("Skipping availability rule {} with unknown kind '{}'", rule.id, other);
                false
            }
        };
        if !applies {
            continue;
        }

        let Some(window) = rule.window() else {
            warn!(
                "Skipping malformed availability rule {} ({} - {}, {} min)",
                rule.id, rule.start_time, rule.end_time, rule.duration_min
            );
            continue;
        };

        let step = Duration::minutes(window.duration_min as i64);
        let window_end = date.and_time(window.end).and_utc();
        let mut cursor = date.and_time(window.start).and_utc();

        // Trailing partial slots are dropped, never emitted short.
        while cursor + step <= window_end {
            slots.push(Slot {
                doctor_id: doctor_id.to_string(),
                start: cursor,
                end: cursor + step,
                duration_min: window.duration_min,
            });
            cursor += step;
        }
    }

    slots.sort_by(|a, b| a.start.cmp(&b.start));
    slots
}

/// Marks each candidate slot free or booked against the doctor's
/// existing appointments, one half-open overlap being enough to book.
/// Purely a read-side projection; recomputed per query, never cached.
pub fn annotate_slots(slots: &[Slot], appointments: &[Appointment]) -> Vec<TaggedSlot> {
    slots
        .iter()
        .map(|slot| {
            let booked = appointments
                .iter()
                .any(|a| slot.interval().overlaps(&a.interval()));

            TaggedSlot {
                start: slot.start,
                end: slot.end,
                duration_min: slot.duration_min,
                status: if booked { SlotStatus::Booked } else { SlotStatus::Free },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::NewAppointmentParams;
    use crate::domain::models::availability_rule::NewRuleParams;
    use chrono::{DateTime, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(d: &str, h: u32, m: u32) -> DateTime<Utc> {
        date(d).and_hms_opt(h, m, 0).unwrap().and_utc()
    }

    fn rule(kind: &str, day_of_week: i32, d: Option<&str>, start: &str, end: &str, duration: i32) -> AvailabilityRule {
        AvailabilityRule::new(NewRuleParams {
            doctor_id: "doc-1".to_string(),
            kind: kind.to_string(),
            day_of_week,
            date: d.map(date),
            start_time: start.to_string(),
            end_time: end.to_string(),
            duration_min: duration,
        })
    }

    fn appointment(start: DateTime<Utc>, end: DateTime<Utc>) -> Appointment {
        Appointment::new(NewAppointmentParams {
            doctor_id: "doc-1".to_string(),
            start,
            end,
            patient_name: "Jane Doe".to_string(),
            patient_email: "jane@x.com".to_string(),
        })
    }

    #[test]
    fn emits_floor_of_window_over_duration_slots() {
        let rules = [rule("date", 1, Some("2024-06-10"), "09:00", "10:00", 30)];
        let slots = slots_for_date("doc-1", &rules, date("2024-06-10"));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, at("2024-06-10", 9, 0));
        assert_eq!(slots[0].end, at("2024-06-10", 9, 30));
        assert_eq!(slots[1].start, at("2024-06-10", 9, 30));
        assert_eq!(slots[1].end, at("2024-06-10", 10, 0));
    }

    #[test]
    fn drops_trailing_partial_slot() {
        // 75-minute window, 30-minute slots: two full slots, nothing past 10:00.
        let rules = [rule("date", 1, Some("2024-06-10"), "09:00", "10:15", 30)];
        let slots = slots_for_date("doc-1", &rules, date("2024-06-10"));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots.last().unwrap().end, at("2024-06-10", 10, 0));
    }

    #[test]
    fn slots_are_contiguous_and_ordered() {
        let rules = [rule("date", 1, Some("2024-06-10"), "08:00", "12:00", 60)];
        let slots = slots_for_date("doc-1", &rules, date("2024-06-10"));

        assert_eq!(slots.len(), 4);
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn date_rule_overrides_weekly_on_its_date() {
        // 2024-06-10 is a Monday (day_of_week 1).
        let rules = [
            rule("weekly", 1, None, "08:00", "12:00", 60),
            rule("date", 1, Some("2024-06-10"), "09:00", "10:00", 30),
        ];

        let overridden = slots_for_date("doc-1", &rules, date("2024-06-10"));
        assert_eq!(overridden.len(), 2);
        assert_eq!(overridden[0].start, at("2024-06-10", 9, 0));

        let next_monday = slots_for_date("doc-1", &rules, date("2024-06-17"));
        assert_eq!(next_monday.len(), 4);
        assert_eq!(next_monday[0].start, at("2024-06-17", 8, 0));
    }

    #[test]
    fn malformed_rule_is_skipped_not_fatal() {
        let rules = [
            rule("date", 1, Some("2024-06-10"), "10:00", "09:00", 30),
            rule("date", 1, Some("2024-06-10"), "9am", "10am", 30),
            rule("date", 1, Some("2024-06-10"), "14:00", "15:00", 0),
            rule("date", 1, Some("2024-06-10"), "11:00", "12:00", 30),
        ];
        let slots = slots_for_date("doc-1", &rules, date("2024-06-10"));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, at("2024-06-10", 11, 0));
    }

    #[test]
    fn dates_without_slots_are_absent_keys() {
        let rules = [rule("weekly", 1, None, "09:00", "10:00", 30)];
        let days = expand_rules("doc-1", &rules, date("2024-06-10"), date("2024-06-16"));

        assert_eq!(days.len(), 1);
        assert!(days.contains_key(&date("2024-06-10")));
        assert!(!days.contains_key(&date("2024-06-11")));
    }

    #[test]
    fn range_spanning_month_boundary() {
        let rules = [rule("weekly", 1, None, "09:00", "10:00", 60)];
        let days = expand_rules("doc-1", &rules, date("2024-06-24"), date("2024-07-08"));

        let keys: Vec<NaiveDate> = days.keys().copied().collect();
        assert_eq!(keys, vec![date("2024-06-24"), date("2024-07-01"), date("2024-07-08")]);
    }

    #[test]
    fn annotation_uses_half_open_overlap() {
        let rules = [rule("date", 1, Some("2024-06-10"), "09:00", "10:00", 30)];
        let slots = slots_for_date("doc-1", &rules, date("2024-06-10"));
        let booked = [appointment(at("2024-06-10", 9, 0), at("2024-06-10", 9, 30))];

        let tagged = annotate_slots(&slots, &booked);

        // The appointment ends exactly where the second slot begins.
        assert_eq!(tagged[0].status, SlotStatus::Booked);
        assert_eq!(tagged[1].status, SlotStatus::Free);
    }
}
