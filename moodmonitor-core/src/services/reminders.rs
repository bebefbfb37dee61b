//! Reminder planner - picks random reminder times inside the enabled windows

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;

use crate::domain::{ClockTime, PlannedReminder, ReminderSettings, ReminderWindow};

fn random_time<R: Rng + ?Sized>(rng: &mut R, start_hour: u32, end_hour: u32) -> Option<ClockTime> {
    if start_hour >= end_hour {
        return None;
    }
    ClockTime::new(rng.gen_range(start_hour..end_hour), rng.gen_range(0..60))
}

pub struct ReminderPlanner<'a> {
    settings: &'a ReminderSettings,
}

impl<'a> ReminderPlanner<'a> {
    pub fn new(settings: &'a ReminderSettings) -> Self {
        Self { settings }
    }

    /// One reminder per enabled window, skipping `except`
    pub fn plan_day<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        except: Option<ReminderWindow>,
        rng: &mut R,
    ) -> Vec<PlannedReminder> {
        self.settings
            .enabled_windows()
            .filter(|window| Some(*window) != except)
            .filter_map(|window| {
                let (start, end) = (window.start_hour(), window.end_hour());
                random_time(rng, start, end).map(|time| PlannedReminder::new(date, time, start, end))
            })
            .collect()
    }

    /// Re-plan the rest of the day after a mood was logged.
    ///
    /// The window just answered is skipped, and so is anything that would
    /// fall at or before `now`.
    pub fn plan_after_answer<R: Rng + ?Sized>(
        &self,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Vec<PlannedReminder> {
        let answered_at = ClockTime::from_time(now.time());
        self.plan_day(now.date(), ReminderWindow::for_hour(now.hour()), rng)
            .into_iter()
            .filter(|reminder| reminder.time > answered_at)
            .collect()
    }

    /// "Ask later": a reminder during the next hour, if that hour is in an enabled window
    pub fn postpone<R: Rng + ?Sized>(&self, now: NaiveDateTime, rng: &mut R) -> Option<PlannedReminder> {
        let start = now.hour() + 1;
        let window = ReminderWindow::for_hour(start)?;
        if !self.settings.is_enabled(window) {
            return None;
        }
        let end = start + 1;
        random_time(rng, start, end).map(|time| PlannedReminder::new(now.date(), time, start, end))
    }

    /// "Mute for today": nothing more today, tomorrow planned in full
    pub fn mute_today<R: Rng + ?Sized>(&self, today: NaiveDate, rng: &mut R) -> Vec<PlannedReminder> {
        self.plan_day(today + Duration::days(1), None, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 3).unwrap()
    }

    #[test]
    fn test_plan_day_stays_inside_windows() {
        let settings = ReminderSettings::first_launch();
        let planner = ReminderPlanner::new(&settings);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let plan = planner.plan_day(date(), None, &mut rng);
            assert_eq!(plan.len(), 2);
            assert!((9..12).contains(&plan[0].time.hour()));
            assert!((16..20).contains(&plan[1].time.hour()));
            assert_eq!(plan[0].id, "2024-09-039To12");
            assert_eq!(plan[1].id, "2024-09-0316To20");
        }
    }

    #[test]
    fn test_plan_after_answer_skips_current_window() {
        let settings = ReminderSettings::first_launch();
        let planner = ReminderPlanner::new(&settings);
        let mut rng = StdRng::seed_from_u64(1);
        let now = date().and_hms_opt(10, 15, 0).unwrap();

        let plan = planner.plan_after_answer(now, &mut rng);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].start_hour, 16);
    }

    #[test]
    fn test_plan_after_answer_never_plans_in_the_past() {
        let settings = ReminderSettings {
            morning: true,
            afternoon: true,
            evening: true,
            night: true,
        };
        let planner = ReminderPlanner::new(&settings);
        let mut rng = StdRng::seed_from_u64(5);
        let now = date().and_hms_opt(12, 30, 0).unwrap();

        for _ in 0..50 {
            let plan = planner.plan_after_answer(now, &mut rng);
            // Morning is over, afternoon was just answered
            let starts: Vec<u32> = plan.iter().map(|r| r.start_hour).collect();
            assert_eq!(starts, vec![16, 20]);
            assert!(plan.iter().all(|r| r.time > ClockTime::new(12, 30).unwrap()));
        }

        let late = date().and_hms_opt(23, 10, 0).unwrap();
        assert!(planner.plan_after_answer(late, &mut rng).is_empty());
    }

    #[test]
    fn test_postpone_within_enabled_window() {
        let settings = ReminderSettings::first_launch();
        let planner = ReminderPlanner::new(&settings);
        let mut rng = StdRng::seed_from_u64(3);

        let later = planner
            .postpone(date().and_hms_opt(9, 40, 0).unwrap(), &mut rng)
            .unwrap();
        assert_eq!(later.time.hour(), 10);
        assert_eq!(later.id, "2024-09-0310To11");

        // 11 -> 12 falls in the afternoon window, which is off
        assert!(planner.postpone(date().and_hms_opt(11, 5, 0).unwrap(), &mut rng).is_none());
        // 22 -> 23 is past the last window
        assert!(planner.postpone(date().and_hms_opt(22, 5, 0).unwrap(), &mut rng).is_none());
    }

    #[test]
    fn test_mute_plans_tomorrow() {
        let settings = ReminderSettings::first_launch();
        let planner = ReminderPlanner::new(&settings);
        let mut rng = StdRng::seed_from_u64(9);

        let plan = planner.mute_today(date(), &mut rng);
        assert!(plan.iter().all(|r| r.date == date() + Duration::days(1)));
        assert_eq!(plan.len(), 2);
    }
}
