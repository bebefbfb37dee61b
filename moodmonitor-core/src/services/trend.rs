//! Trend calculator - today against yesterday for bedtime, time in bed and steps

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};

use crate::domain::{ClockTime, DailyRecordStore, Reading, Trend, TrendReport};

/// Compare today's and yesterday's bedtime.
///
/// `Increase` means an earlier bedtime. A bedtime after noon is the evening
/// before a bedtime before noon, so when the two fall in different halves of
/// the day the plain clock comparison is inverted.
pub fn bedtime_trend(today: Reading<ClockTime>, yesterday: Reading<ClockTime>) -> Trend {
    let (Some(today), Some(yesterday)) = (today.value(), yesterday.value()) else {
        return Trend::Undetermined;
    };

    let noon = ClockTime::NOON;
    if today > noon && yesterday < noon {
        return Trend::Increase;
    }
    if today < noon && yesterday > noon {
        return Trend::Decrease;
    }

    match today.cmp(&yesterday) {
        Ordering::Less => Trend::Increase,
        Ordering::Greater => Trend::Decrease,
        Ordering::Equal => Trend::Same,
    }
}

/// Plain comparison where a bigger value is an increase
pub fn value_trend<T: Ord>(today: Reading<T>, yesterday: Reading<T>) -> Trend {
    match (today, yesterday) {
        (Reading::Known(t), Reading::Known(y)) => match t.cmp(&y) {
            Ordering::Greater => Trend::Increase,
            Ordering::Less => Trend::Decrease,
            Ordering::Equal => Trend::Same,
        },
        _ => Trend::Undetermined,
    }
}

/// Trends for `today` against the day before; missing records are undetermined
pub fn calculate(store: &DailyRecordStore, today: NaiveDate) -> TrendReport {
    let (Some(current), Some(previous)) = (store.get(today), store.get(today - Duration::days(1)))
    else {
        return TrendReport::default();
    };

    TrendReport {
        bedtime: bedtime_trend(current.bedtime, previous.bedtime),
        time_in_bed: value_trend(current.time_in_bed, previous.time_in_bed),
        steps: value_trend(current.steps, previous.steps),
    }
}
